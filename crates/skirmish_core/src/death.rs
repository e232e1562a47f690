//! Death reactions run while dead agents are reaped.
//!
//! A reaction receives the dying agent and a [`GroupView`] over the
//! survivors of its side. It may change survivors' vitals and queue new
//! agents, but it cannot move or remove anyone: positions and removals stay
//! under the simulator's control so the collision grid stays consistent.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agent::{Agent, AgentId};
use crate::collision::in_bounds;
use crate::error::{Result, SimError};

/// Shared closure invoked when an agent dies.
pub type DeathHandler = Arc<dyn Fn(&Agent, &mut GroupView<'_>) + Send + Sync>;

/// What happens when an agent dies.
#[derive(Clone, Default, Serialize, Deserialize)]
pub enum DeathReaction {
    /// Nothing.
    #[default]
    None,
    /// Release these agents at the dying agent's position.
    Spawn(Vec<Agent>),
    /// Kill every survivor carried by the dying agent.
    KillDependents,
    /// Run a custom handler. Not serializable.
    #[serde(skip)]
    Custom(DeathHandler),
}

impl DeathReaction {
    /// Wrap a closure as a custom reaction.
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&Agent, &mut GroupView<'_>) + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(handler))
    }

    /// Whether this reaction does anything.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for DeathReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Spawn(agents) => f.debug_tuple("Spawn").field(agents).finish(),
            Self::KillDependents => write!(f, "KillDependents"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// The surviving group of one side, as seen by a death reaction.
pub struct GroupView<'a> {
    survivors: &'a mut [Agent],
    spawned: Vec<Agent>,
}

impl<'a> GroupView<'a> {
    pub(crate) fn new(survivors: &'a mut [Agent]) -> Self {
        Self {
            survivors,
            spawned: Vec::new(),
        }
    }

    /// Number of survivors, not counting queued spawns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    /// Whether no survivors are left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    /// Iterate over the survivors.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.survivors.iter()
    }

    /// Iterate mutably over the survivors.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.survivors.iter_mut()
    }

    /// Find a survivor by id.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.survivors.iter_mut().find(|agent| agent.id == id)
    }

    /// Queue a new agent for this side.
    ///
    /// The agent keeps its own position and is added after the reaction
    /// returns. Off-map agents are rejected.
    pub fn spawn(&mut self, agent: Agent) -> Result<()> {
        let (x, y) = agent.position();
        if !in_bounds(x, y) {
            warn!(name = agent.name(), x, y, "Rejected off-map spawn");
            return Err(SimError::PositionOutOfBounds {
                name: agent.name().to_string(),
                x,
                y,
            });
        }
        self.spawned.push(agent);
        Ok(())
    }

    /// Agents queued so far.
    #[must_use]
    pub fn spawned(&self) -> &[Agent] {
        &self.spawned
    }

    pub(crate) fn into_spawned(self) -> Vec<Agent> {
        self.spawned
    }
}

/// Run `dead`'s reaction against its surviving `group`.
///
/// Returns the agents to add to the group and whether anything happened.
pub(crate) fn react(dead: &Agent, group: &mut [Agent]) -> (Vec<Agent>, bool) {
    match &dead.death_reaction {
        DeathReaction::None => (Vec::new(), false),
        DeathReaction::Spawn(agents) => {
            let spawned: Vec<Agent> = agents
                .iter()
                .map(|agent| agent.clone().with_position(dead.x, dead.y))
                .collect();
            let fired = !spawned.is_empty();
            (spawned, fired)
        }
        DeathReaction::KillDependents => {
            let mut fired = false;
            for agent in group.iter_mut().filter(|agent| agent.carrier == Some(dead.id)) {
                agent.kill();
                fired = true;
            }
            (Vec::new(), fired)
        }
        DeathReaction::Custom(handler) => {
            let mut view = GroupView::new(group);
            handler(dead, &mut view);
            (view.into_spawned(), true)
        }
    }
}
