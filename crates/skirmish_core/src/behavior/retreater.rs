//! Retreat out of the reach of the nearest threat.

use super::attacker;
use crate::agent::{distance_squared, Agent};
use crate::math::{distance_from_squared, Fixed};
use crate::movement::move_away_from;

/// Immobile agents fight instead. Returns false once no enemy can reach
/// the agent.
pub(super) fn sim_unit(
    frame_skip: i32,
    agent_index: usize,
    allies: &mut [Agent],
    enemies: &mut [Agent],
) -> bool {
    if allies[agent_index].speed == Fixed::ZERO {
        return attacker::sim_unit(frame_skip, agent_index, allies, enemies);
    }

    let agent = &allies[agent_index];
    let mut selected: Option<(usize, i32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() || enemy.locked_down || enemy.stasised {
            continue;
        }
        let weapon = enemy.weapon_vs(agent);
        if !weapon.is_armed() {
            continue;
        }
        let d2 = distance_squared(agent, enemy);
        if d2 >= weapon.min_range_squared && selected.map_or(true, |(_, best)| d2 < best) {
            selected = Some((index, d2));
        }
    }

    let Some((threat_index, d2)) = selected else {
        return false;
    };
    let threat = &enemies[threat_index];
    let threat_range = threat.weapon_vs(agent).max_range;
    if d2 > threat.weapon_vs(agent).max_range_squared {
        return false;
    }

    let position = threat.position();
    let agent = &mut allies[agent_index];
    if agent.burrowed {
        return agent.toggle_burrow();
    }
    move_away_from(agent, frame_skip, position, distance_from_squared(d2), threat_range);
    true
}
