//! Suicide units: run into the nearest enemy and detonate.

use crate::agent::{distance_squared, Agent};
use crate::damage;
use crate::math::{distance_from_squared, Fixed};
use crate::movement::move_toward;

pub(super) fn sim_unit(
    frame_skip: i32,
    agent_index: usize,
    allies: &mut [Agent],
    enemies: &mut [Agent],
) -> bool {
    let agent = &allies[agent_index];
    let reach = agent.effective_speed() * Fixed::from_num(frame_skip);
    let reach_squared: i64 = (reach * reach).round_to_zero().to_num();

    let mut selected: Option<(usize, i32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_targetable() || !agent.weapon_vs(enemy).is_armed() {
            continue;
        }
        let d2 = distance_squared(agent, enemy);
        if selected.map_or(true, |(_, best)| d2 < best) {
            selected = Some((index, d2));
            if detonates(agent, enemy, d2, reach_squared) {
                break;
            }
        }
    }

    let Some((target_index, d2)) = selected else {
        return false;
    };

    let agent = &mut allies[agent_index];
    agent.detected = true;
    let target = &enemies[target_index];
    if detonates(agent, target, d2, reach_squared) {
        let weapon = *agent.weapon_vs(target);
        damage::attack(agent, &weapon, target_index, enemies);
        agent.kill();
    } else {
        let position = target.position();
        move_toward(agent, frame_skip, position, distance_from_squared(d2), 0);
    }
    true
}

/// Within one step, or already inside weapon range.
fn detonates(agent: &Agent, target: &Agent, d2: i32, reach_squared: i64) -> bool {
    i64::from(d2) <= reach_squared || d2 <= agent.weapon_vs(target).max_range_squared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentId, Weapon};

    fn numbered(agents: Vec<Agent>) -> Vec<Agent> {
        agents
            .into_iter()
            .enumerate()
            .map(|(n, mut agent)| {
                agent.id = AgentId(n as u32 + 1);
                agent
            })
            .collect()
    }

    fn scourge() -> Agent {
        Agent::new("Scourge")
            .with_max_health(25)
            .with_flyer(true)
            .with_suicider(true)
            .with_melee(true)
            .with_air_weapon(Weapon::new(110, 3, 1))
            .with_speed(Fixed::from_num(6))
    }

    fn wraith(x: i32) -> Agent {
        Agent::new("Wraith")
            .with_max_health(120)
            .with_flyer(true)
            .with_position(x, 0)
    }

    #[test]
    fn test_no_valid_target() {
        // Scourge cannot hit ground units
        let mut allies = numbered(vec![scourge()]);
        let mut enemies = numbered(vec![wraith(5).with_flyer(false)]);
        assert!(!sim_unit(1, 0, &mut allies, &mut enemies));
        assert!(allies[0].is_alive());
    }

    #[test]
    fn test_moves_toward_target() {
        let mut allies = numbered(vec![scourge()]);
        let mut enemies = numbered(vec![wraith(100)]);
        assert!(sim_unit(1, 0, &mut allies, &mut enemies));
        assert_eq!(allies[0].velocity(), (6, 0));
        assert_eq!(enemies[0].health(), 120);
    }

    #[test]
    fn test_detonates_within_reach() {
        let mut allies = numbered(vec![scourge()]);
        let mut enemies = numbered(vec![wraith(6)]);
        assert!(sim_unit(1, 0, &mut allies, &mut enemies));
        assert_eq!(enemies[0].health(), 10);
        assert!(!allies[0].is_alive());
    }

    #[test]
    fn test_frame_skip_extends_reach() {
        let mut allies = numbered(vec![scourge()]);
        let mut enemies = numbered(vec![wraith(15)]);
        assert!(sim_unit(3, 0, &mut allies, &mut enemies));
        assert!(!allies[0].is_alive());
    }

    #[test]
    fn test_picks_nearest() {
        let mut allies = numbered(vec![scourge()]);
        let mut enemies = numbered(vec![wraith(50), wraith(4)]);
        sim_unit(1, 0, &mut allies, &mut enemies);
        assert_eq!(enemies[0].health(), 120);
        assert_eq!(enemies[1].health(), 10);
    }
}
