//! Repair of damaged mechanical allies.

use super::REPAIR_RANGE_SQUARED;
use crate::agent::{distance_squared, Agent, AgentRef};
use crate::math::distance_from_squared;
use crate::movement::move_toward;

/// Returns false when nothing needs repair, so the caller can fall back to
/// attacking.
pub(super) fn sim_unit(frame_skip: i32, agent_index: usize, allies: &mut [Agent]) -> bool {
    let Some((patient, d2)) = select_patient(agent_index, allies) else {
        allies[agent_index].restore_target = None;
        return false;
    };

    let patient_ref = AgentRef::new(patient, allies);
    let position = allies[patient].position();
    let repairer = &mut allies[agent_index];
    repairer.restore_target = Some(patient_ref);

    if d2 > REPAIR_RANGE_SQUARED {
        move_toward(repairer, frame_skip, position, distance_from_squared(d2), 0);
        return true;
    }

    let amount = repairer.construction_rate.saturating_mul_int(frame_skip);
    allies[patient].heal(amount);
    true
}

fn needs_repair(repairer_index: usize, index: usize, ally: &Agent) -> bool {
    index != repairer_index
        && ally.is_mechanic
        && ally.is_alive()
        && !ally.stasised
        && ally.is_damaged()
}

/// Stick with the last patient while it is still damaged and in range.
/// Otherwise take the nearest candidate, stopping at the first one that is
/// already in range.
fn select_patient(repairer_index: usize, allies: &[Agent]) -> Option<(usize, i32)> {
    let repairer = &allies[repairer_index];

    if let Some(index) = repairer.restore_target.and_then(|target| target.resolve(allies)) {
        let ally = &allies[index];
        let d2 = distance_squared(repairer, ally);
        if needs_repair(repairer_index, index, ally) && d2 <= REPAIR_RANGE_SQUARED {
            return Some((index, d2));
        }
    }

    let mut selected: Option<(usize, i32)> = None;
    for (index, ally) in allies.iter().enumerate().rev() {
        if !needs_repair(repairer_index, index, ally) {
            continue;
        }
        let d2 = distance_squared(repairer, ally);
        if selected.map_or(true, |(_, best)| d2 < best) {
            selected = Some((index, d2));
            if d2 <= REPAIR_RANGE_SQUARED {
                break;
            }
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentId;
    use crate::math::{points, Fixed};

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

    fn scv() -> Agent {
        Agent::new("SCV")
            .with_max_health(60)
            .with_organic(true)
            .with_mechanic(true)
            .with_repairer(64)
            .with_speed(Fixed::from_num(4))
    }

    fn damaged_tank(x: i32) -> Agent {
        Agent::new("Tank")
            .with_max_health(150)
            .with_health(100)
            .with_mechanic(true)
            .with_position(x, 0)
    }

    #[test]
    fn test_idle_without_damaged_allies() {
        let mut allies = numbered(vec![scv(), damaged_tank(3).with_health(150)]);
        assert!(!sim_unit(1, 0, &mut allies));
        assert_eq!(allies[0].restore_target(), None);
    }

    #[test]
    fn test_does_not_repair_itself() {
        let mut allies = numbered(vec![scv().with_health(10)]);
        assert!(!sim_unit(1, 0, &mut allies));
        assert_eq!(allies[0].health(), 10);
    }

    #[test]
    fn test_repairs_in_range() {
        let mut allies = numbered(vec![scv(), damaged_tank(3)]);
        assert!(sim_unit(1, 0, &mut allies));
        // 64 raw = a quarter point per frame
        assert_eq!(allies[1].health, points(100) + crate::math::raw(64));
    }

    #[test]
    fn test_approaches_out_of_range() {
        let mut allies = numbered(vec![scv(), damaged_tank(100)]);
        assert!(sim_unit(1, 0, &mut allies));
        assert_eq!(allies[1].health(), 100);
        assert_eq!(allies[0].velocity(), (4, 0));
    }

    #[test]
    fn test_sticks_with_current_patient() {
        let mut allies = numbered(vec![scv(), damaged_tank(4)]);
        assert!(sim_unit(1, 0, &mut allies));
        assert_eq!(allies[0].restore_target(), Some(AgentId(2)));

        // A closer damaged ally shows up later
        let mut closer = damaged_tank(1);
        closer.id = AgentId(3);
        allies.push(closer);

        assert!(sim_unit(1, 0, &mut allies));
        assert_eq!(allies[0].restore_target(), Some(AgentId(2)));
        assert_eq!(allies[2].health(), 100);
    }

    #[test]
    fn test_switches_when_patient_repaired() {
        let mut allies = numbered(vec![scv(), damaged_tank(4), damaged_tank(2)]);
        allies[0].restore_target = Some(AgentRef::new(1, &allies));
        allies[1].health = points(150);

        assert!(sim_unit(1, 0, &mut allies));
        assert_eq!(allies[0].restore_target(), Some(AgentId(3)));
    }
}
