//! Velocity planning for one frame.
//!
//! Behaviors only set an agent's velocity; the simulator applies it in the
//! move phase after checking bounds and tile occupancy.

use crate::agent::Agent;
use crate::math::Fixed;

/// Extra distance closed (or opened) so integer truncation does not leave
/// an agent just outside the wanted range.
const RANGE_SLACK: i32 = 2;

/// Raw bits of 1/sqrt(2) as an `I32F32`.
const DIAGONAL: i64 = 3_037_000_500;
const UNIT: i64 = 1 << 32;

/// Unit directions used when an agent sits exactly on its goal.
const DIRECTIONS: [(i64, i64); 8] = [
    (UNIT, 0),
    (DIAGONAL, DIAGONAL),
    (0, UNIT),
    (-DIAGONAL, DIAGONAL),
    (-UNIT, 0),
    (-DIAGONAL, -DIAGONAL),
    (0, -UNIT),
    (DIAGONAL, -DIAGONAL),
];

/// Plan a step toward `goal`, stopping `wanted_distance` short of it.
pub(crate) fn move_toward(
    agent: &mut Agent,
    frame_skip: i32,
    goal: (i32, i32),
    distance: Fixed,
    wanted_distance: i32,
) {
    let wanted = Fixed::from_num(wanted_distance - RANGE_SLACK);
    let reach = step_length(agent, frame_skip)
        .min(distance - wanted)
        .max(Fixed::ZERO);
    let (dx, dy) = (goal.0 - agent.x, goal.1 - agent.y);
    set_velocity(agent, dx, dy, distance, reach);
}

/// Plan a step away from `threat` until `target_distance` is reached.
pub(crate) fn move_away_from(
    agent: &mut Agent,
    frame_skip: i32,
    threat: (i32, i32),
    distance: Fixed,
    target_distance: i32,
) {
    let target = Fixed::from_num(target_distance + RANGE_SLACK);
    let reach = step_length(agent, frame_skip)
        .min(target - distance)
        .max(Fixed::ZERO);
    let (dx, dy) = (agent.x - threat.0, agent.y - threat.1);
    set_velocity(agent, dx, dy, distance, reach);
}

fn step_length(agent: &Agent, frame_skip: i32) -> Fixed {
    agent.effective_speed() * Fixed::from_num(frame_skip)
}

fn set_velocity(agent: &mut Agent, dx: i32, dy: i32, distance: Fixed, reach: Fixed) {
    if distance == Fixed::ZERO {
        // Stacked on the goal: pick a direction from the id so reruns agree
        let (ux, uy) = DIRECTIONS[(agent.id.0 % 8) as usize];
        agent.vx = truncate(Fixed::from_bits(ux) * reach);
        agent.vy = truncate(Fixed::from_bits(uy) * reach);
    } else {
        agent.vx = truncate(Fixed::from_num(dx) * reach / distance);
        agent.vy = truncate(Fixed::from_num(dy) * reach / distance);
    }
}

fn truncate(value: Fixed) -> i32 {
    value.round_to_zero().to_num()
}
