//! Healing of injured organic allies.
//!
//! A healer keeps its current patient while it still needs healing in
//! range, otherwise it picks the nearest wounded organic ally. The first
//! healer to reach a patient in a frame wins; the patient is marked and
//! skipped by every other healer until the next frame.

use super::MEDIC_HEAL_RANGE_SQUARED;
use crate::agent::{distance_squared, Agent, AgentRef};
use crate::math::{distance_from_squared, points, raw, Shifted};
use crate::movement::move_toward;

/// Health restored per frame.
const HEAL_PER_FRAME: Shifted = raw(150);

/// Energy spent per frame of healing, in whole points.
const ENERGY_PER_FRAME: i32 = 1;

const HEAL_RANGE: i32 = 30;

pub(super) fn sim_unit(frame_skip: i32, agent_index: usize, allies: &mut [Agent]) -> bool {
    let Some((patient, d2)) = select_patient(agent_index, allies) else {
        allies[agent_index].restore_target = None;
        return false;
    };

    let patient_ref = AgentRef::new(patient, allies);
    let position = allies[patient].position();
    let healer = &mut allies[agent_index];
    healer.restore_target = Some(patient_ref);

    if d2 > MEDIC_HEAL_RANGE_SQUARED {
        move_toward(healer, frame_skip, position, distance_from_squared(d2), HEAL_RANGE);
        return true;
    }

    let cost = points(ENERGY_PER_FRAME).saturating_mul_int(frame_skip);
    if healer.energy < cost {
        // Out of energy: wait for regeneration
        return true;
    }
    healer.consume_energy(cost);

    let patient = &mut allies[patient];
    patient.heal(HEAL_PER_FRAME.saturating_mul_int(frame_skip));
    patient.healed_this_frame = true;
    true
}

fn needs_healing(healer_index: usize, index: usize, ally: &Agent) -> bool {
    index != healer_index
        && ally.is_organic
        && ally.is_alive()
        && !ally.stasised
        && !ally.healed_this_frame
        && ally.is_damaged()
}

fn select_patient(healer_index: usize, allies: &[Agent]) -> Option<(usize, i32)> {
    let healer = &allies[healer_index];

    if let Some(index) = healer.restore_target.and_then(|target| target.resolve(allies)) {
        let ally = &allies[index];
        let d2 = distance_squared(healer, ally);
        if needs_healing(healer_index, index, ally) && d2 <= MEDIC_HEAL_RANGE_SQUARED {
            return Some((index, d2));
        }
    }

    let mut selected: Option<(usize, i32)> = None;
    for (index, ally) in allies.iter().enumerate() {
        if !needs_healing(healer_index, index, ally) {
            continue;
        }
        let d2 = distance_squared(healer, ally);
        // Ties go to the lower index
        if selected.map_or(true, |(_, best)| d2 < best) {
            selected = Some((index, d2));
        }
    }
    selected
}
