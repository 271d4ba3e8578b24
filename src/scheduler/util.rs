use crate::model::{ShiftCode, ShiftSlot, StationId};
use std::collections::BTreeSet;

/// Créneaux dans l'ordre fixe de remplissage : poste croissant, jour avant soir.
pub(crate) fn build_slots(station_count: u32, single_shift: &BTreeSet<StationId>) -> Vec<ShiftSlot> {
    let mut slots = Vec::with_capacity(station_count as usize * 2);
    for n in 1..=station_count {
        let station = StationId::new(n);
        slots.push(ShiftSlot::new(station, ShiftCode::Day));
        if !single_shift.contains(&station) {
            slots.push(ShiftSlot::new(station, ShiftCode::Night));
        }
    }
    slots
}

/// Distance circulaire de `index` depuis le curseur de rotation.
pub(super) fn cyclic_distance(index: usize, cursor: usize, total: usize) -> usize {
    (index + total - cursor % total) % total
}
