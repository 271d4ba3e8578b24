use super::{Conflict, ConflictKind};
use crate::model::{RosterOutcome, SLOT_CAPACITY};
use std::collections::BTreeMap;

/// Revérifie un résultat (éventuellement rechargé depuis le disque).
pub fn detect_conflicts(outcome: &RosterOutcome) -> Vec<Conflict> {
    let mut out = Vec::new();

    for day in &outcome.days {
        let mut per_staff = BTreeMap::new();
        for a in &day.assignments {
            *per_staff.entry(a.staff).or_insert(0usize) += 1;
            if day.on_leave.contains(&a.staff) {
                out.push(Conflict {
                    date: day.date,
                    slot: Some(a.slot),
                    staff: Some(a.staff),
                    kind: ConflictKind::AssignedOnLeave,
                });
            }
        }
        for (staff, count) in per_staff {
            if count > 1 {
                out.push(Conflict {
                    date: day.date,
                    slot: None,
                    staff: Some(staff),
                    kind: ConflictKind::DoubleAssignment,
                });
            }
        }

        for slot in &outcome.slots {
            let taken = day.assignments_for(*slot).count();
            if taken > SLOT_CAPACITY {
                out.push(Conflict {
                    date: day.date,
                    slot: Some(*slot),
                    staff: None,
                    kind: ConflictKind::OverCapacity,
                });
            }
        }
        for (slot, missing) in day.unfilled(&outcome.slots) {
            out.extend((0..missing).map(|_| Conflict {
                date: day.date,
                slot: Some(slot),
                staff: None,
                kind: ConflictKind::Unfilled,
            }));
        }
    }

    out
}
