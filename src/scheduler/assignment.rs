use super::ledger::Ledger;
use super::util;
use crate::model::{
    Assignment, RejectReason, RejectedRequest, ShiftSlot, SpecialRequest, StaffId, SLOT_CAPACITY,
};

/// Tableau d'une journée en cours de construction.
#[derive(Debug)]
pub(super) struct DayBoard {
    pub(super) on_leave: Vec<bool>,
    pub(super) used: Vec<bool>,
    pub(super) assignments: Vec<Assignment>,
}

impl DayBoard {
    pub(super) fn new(on_leave: Vec<bool>) -> Self {
        let total = on_leave.len();
        Self {
            on_leave,
            used: vec![false; total],
            assignments: Vec::new(),
        }
    }

    fn taken(&self, slot: ShiftSlot) -> usize {
        self.assignments.iter().filter(|a| a.slot == slot).count()
    }

    fn take(&mut self, idx: usize, slot: ShiftSlot, special: bool) {
        self.used[idx] = true;
        self.assignments.push(Assignment {
            staff: StaffId::from_index(idx),
            slot,
            special,
        });
    }
}

/// Admet les demandes spéciales dans l'ordre du texte ; le surplus est écarté.
pub(super) fn admit_special_requests(
    board: &mut DayBoard,
    slots: &[ShiftSlot],
    requests: &[SpecialRequest],
) -> Vec<RejectedRequest> {
    let mut rejected = Vec::new();
    for req in requests {
        let idx = req.staff.index();
        let reason = if !slots.contains(&req.slot) {
            Some(RejectReason::UnknownSlot)
        } else if req.staff.get() == 0 || idx >= board.used.len() {
            Some(RejectReason::UnknownStaff)
        } else if board.on_leave[idx] {
            Some(RejectReason::OnLeave)
        } else if board.used[idx] {
            Some(RejectReason::AlreadyAssigned)
        } else if board.taken(req.slot) >= SLOT_CAPACITY {
            Some(RejectReason::SlotFull)
        } else {
            None
        };

        match reason {
            None => board.take(idx, req.slot, true),
            Some(reason) => {
                tracing::debug!(
                    date = %req.date,
                    staff = %req.staff,
                    slot = %req.slot,
                    ?reason,
                    "special request dropped"
                );
                rejected.push(RejectedRequest {
                    request: req.clone(),
                    reason,
                });
            }
        }
    }
    rejected
}

/// Complète chaque créneau jusqu'à sa capacité, au plus petit nombre de vacations
/// puis à la plus petite distance depuis le curseur de rotation.
pub(super) fn fill_remaining(board: &mut DayBoard, slots: &[ShiftSlot], ledger: &mut Ledger) {
    for &slot in slots {
        let needed = SLOT_CAPACITY.saturating_sub(board.taken(slot));
        for _ in 0..needed {
            let Some(idx) = select_candidate(board, ledger) else {
                tracing::debug!(slot = %slot, "no candidate left, slot instance unfilled");
                continue;
            };
            board.take(idx, slot, false);
            ledger.cursor = (idx + 1) % ledger.total();
        }
    }
}

fn select_candidate(board: &DayBoard, ledger: &Ledger) -> Option<usize> {
    let total = ledger.total();
    (0..total)
        .filter(|&idx| !board.on_leave[idx] && !board.used[idx])
        .min_by_key(|&idx| {
            (
                ledger.duty_count[idx],
                util::cyclic_distance(idx, ledger.cursor, total),
            )
        })
}
