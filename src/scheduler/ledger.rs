use crate::holiday::HolidayEntry;
use crate::model::{
    Assignment, CompensationAccrual, DutyRecord, OutstandingAccrual, StaffId, StaffTotal,
};
use chrono::NaiveDate;

/// État mutable d'une génération : compteurs, détail des vacations,
/// droits à récupération en attente et curseur de rotation.
///
/// Tout est indexé par la position fixe de l'agent (`S1` → 0).
#[derive(Debug, Clone)]
pub(super) struct Ledger {
    pub(super) duty_count: Vec<u32>,
    pub(super) duty_details: Vec<Vec<DutyRecord>>,
    pub(super) accrual: Vec<Vec<CompensationAccrual>>,
    pub(super) cursor: usize,
}

impl Ledger {
    pub(super) fn new(total: usize, cursor: usize) -> Self {
        Self {
            duty_count: vec![0; total],
            duty_details: vec![Vec::new(); total],
            accrual: vec![Vec::new(); total],
            cursor,
        }
    }

    pub(super) fn total(&self) -> usize {
        self.duty_count.len()
    }

    /// Consomme les droits arrivant à échéance `date` (jour ouvré uniquement).
    /// Renvoie, par agent, s'il est en récupération aujourd'hui.
    pub(super) fn resolve_leave(&mut self, date: NaiveDate, is_working_day: bool) -> Vec<bool> {
        let mut on_leave = vec![false; self.total()];
        if !is_working_day {
            return on_leave;
        }
        for (idx, pending) in self.accrual.iter_mut().enumerate() {
            let before = pending.len();
            pending.retain(|acc| acc.lieu_date != date);
            on_leave[idx] = pending.len() < before;
        }
        on_leave
    }

    /// Comptabilise les affectations du jour et, un jour férié, ouvre les droits.
    pub(super) fn record(
        &mut self,
        date: NaiveDate,
        assignments: &[Assignment],
        holiday: Option<&HolidayEntry>,
    ) {
        for a in assignments {
            let idx = a.staff.index();
            self.duty_count[idx] += 1;
            self.duty_details[idx].push(DutyRecord {
                date,
                slot: a.slot,
                special: a.special,
            });
            if let Some(entry) = holiday {
                self.accrual[idx].push(CompensationAccrual {
                    source_date: date,
                    lieu_date: entry.lieu_date,
                });
            }
        }
    }

    /// Totaux triés par identifiant, détail trié par date, droits restants.
    pub(super) fn finish(self) -> (Vec<StaffTotal>, Vec<OutstandingAccrual>) {
        let mut totals: Vec<StaffTotal> = self
            .duty_count
            .into_iter()
            .zip(self.duty_details)
            .enumerate()
            .map(|(idx, (count, mut details))| {
                details.sort_by_key(|d| d.date);
                StaffTotal {
                    staff: StaffId::from_index(idx),
                    count,
                    details,
                }
            })
            .collect();
        totals.sort_by_key(|t| t.staff);

        let outstanding = self
            .accrual
            .into_iter()
            .enumerate()
            .flat_map(|(idx, pending)| {
                pending.into_iter().map(move |accrual| OutstandingAccrual {
                    staff: StaffId::from_index(idx),
                    accrual,
                })
            })
            .collect();

        (totals, outstanding)
    }
}
