mod assignment;
mod conflicts;
mod ledger;
mod types;
pub(crate) mod util;

pub use conflicts::detect_conflicts;
pub use types::{Conflict, ConflictKind, RosterConfig, RosterError};

use crate::calendar::Calendar;
use crate::holiday::{compute_holiday_map, HolidayMap};
use crate::model::{DayPlan, RejectedRequest, RosterOutcome, RunId, ShiftSlot, SpecialRequest, StaffId};
use crate::request::RequestBook;
use assignment::DayBoard;
use chrono::NaiveDate;
use ledger::Ledger;

/// Moteur de génération : possède tout l'état d'une génération mensuelle.
///
/// Les journées sont traitées strictement dans l'ordre, chacune dépendant des
/// compteurs, du curseur et des droits laissés par la précédente.
#[derive(Debug)]
pub struct RosterEngine<'c, C: Calendar + ?Sized> {
    config: RosterConfig,
    calendar: &'c C,
    slots: Vec<ShiftSlot>,
    holidays: HolidayMap,
    ledger: Ledger,
    days_in_month: u32,
}

impl<'c, C: Calendar + ?Sized> RosterEngine<'c, C> {
    pub fn new(config: RosterConfig, calendar: &'c C) -> Result<Self, RosterError> {
        config.validate()?;
        let days_in_month = calendar
            .days_in_month(config.year, config.month)
            .ok_or(RosterError::InvalidMonth {
                year: config.year,
                month: config.month,
            })?;
        let slots = util::build_slots(config.station_count, &config.single_shift_stations);
        let holidays = compute_holiday_map(calendar, config.year, config.month);
        let ledger = Ledger::new(config.staff_count as usize, config.start_staff.index());
        Ok(Self {
            config,
            calendar,
            slots,
            holidays,
            ledger,
            days_in_month,
        })
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn slots(&self) -> &[ShiftSlot] {
        &self.slots
    }

    pub fn holiday_map(&self) -> &HolidayMap {
        &self.holidays
    }

    /// Génère tout le mois.
    pub fn run(mut self, requests: &RequestBook) -> RosterOutcome {
        let mut days = Vec::with_capacity(self.days_in_month as usize);
        let mut rejected_requests = Vec::new();

        for day in 1..=self.days_in_month {
            let Some(date) = NaiveDate::from_ymd_opt(self.config.year, self.config.month, day)
            else {
                continue;
            };
            let (plan, rejected) = self.plan_day(date, requests.for_date(date));
            days.push(plan);
            rejected_requests.extend(rejected);
        }

        let (staff_totals, outstanding_accruals) = self.ledger.finish();
        tracing::info!(
            year = self.config.year,
            month = self.config.month,
            days = days.len(),
            rejected = rejected_requests.len(),
            outstanding = outstanding_accruals.len(),
            "roster generated"
        );

        RosterOutcome {
            id: RunId::random(),
            year: self.config.year,
            month: self.config.month,
            staff_count: self.config.staff_count,
            slots: self.slots,
            days,
            staff_totals,
            outstanding_accruals,
            rejected_requests,
            warnings: Vec::new(),
        }
    }

    fn plan_day(
        &mut self,
        date: NaiveDate,
        requests: &[SpecialRequest],
    ) -> (DayPlan, Vec<RejectedRequest>) {
        let is_working_day = self.calendar.is_working_day(date);
        let is_holiday = self.calendar.is_holiday(date);

        let on_leave = self.ledger.resolve_leave(date, is_working_day);
        let mut board = DayBoard::new(on_leave);
        let rejected = assignment::admit_special_requests(&mut board, &self.slots, requests);
        assignment::fill_remaining(&mut board, &self.slots, &mut self.ledger);

        let holiday = if is_holiday { self.holidays.get(&date) } else { None };
        self.ledger.record(date, &board.assignments, holiday);

        let on_leave: Vec<StaffId> = indices(&board.on_leave).map(StaffId::from_index).collect();
        let office: Vec<StaffId> = if is_working_day {
            (0..self.ledger.total())
                .filter(|&idx| !board.on_leave[idx] && !board.used[idx])
                .map(StaffId::from_index)
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            %date,
            is_working_day,
            is_holiday,
            assigned = board.assignments.len(),
            on_leave = on_leave.len(),
            office = office.len(),
            cursor = self.ledger.cursor,
            "day planned"
        );

        let plan = DayPlan {
            date,
            is_working_day,
            is_holiday,
            assignments: board.assignments,
            on_leave,
            office,
        };
        (plan, rejected)
    }
}

fn indices(flags: &[bool]) -> impl Iterator<Item = usize> + '_ {
    flags
        .iter()
        .enumerate()
        .filter_map(|(idx, set)| set.then_some(idx))
}

/// Raccourci : valide, construit le moteur et génère le mois.
pub fn generate_month<C: Calendar + ?Sized>(
    config: RosterConfig,
    calendar: &C,
    requests: &RequestBook,
) -> Result<RosterOutcome, RosterError> {
    Ok(RosterEngine::new(config, calendar)?.run(requests))
}
