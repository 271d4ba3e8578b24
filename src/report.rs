//! Regroupements du résultat pour l'affichage : résumé quotidien, grille par poste,
//! totaux et détail par agent. Aucune décision de planification ici.

use crate::model::{
    DayPlan, RosterOutcome, ShiftCode, ShiftSlot, StaffId, StaffTotal, StationId, SLOT_CAPACITY,
};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Colonne de la grille : un poste, un service, une place (1 ou 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationColumn {
    pub station: StationId,
    pub shift: ShiftCode,
    pub position: usize,
}

impl StationColumn {
    pub fn slot(&self) -> ShiftSlot {
        ShiftSlot::new(self.station, self.shift)
    }

    /// `Day(1)`, `Night(2)`...
    pub fn label(&self) -> String {
        format!("{}({})", self.shift, self.position)
    }
}

pub fn station_columns(slots: &[ShiftSlot]) -> Vec<StationColumn> {
    slots
        .iter()
        .flat_map(|slot| {
            (1..=SLOT_CAPACITY).map(move |position| StationColumn {
                station: slot.station,
                shift: slot.shift,
                position,
            })
        })
        .collect()
}

/// En-tête groupé : un poste et le nombre de colonnes qu'il couvre (2 ou 4).
pub fn station_headers(columns: &[StationColumn]) -> Vec<(StationId, usize)> {
    let mut out: Vec<(StationId, usize)> = Vec::new();
    for col in columns {
        match out.last_mut() {
            Some((station, span)) if *station == col.station => *span += 1,
            _ => out.push((col.station, 1)),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummaryRow {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_working_day: bool,
    pub is_holiday: bool,
    pub station_staff: usize,
    pub on_leave: usize,
    pub office: usize,
}

impl From<&DayPlan> for DailySummaryRow {
    fn from(day: &DayPlan) -> Self {
        Self {
            date: day.date,
            weekday: day.date.weekday(),
            is_working_day: day.is_working_day,
            is_holiday: day.is_holiday,
            station_staff: day.station_staff_count(),
            on_leave: day.on_leave.len(),
            office: day.office.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub staff: StaffId,
    pub special: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationGridRow {
    pub date: NaiveDate,
    pub is_holiday: bool,
    /// Alignées sur [`StationGrid::columns`] ; `None` = place vide.
    pub cells: Vec<Option<GridCell>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationGrid {
    pub columns: Vec<StationColumn>,
    pub rows: Vec<StationGridRow>,
}

impl StationGrid {
    pub fn build(outcome: &RosterOutcome) -> Self {
        let columns = station_columns(&outcome.slots);
        let rows = outcome
            .days
            .iter()
            .map(|day| StationGridRow {
                date: day.date,
                is_holiday: day.is_holiday,
                cells: columns
                    .iter()
                    .map(|col| {
                        day.assignments_for(col.slot())
                            .nth(col.position - 1)
                            .map(|a| GridCell {
                                staff: a.staff,
                                special: a.special,
                            })
                    })
                    .collect(),
            })
            .collect();
        Self { columns, rows }
    }
}

/// Les quatre vues d'un mois généré.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterReport {
    pub year: i32,
    pub month: u32,
    pub summary: Vec<DailySummaryRow>,
    pub grid: StationGrid,
    pub staff: Vec<StaffTotal>,
}

impl RosterReport {
    pub fn from_outcome(outcome: &RosterOutcome) -> Self {
        let mut staff = outcome.staff_totals.clone();
        staff.sort_by_key(|t| t.staff);
        Self {
            year: outcome.year,
            month: outcome.month,
            summary: outcome.days.iter().map(DailySummaryRow::from).collect(),
            grid: StationGrid::build(outcome),
            staff,
        }
    }
}
