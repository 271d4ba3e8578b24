use crate::model::{ShiftSlot, StaffId, StationId};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;

/// Paramètres structurels d'une génération mensuelle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub year: i32,
    pub month: u32,
    pub staff_count: u32,
    pub station_count: u32,
    pub start_staff: StaffId,
    pub single_shift_stations: BTreeSet<StationId>,
}

impl RosterConfig {
    pub fn new(year: i32, month: u32, staff_count: u32, station_count: u32) -> Self {
        Self {
            year,
            month,
            staff_count,
            station_count,
            start_staff: StaffId::new(1),
            single_shift_stations: BTreeSet::new(),
        }
    }

    pub fn with_start_staff(mut self, staff: StaffId) -> Self {
        self.start_staff = staff;
        self
    }

    pub fn with_single_shift_stations<I: IntoIterator<Item = StationId>>(mut self, stations: I) -> Self {
        self.single_shift_stations = stations.into_iter().collect();
        self
    }

    /// Erreurs fatales, détectées avant tout traitement de journée.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.staff_count == 0 {
            return Err(RosterError::NoStaff);
        }
        if self.station_count == 0 {
            return Err(RosterError::NoStations);
        }
        if !(1..=12).contains(&self.month) || NaiveDate::from_ymd_opt(self.year, self.month, 1).is_none() {
            return Err(RosterError::InvalidMonth {
                year: self.year,
                month: self.month,
            });
        }
        if self.start_staff.get() == 0 || self.start_staff.get() > self.staff_count {
            return Err(RosterError::UnknownStartStaff(self.start_staff.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// Plus de `SLOT_CAPACITY` agents sur un créneau.
    OverCapacity,
    /// Un agent sur deux créneaux le même jour.
    DoubleAssignment,
    /// Agent affecté pendant sa récupération.
    AssignedOnLeave,
    /// Place restée vide.
    Unfilled,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub date: NaiveDate,
    pub slot: Option<ShiftSlot>,
    pub staff: Option<StaffId>,
    pub kind: ConflictKind,
}

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("staff count must be greater than zero")]
    NoStaff,
    #[error("station count must be greater than zero")]
    NoStations,
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("invalid year-month: {0:?} (expected YYYY-MM)")]
    InvalidYearMonth(String),
    #[error("unknown start staff: {0}")]
    UnknownStartStaff(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
