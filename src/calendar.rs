//! Calendrier : jours ouvrés, jours fériés, longueur des mois.
//!
//! Le moteur ne calcule jamais les fériés lui-même ; il interroge un [`Calendar`].

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Borne de sécurité pour tout parcours de jours.
pub const SCAN_SAFETY_DAYS: u32 = 366;

pub trait Calendar {
    /// Jour ouvré : ni week-end, ni férié.
    fn is_working_day(&self, date: NaiveDate) -> bool;

    /// Férié au sens large (week-end compris).
    fn is_holiday(&self, date: NaiveDate) -> bool;

    fn days_in_month(&self, year: i32, month: u32) -> Option<u32> {
        days_in_month(year, month)
    }
}

/// Calendrier fixe : liste de fériés + règle de week-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    #[serde(default)]
    holidays: BTreeSet<NaiveDate>,
    #[serde(default = "default_weekend")]
    weekend: Vec<Weekday>,
}

fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self {
            holidays: BTreeSet::new(),
            weekend: default_weekend(),
        }
    }
}

impl HolidayCalendar {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
            weekend: default_weekend(),
        }
    }

    pub fn with_weekend<I: IntoIterator<Item = Weekday>>(mut self, days: I) -> Self {
        self.weekend = days.into_iter().collect();
        self
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> + '_ {
        self.holidays.iter()
    }

    pub fn weekend(&self) -> &[Weekday] {
        &self.weekend
    }

    fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.contains(&date.weekday())
    }
}

impl Calendar for HolidayCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.holidays.contains(&date)
    }

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.is_weekend(date) || self.holidays.contains(&date)
    }
}

/// Nombre de jours du mois grégorien, `None` si le mois est invalide.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// N-ième jour ouvré strictement après `date` (n ≥ 1).
pub fn nth_working_day_after<C: Calendar + ?Sized>(
    calendar: &C,
    date: NaiveDate,
    n: u32,
) -> Option<NaiveDate> {
    let mut current = date;
    let mut found = 0u32;
    for _ in 0..SCAN_SAFETY_DAYS {
        current = current.checked_add_signed(Duration::days(1))?;
        if calendar.is_working_day(current) {
            found += 1;
            if found == n {
                return Some(current);
            }
        }
    }
    None
}
