//! Blocs de jours fériés consécutifs et jour de récupération associé.
//!
//! Les deux premiers jours d'un bloc récupèrent sur le 1er jour ouvré qui suit le bloc,
//! les suivants sur le 2e : la charge de récupération est étalée sur deux dates.

use crate::calendar::{nth_working_day_after, Calendar, SCAN_SAFETY_DAYS};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position (1-based) d'un jour dans son bloc et date de récupération.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub position: u32,
    pub lieu_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayBlock {
    pub dates: Vec<NaiveDate>,
    pub lieu1: NaiveDate,
    pub lieu2: NaiveDate,
}

impl HolidayBlock {
    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }
    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
    pub fn lieu_for_position(&self, position: u32) -> NaiveDate {
        if position <= 2 {
            self.lieu1
        } else {
            self.lieu2
        }
    }
}

pub type HolidayMap = BTreeMap<NaiveDate, HolidayEntry>;

/// Dernier jour scanné : le 15 du mois M+2 (≈ 45 jours après la fin du mois).
pub fn scan_limit(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let idx = first.year() * 12 + first.month0() as i32 + 2;
    NaiveDate::from_ymd_opt(idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1, 15)
}

/// Détecte les blocs fériés à partir du 1er du mois jusqu'à l'horizon de scan.
pub fn holiday_blocks<C: Calendar + ?Sized>(calendar: &C, year: i32, month: u32) -> Vec<HolidayBlock> {
    let (Some(mut current), Some(limit)) =
        (NaiveDate::from_ymd_opt(year, month, 1), scan_limit(year, month))
    else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    while current <= limit {
        if !calendar.is_holiday(current) {
            let Some(next) = current.succ_opt() else { break };
            current = next;
            continue;
        }

        let dates = collect_block(calendar, current);
        let Some(&end) = dates.last() else { break };
        match (
            nth_working_day_after(calendar, end, 1),
            nth_working_day_after(calendar, end, 2),
        ) {
            (Some(lieu1), Some(lieu2)) => blocks.push(HolidayBlock { dates, lieu1, lieu2 }),
            _ => tracing::warn!(
                block_start = %current,
                block_end = %end,
                "no working day found after holiday block, no compensation will be granted"
            ),
        }

        let Some(next) = end.succ_opt() else { break };
        current = next;
    }
    blocks
}

/// Carte date → (position, récupération) pour tous les jours fériés scannés.
pub fn compute_holiday_map<C: Calendar + ?Sized>(calendar: &C, year: i32, month: u32) -> HolidayMap {
    let mut map = HolidayMap::new();
    for block in holiday_blocks(calendar, year, month) {
        for (idx, date) in block.dates.iter().enumerate() {
            let position = idx as u32 + 1;
            map.insert(
                *date,
                HolidayEntry {
                    position,
                    lieu_date: block.lieu_for_position(position),
                },
            );
        }
    }
    map
}

fn collect_block<C: Calendar + ?Sized>(calendar: &C, start: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = start;
    while calendar.is_holiday(day) && dates.len() < SCAN_SAFETY_DAYS as usize {
        dates.push(day);
        match day.checked_add_signed(Duration::days(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    dates
}
