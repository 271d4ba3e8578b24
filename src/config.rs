use crate::calendar::HolidayCalendar;
use crate::model::{RosterOutcome, StaffId, Warning};
use crate::request::{RequestBook, RequestParser};
use crate::scheduler::{generate_month, RosterConfig, RosterError};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Paramètres bruts d'une génération, tels que saisis (fichier JSON ou CLI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterInputs {
    /// `YYYY-MM`
    pub year_month: String,
    pub staff_count: u32,
    pub station_count: u32,
    /// `S<n>` : agent sur lequel démarre la rotation.
    pub start_staff: String,
    /// `"A1, A5"`
    pub single_shift_stations: String,
    /// Une demande par ligne : `S5 2025-12-24 A5 Day`
    pub special_requests: String,
    #[serde(flatten)]
    pub calendar: HolidayCalendar,
}

impl Default for RosterInputs {
    fn default() -> Self {
        Self {
            year_month: Utc::now().format("%Y-%m").to_string(),
            staff_count: 100,
            station_count: 10,
            start_staff: "S50".into(),
            single_shift_stations: "A1, A5".into(),
            special_requests: String::new(),
            calendar: HolidayCalendar::default(),
        }
    }
}

/// Entrées validées, prêtes pour le moteur.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub config: RosterConfig,
    pub requests: RequestBook,
    pub warnings: Vec<Warning>,
}

impl RosterInputs {
    /// Vérifie les erreurs fatales et analyse les champs texte.
    ///
    /// Les lignes invalides deviennent des avertissements, jamais des erreurs.
    pub fn prepare(&self) -> Result<PreparedRun, RosterError> {
        let (year, month) = parse_year_month(&self.year_month)?;
        let start_staff: StaffId = self
            .start_staff
            .trim()
            .parse()
            .map_err(|_| RosterError::UnknownStartStaff(self.start_staff.clone()))?;

        let mut config = RosterConfig::new(year, month, self.staff_count, self.station_count)
            .with_start_staff(start_staff);
        config.validate()?;

        let parser = RequestParser::new(self.staff_count, self.station_count);
        let stations = parser.parse_single_shift_stations(&self.single_shift_stations);
        let requests = parser.parse_special_requests(&self.special_requests);
        config.single_shift_stations = stations.value;

        let mut warnings = stations.warnings;
        warnings.extend(requests.warnings);
        Ok(PreparedRun {
            config,
            requests: requests.value,
            warnings,
        })
    }

    /// Prépare puis génère le mois complet avec le calendrier embarqué.
    pub fn generate(&self) -> Result<RosterOutcome, RosterError> {
        let prepared = self.prepare()?;
        let mut outcome = generate_month(prepared.config, &self.calendar, &prepared.requests)?;
        outcome.warnings = prepared.warnings;
        Ok(outcome)
    }
}

/// `"2025-12"` → `(2025, 12)`.
pub fn parse_year_month(raw: &str) -> Result<(i32, u32), RosterError> {
    let invalid = || RosterError::InvalidYearMonth(raw.to_string());
    let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
    if y.len() != 4 || m.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month: u32 = m.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(RosterError::InvalidMonth { year, month });
    }
    Ok((year, month))
}

pub fn load_inputs_from_file<P: AsRef<Path>>(path: P) -> Result<RosterInputs> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading inputs {}", path.display()))?;
    let inputs: RosterInputs = serde_json::from_slice(&data)
        .with_context(|| format!("parsing inputs {}", path.display()))?;
    Ok(inputs)
}

pub fn export_inputs_json<P: AsRef<Path>>(path: P, inputs: &RosterInputs) -> Result<()> {
    let json = serde_json::to_string_pretty(inputs)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Calendar;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn year_month_parsing() {
        assert_eq!(parse_year_month("2025-12").unwrap(), (2025, 12));
        assert!(matches!(
            parse_year_month("2025-13"),
            Err(RosterError::InvalidMonth { .. })
        ));
        assert!(matches!(
            parse_year_month("2025/12"),
            Err(RosterError::InvalidYearMonth(_))
        ));
        assert!(parse_year_month("25-1").is_err());
    }

    #[test]
    fn prepare_collects_warnings() {
        let inputs = RosterInputs {
            year_month: "2025-12".into(),
            staff_count: 10,
            station_count: 5,
            start_staff: "S5".into(),
            single_shift_stations: "A1, Z9".into(),
            special_requests: "S5 2025-12-24 A5 Day\nnonsense".into(),
            calendar: HolidayCalendar::default(),
        };
        let prepared = inputs.prepare().unwrap();
        assert_eq!(prepared.config.start_staff, StaffId::new(5));
        assert_eq!(prepared.config.single_shift_stations.len(), 1);
        assert_eq!(prepared.requests.len(), 1);
        assert_eq!(prepared.warnings.len(), 2);
    }

    #[test]
    fn zero_staff_is_fatal() {
        let inputs = RosterInputs {
            year_month: "2025-12".into(),
            staff_count: 0,
            ..RosterInputs::default()
        };
        assert!(matches!(inputs.generate(), Err(RosterError::NoStaff)));
    }

    #[test]
    fn inputs_roundtrip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        let mut inputs = RosterInputs {
            year_month: "2025-12".into(),
            ..RosterInputs::default()
        };
        inputs
            .calendar
            .add_holiday(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        export_inputs_json(&path, &inputs).unwrap();

        let loaded = load_inputs_from_file(&path).unwrap();
        assert_eq!(loaded, inputs);
        assert!(loaded
            .calendar
            .is_holiday(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()));
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        fs::write(
            &path,
            r#"{ "year_month": "2026-01", "staff_count": 12, "holidays": ["2026-01-01"] }"#,
        )
        .unwrap();
        let loaded = load_inputs_from_file(&path).unwrap();
        assert_eq!(loaded.staff_count, 12);
        assert_eq!(loaded.station_count, 10);
        assert!(!loaded
            .calendar
            .is_working_day(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }
}
