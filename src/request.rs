//! Analyse des demandes spéciales et de la liste des postes à service unique.
//!
//! Une entrée invalide n'arrête jamais la génération : elle est ignorée et un
//! [`Warning`] est enregistré.

use crate::model::{
    ShiftCode, ShiftSlot, SpecialRequest, StaffId, StationId, Warning, WarningKind,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Demandes valides, groupées par date, dans l'ordre du texte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBook {
    by_date: BTreeMap<NaiveDate, Vec<SpecialRequest>>,
}

impl RequestBook {
    pub fn push(&mut self, request: SpecialRequest) {
        self.by_date.entry(request.date).or_default().push(request);
    }

    pub fn for_date(&self, date: NaiveDate) -> &[SpecialRequest] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecialRequest> + '_ {
        self.by_date.values().flatten()
    }
}

/// Résultat d'une analyse : valeurs retenues + avertissements.
#[derive(Debug, Clone, Default)]
pub struct Parsed<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

/// Bornes connues pour valider les références (`S1..=staff`, `A1..=stations`).
#[derive(Debug, Clone, Copy)]
pub struct RequestParser {
    pub staff_count: u32,
    pub station_count: u32,
}

impl RequestParser {
    pub fn new(staff_count: u32, station_count: u32) -> Self {
        Self {
            staff_count,
            station_count,
        }
    }

    /// Format par ligne : `<S<n>> <YYYY-MM-DD> <A<n>> <Day|Night|早|晚>`.
    pub fn parse_special_requests(&self, raw: &str) -> Parsed<RequestBook> {
        let mut out = Parsed::<RequestBook>::default();
        for (idx, line) in raw.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.parse_request_line(trimmed, line_no) {
                Ok(request) => out.value.push(request),
                Err((kind, message)) => {
                    tracing::warn!(line = line_no, input = trimmed, "{message}");
                    out.warnings.push(Warning {
                        kind,
                        line: Some(line_no),
                        input: trimmed.to_string(),
                        message,
                    });
                }
            }
        }
        out
    }

    fn parse_request_line(
        &self,
        line: &str,
        line_no: usize,
    ) -> Result<SpecialRequest, (WarningKind, String)> {
        let malformed = |msg: String| (WarningKind::MalformedRequest, msg);
        let parts: Vec<&str> = line.split_whitespace().collect();
        let &[staff_raw, date_raw, station_raw, shift_raw] = parts.as_slice() else {
            return Err(malformed(format!(
                "expected 4 fields, found {}",
                parts.len()
            )));
        };

        let staff: StaffId = staff_raw
            .parse()
            .map_err(|_| malformed(format!("invalid staff id {staff_raw:?}")))?;
        let date = parse_date(date_raw)
            .ok_or_else(|| malformed(format!("invalid date {date_raw:?}")))?;
        let station: StationId = station_raw
            .parse()
            .map_err(|_| malformed(format!("invalid station id {station_raw:?}")))?;
        let shift: ShiftCode = shift_raw
            .parse()
            .map_err(|_| malformed(format!("unknown shift code {shift_raw:?}")))?;

        if staff.get() > self.staff_count {
            return Err((
                WarningKind::UnknownReference,
                format!("staff {staff} out of range (1..={})", self.staff_count),
            ));
        }
        if station.get() > self.station_count {
            return Err((
                WarningKind::UnknownReference,
                format!("station {station} out of range (1..={})", self.station_count),
            ));
        }

        Ok(SpecialRequest {
            staff,
            date,
            slot: ShiftSlot::new(station, shift),
            line: line_no,
        })
    }

    /// Liste séparée par des virgules, insensible à la casse (`"A1, a5"`).
    pub fn parse_single_shift_stations(&self, raw: &str) -> Parsed<BTreeSet<StationId>> {
        let mut out = Parsed::<BTreeSet<StationId>>::default();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let upper = token.to_uppercase();
            let message = match upper.parse::<StationId>() {
                Ok(station) if station.get() <= self.station_count => {
                    out.value.insert(station);
                    continue;
                }
                Ok(station) => format!(
                    "station {station} out of range (1..={})",
                    self.station_count
                ),
                Err(_) => format!("invalid station token {token:?}"),
            };
            tracing::warn!(input = token, "{message}");
            out.warnings.push(Warning {
                kind: WarningKind::MalformedStation,
                line: None,
                input: token.to_string(),
                message,
            });
        }
        out
    }
}

/// Strictement `YYYY-MM-DD`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let b = raw.as_bytes();
    let shape_ok = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
