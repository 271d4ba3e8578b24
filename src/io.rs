use crate::model::RosterOutcome;
use crate::report::StationGrid;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import des jours fériés depuis CSV: header `date[,name]` (YYYY-MM-DD)
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NaiveDate>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let raw = rec.get(0).context("missing date")?.trim();
        if raw.is_empty() {
            bail!("invalid holiday row {} (empty date)", idx + 1);
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid holiday date: {raw}"))?;
        out.push(date);
    }
    Ok(out)
}

/// Lecture du fichier texte des demandes spéciales (une par ligne)
pub fn read_requests_file<P: AsRef<Path>>(path: P) -> anyhow::Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("reading requests {}", path.display()))
}

/// Export JSON du résultat (jolie mise en forme)
pub fn export_outcome_json<P: AsRef<Path>>(path: P, outcome: &RosterOutcome) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(outcome)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV de la grille: header `date,A1 Day(1),A1 Day(2),...`; `*` marque une demande spéciale
pub fn export_station_grid_csv<P: AsRef<Path>>(path: P, grid: &StationGrid) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut header = vec!["date".to_string()];
    header.extend(grid.columns.iter().map(|c| format!("{} {}", c.station, c.label())));
    w.write_record(&header)?;
    for row in &grid.rows {
        let mut record = vec![row.date.to_string()];
        record.extend(row.cells.iter().map(|cell| match cell {
            Some(c) if c.special => format!("{}*", c.staff),
            Some(c) => c.staff.to_string(),
            None => String::new(),
        }));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des totaux: header `staff,days`
pub fn export_staff_totals_csv<P: AsRef<Path>>(path: P, outcome: &RosterOutcome) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["staff", "days"])?;
    for t in &outcome.staff_totals {
        let staff = t.staff.to_string();
        let mut buf = itoa::Buffer::new();
        w.write_record([staff.as_str(), buf.format(t.count)])?;
    }
    w.flush()?;
    Ok(())
}
