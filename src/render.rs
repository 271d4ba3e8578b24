use crate::model::{DutyRecord, RosterOutcome};
use crate::report::{station_headers, RosterReport};
use anyhow::{bail, Result};
use std::fmt::Write;

/// Permet de customiser le rendu des tableaux (texte, HTML, etc.).
pub trait ReportRenderer {
    fn render(&self, report: &RosterReport) -> String;
}

/// Rendu texte brut des quatre tableaux, pour terminal ou fichier.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

/// Nombre d'entrées par ligne dans le détail d'un agent.
const DETAIL_CHUNK: usize = 8;

impl TextRenderer {
    pub fn daily_summary(&self, report: &RosterReport) -> String {
        let mut out = format!("== Daily summary {}-{:02} ==\n", report.year, report.month);
        out.push_str("date        day  working  station  leave  office\n");
        for row in &report.summary {
            let _ = writeln!(
                out,
                "{}  {}  {:<7}  {:>7}  {:>5}  {:>6}{}",
                row.date,
                row.weekday,
                if row.is_working_day { "yes" } else { "no" },
                row.station_staff,
                row.on_leave,
                row.office,
                if row.is_holiday { "  *" } else { "" },
            );
        }
        out
    }

    pub fn station_roster(&self, report: &RosterReport) -> String {
        let grid = &report.grid;
        let mut out = String::from("== Station roster (* = special) ==\n");

        let labels: Vec<String> = grid.columns.iter().map(|c| c.label()).collect();
        let widths: Vec<usize> = labels.iter().map(|l| l.len().max(5)).collect();

        out.push_str("          ");
        let mut col = 0usize;
        for (station, span) in station_headers(&grid.columns) {
            let width: usize = widths[col..col + span].iter().sum::<usize>() + span;
            let _ = write!(out, " {:<w$}", station.to_string(), w = width - 1);
            col += span;
        }
        out.push('\n');

        out.push_str("date      ");
        for (label, &w) in labels.iter().zip(&widths) {
            let _ = write!(out, " {label:<w$}");
        }
        out.push('\n');

        for row in &grid.rows {
            let _ = write!(out, "{}", row.date);
            for (cell, &w) in row.cells.iter().zip(&widths) {
                let text = match cell {
                    Some(c) if c.special => format!("{}*", c.staff),
                    Some(c) => c.staff.to_string(),
                    None => "-".to_string(),
                };
                let _ = write!(out, " {text:<w$}");
            }
            out.push('\n');
        }
        out
    }

    pub fn staff_totals(&self, report: &RosterReport) -> String {
        let mut out = String::from("== Staff totals ==\n");
        for t in &report.staff {
            let _ = writeln!(out, "{:<5}{:>3} days", t.staff.to_string(), t.count);
        }
        out
    }

    pub fn staff_details(&self, report: &RosterReport) -> String {
        let mut out = String::from("== Staff details (* = special) ==\n");
        for t in &report.staff {
            let _ = writeln!(out, "{} ({} days)", t.staff, t.count);
            if t.details.is_empty() {
                out.push_str("  no duty this month\n");
                continue;
            }
            for chunk in t.details.chunks(DETAIL_CHUNK) {
                let line: Vec<String> = chunk.iter().map(detail_label).collect();
                let _ = writeln!(out, "  {}", line.join(", "));
            }
        }
        out
    }
}

fn detail_label(d: &DutyRecord) -> String {
    format!(
        "{} {} {}{}",
        d.date.format("%m-%d"),
        d.slot.station,
        d.slot.shift,
        if d.special { "*" } else { "" }
    )
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &RosterReport) -> String {
        [
            self.daily_summary(report),
            self.station_roster(report),
            self.staff_totals(report),
            self.staff_details(report),
        ]
        .join("\n")
    }
}

/// Construit les vues d'un résultat et les rend avec `renderer`.
pub fn render_outcome(outcome: &RosterOutcome, renderer: &dyn ReportRenderer) -> Result<String> {
    if outcome.days.is_empty() {
        bail!("roster {} contains no day", outcome.id.as_str());
    }
    let report = RosterReport::from_outcome(outcome);
    Ok(renderer.render(&report))
}
