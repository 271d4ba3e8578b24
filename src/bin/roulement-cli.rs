#![forbid(unsafe_code)]
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use roulement::{
    config::{load_inputs_from_file, parse_year_month, RosterInputs},
    holiday::holiday_blocks,
    io,
    render::{render_outcome, TextRenderer},
    report::StationGrid,
    scheduler::{detect_conflicts, ConflictKind},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de tableaux de service mensuels
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du tableau généré
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

/// Paramètres d'entrée ; les options priment sur le fichier `--config`.
#[derive(Args, Debug)]
struct InputArgs {
    /// Fichier JSON de paramètres (voir `RosterInputs`)
    #[arg(long)]
    config: Option<String>,
    /// Mois cible `YYYY-MM`
    #[arg(long)]
    month: Option<String>,
    #[arg(long)]
    staff: Option<u32>,
    #[arg(long)]
    stations: Option<u32>,
    /// Agent de départ de la rotation (`S50`)
    #[arg(long)]
    start_staff: Option<String>,
    /// Postes sans service du soir, ex. "A1, A5"
    #[arg(long)]
    single_shift: Option<String>,
    /// Fichier texte des demandes spéciales (une par ligne)
    #[arg(long)]
    requests: Option<String>,
    /// CSV des jours fériés: header `date[,name]`
    #[arg(long)]
    holidays: Option<String>,
}

impl InputArgs {
    fn resolve(self) -> Result<RosterInputs> {
        let mut inputs = match &self.config {
            Some(path) => load_inputs_from_file(path)?,
            None => RosterInputs::default(),
        };
        if let Some(month) = self.month {
            inputs.year_month = month;
        }
        if let Some(staff) = self.staff {
            inputs.staff_count = staff;
        }
        if let Some(stations) = self.stations {
            inputs.station_count = stations;
        }
        if let Some(start) = self.start_staff {
            inputs.start_staff = start;
        }
        if let Some(single) = self.single_shift {
            inputs.single_shift_stations = single;
        }
        if let Some(path) = self.requests {
            inputs.special_requests = io::read_requests_file(path)?;
        }
        if let Some(path) = self.holidays {
            for date in io::import_holidays_csv(path)? {
                inputs.calendar.add_holiday(date);
            }
        }
        Ok(inputs)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le tableau du mois et l'enregistrer dans `--roster`
    Generate {
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        out_json: Option<String>,
        /// Grille par poste (CSV)
        #[arg(long)]
        out_grid_csv: Option<String>,
        /// Totaux par agent (CSV)
        #[arg(long)]
        out_totals_csv: Option<String>,
        /// N'affiche pas les tableaux
        #[arg(long)]
        quiet: bool,
    },

    /// Lister les blocs fériés et leurs jours de récupération
    Holidays {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Vérifier un tableau enregistré
    Check {
        /// Export CSV des anomalies (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Afficher un tableau enregistré
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;

    let code = match cli.cmd {
        Commands::Generate {
            inputs,
            out_json,
            out_grid_csv,
            out_totals_csv,
            quiet,
        } => {
            let inputs = inputs.resolve()?;
            let outcome = inputs.generate()?;
            for w in &outcome.warnings {
                match w.line {
                    Some(line) => eprintln!("warning: line {line}: {} ({})", w.message, w.input),
                    None => eprintln!("warning: {} ({})", w.message, w.input),
                }
            }
            storage.save(&outcome)?;
            if let Some(path) = out_json {
                io::export_outcome_json(path, &outcome)?;
            }
            if let Some(path) = out_grid_csv {
                io::export_station_grid_csv(path, &StationGrid::build(&outcome))?;
            }
            if let Some(path) = out_totals_csv {
                io::export_staff_totals_csv(path, &outcome)?;
            }
            if !quiet {
                println!("{}", render_outcome(&outcome, &TextRenderer)?);
            }
            println!(
                "Roster {}-{:02} generated ({} days, {} rejected request(s)) -> {}",
                outcome.year,
                outcome.month,
                outcome.days.len(),
                outcome.rejected_requests.len(),
                cli.roster
            );
            0
        }
        Commands::Holidays { inputs } => {
            let inputs = inputs.resolve()?;
            let (year, month) = parse_year_month(&inputs.year_month)?;
            for block in holiday_blocks(&inputs.calendar, year, month) {
                let dates: Vec<String> = block.dates.iter().map(|d| d.to_string()).collect();
                println!(
                    "{} | lieu {} (days 1-2) / {} (days 3+)",
                    dates.join(", "),
                    block.lieu1,
                    block.lieu2
                );
            }
            0
        }
        Commands::Check { report } => {
            let outcome = storage.load()?;
            let conflicts = detect_conflicts(&outcome);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    // CSV simple
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["date", "slot", "staff", "kind"])?;
                    for c in &conflicts {
                        w.write_record([
                            c.date.to_string(),
                            c.slot.map(|s| s.to_string()).unwrap_or_default(),
                            c.staff.map(|s| s.to_string()).unwrap_or_default(),
                            match c.kind {
                                ConflictKind::OverCapacity => "over_capacity",
                                ConflictKind::DoubleAssignment => "double",
                                ConflictKind::AssignedOnLeave => "on_leave",
                                ConflictKind::Unfilled => "unfilled",
                            }
                            .to_string(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Show => {
            let outcome = storage.load()?;
            println!("{}", render_outcome(&outcome, &TextRenderer)?);
            0
        }
    };

    std::process::exit(code);
}
