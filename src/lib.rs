#![forbid(unsafe_code)]
//! Roulement — génération de tableaux de service mensuels (sans BD).
//!
//! - Rotation équitable : moins de vacations d'abord, puis ordre circulaire.
//! - Demandes spéciales épinglées avant le remplissage automatique.
//! - Récupération automatique des jours fériés travaillés.
//! - Calendrier fourni par l'appelant ; stockage fichiers (JSON/CSV).

pub mod calendar;
pub mod config;
pub mod holiday;
pub mod io;
pub mod model;
pub mod render;
pub mod report;
pub mod request;
pub mod scheduler;
pub mod storage;

pub use calendar::{Calendar, HolidayCalendar};
pub use config::{load_inputs_from_file, PreparedRun, RosterInputs};
pub use holiday::{compute_holiday_map, holiday_blocks, HolidayBlock, HolidayEntry};
pub use model::{
    Assignment, CompensationAccrual, DayPlan, RosterOutcome, ShiftCode, ShiftSlot, SpecialRequest,
    StaffId, StationId, Warning,
};
pub use render::{render_outcome, ReportRenderer, TextRenderer};
pub use report::RosterReport;
pub use request::{RequestBook, RequestParser};
pub use scheduler::{
    detect_conflicts, generate_month, Conflict, ConflictKind, RosterConfig, RosterEngine,
    RosterError,
};
pub use storage::{JsonStorage, Storage};
