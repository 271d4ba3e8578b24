use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Nombre maximal d'agents par créneau et par jour.
pub const SLOT_CAPACITY: usize = 2;

/// Identifiant fort pour un agent (`S1`, `S2`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(u32);

impl StaffId {
    pub fn new(n: u32) -> Self {
        Self(n)
    }
    pub fn get(self) -> u32 {
        self.0
    }
    /// Position dans l'ordre fixe des agents (`S1` → 0).
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("S")?;
        f.write_str(itoa::Buffer::new().format(self.0))
    }
}

impl FromStr for StaffId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, 'S').map(Self)
    }
}

/// Identifiant fort pour un poste (`A1`, `A2`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(u32);

impl StationId {
    pub fn new(n: u32) -> Self {
        Self(n)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("A")?;
        f.write_str(itoa::Buffer::new().format(self.0))
    }
}

impl FromStr for StationId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, 'A').map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier {0:?}")]
pub struct IdParseError(pub String);

/// `<prefix><n>` avec n > 0, sans zéro de tête.
fn parse_prefixed(s: &str, prefix: char) -> Result<u32, IdParseError> {
    let err = || IdParseError(s.to_string());
    let digits = s.strip_prefix(prefix).ok_or_else(err)?;
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(err());
    }
    digits.parse().map_err(|_| err())
}

/// Service du créneau : jour (`早`) ou soir (`晚`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftCode {
    Day,
    Night,
}

impl ShiftCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftCode::Day => "Day",
            ShiftCode::Night => "Night",
        }
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftCode {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Day" | "早" => Ok(ShiftCode::Day),
            "Night" | "晚" => Ok(ShiftCode::Night),
            _ => Err(IdParseError(s.to_string())),
        }
    }
}

/// Créneau (poste, service). Capacité fixe : [`SLOT_CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub station: StationId,
    pub shift: ShiftCode,
}

impl ShiftSlot {
    pub fn new(station: StationId, shift: ShiftCode) -> Self {
        Self { station, shift }
    }
}

impl fmt::Display for ShiftSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.station, self.shift)
    }
}

/// Demande spéciale validée : un agent épinglé sur un créneau à une date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRequest {
    pub staff: StaffId,
    pub date: NaiveDate,
    pub slot: ShiftSlot,
    /// Numéro de ligne (1-based) dans le texte source.
    pub line: usize,
}

/// Un agent sur une instance de créneau pour une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub staff: StaffId,
    pub slot: ShiftSlot,
    pub special: bool,
}

/// Droit à récupération acquis en travaillant un jour férié.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationAccrual {
    pub source_date: NaiveDate,
    pub lieu_date: NaiveDate,
}

/// Ligne de détail d'une vacation d'agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRecord {
    pub date: NaiveDate,
    pub slot: ShiftSlot,
    pub special: bool,
}

/// Bilan d'une journée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub is_working_day: bool,
    pub is_holiday: bool,
    pub assignments: Vec<Assignment>,
    /// Agents en récupération confirmée (triés).
    pub on_leave: Vec<StaffId>,
    /// Agents sans créneau un jour ouvré (triés).
    pub office: Vec<StaffId>,
}

impl DayPlan {
    pub fn assignments_for(&self, slot: ShiftSlot) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments.iter().filter(move |a| a.slot == slot)
    }

    pub fn assignment_of(&self, staff: StaffId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.staff == staff)
    }

    pub fn station_staff_count(&self) -> usize {
        self.assignments.len()
    }

    /// Places restées vides, par créneau, dans l'ordre de `slots`.
    pub fn unfilled(&self, slots: &[ShiftSlot]) -> Vec<(ShiftSlot, usize)> {
        slots
            .iter()
            .filter_map(|slot| {
                let taken = self.assignments_for(*slot).count();
                (taken < SLOT_CAPACITY).then(|| (*slot, SLOT_CAPACITY - taken))
            })
            .collect()
    }
}

/// Total mensuel et détail d'un agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffTotal {
    pub staff: StaffId,
    pub count: u32,
    pub details: Vec<DutyRecord>,
}

/// Droits non consommés à la fin du mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingAccrual {
    pub staff: StaffId,
    pub accrual: CompensationAccrual,
}

/// Catégorie d'avertissement non bloquant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    MalformedRequest,
    UnknownReference,
    MalformedStation,
}

/// Avertissement récupérable : l'entrée est ignorée, la génération continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub line: Option<usize>,
    pub input: String,
    pub message: String,
}

/// Raison du rejet d'une demande spéciale lors de la réconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    UnknownSlot,
    UnknownStaff,
    OnLeave,
    SlotFull,
    AlreadyAssigned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRequest {
    pub request: SpecialRequest,
    pub reason: RejectReason,
}

/// Identifiant d'une génération (pour la persistance).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Résultat complet et immuable d'une génération mensuelle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterOutcome {
    pub id: RunId,
    pub year: i32,
    pub month: u32,
    pub staff_count: u32,
    pub slots: Vec<ShiftSlot>,
    pub days: Vec<DayPlan>,
    pub staff_totals: Vec<StaffTotal>,
    #[serde(default)]
    pub outstanding_accruals: Vec<OutstandingAccrual>,
    #[serde(default)]
    pub rejected_requests: Vec<RejectedRequest>,
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl RosterOutcome {
    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.date == date)
    }
    pub fn total_for(&self, staff: StaffId) -> Option<&StaffTotal> {
        self.staff_totals.iter().find(|t| t.staff == staff)
    }
}
