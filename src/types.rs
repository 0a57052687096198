//! Shared types for the wager ledger.
//!
//! These types form the data model used across storage, aggregation and
//! presentation. Raw form input (`WagerForm`) is turned into a validated
//! `WagerRecord` by [`validate_form`]; the store hands back `StoredWager`s.

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Sport the wager was placed on.
///
/// The four sports offered by the entry form are typed variants. Any other
/// non-empty label is kept verbatim so that rows written by older tools
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sport {
    Football,
    Basketball,
    Hockey,
    Baseball,
    Other(String),
}

impl Sport {
    /// Labels offered by the entry form, in display order.
    pub const KNOWN: [&'static str; 4] = ["Football", "Basketball", "Hockey", "Baseball"];

    pub fn as_str(&self) -> &str {
        match self {
            Sport::Football => "Football",
            Sport::Basketball => "Basketball",
            Sport::Hockey => "Hockey",
            Sport::Baseball => "Baseball",
            Sport::Other(label) => label,
        }
    }

    /// Whether this is one of the form's fixed choices.
    pub fn is_known(&self) -> bool {
        !matches!(self, Sport::Other(_))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parse a sport label (case-insensitive for the known sports).
impl FromStr for Sport {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        match label.to_lowercase().as_str() {
            "" => Err(ValidationError::MissingField("sport")),
            "football" => Ok(Sport::Football),
            "basketball" => Ok(Sport::Basketball),
            "hockey" => Ok(Sport::Hockey),
            "baseball" => Ok(Sport::Baseball),
            _ => Ok(Sport::Other(label.to_string())),
        }
    }
}

impl TryFrom<String> for Sport {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sport> for String {
    fn from(sport: Sport) -> Self {
        sport.as_str().to_string()
    }
}

/// Kind of wager. Known types are typed; anything else is kept as a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetType {
    Moneyline,
    Total,
    Spread,
    Other(String),
}

impl BetType {
    pub const KNOWN: [&'static str; 3] = ["Moneyline", "Total", "Spread"];

    pub fn as_str(&self) -> &str {
        match self {
            BetType::Moneyline => "Moneyline",
            BetType::Total => "Total",
            BetType::Spread => "Spread",
            BetType::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BetType::Other(_))
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BetType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        match label.to_lowercase().as_str() {
            "" => Err(ValidationError::MissingField("bet_type")),
            "moneyline" => Ok(BetType::Moneyline),
            "total" => Ok(BetType::Total),
            "spread" => Ok(BetType::Spread),
            _ => Ok(BetType::Other(label.to_string())),
        }
    }
}

impl TryFrom<String> for BetType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BetType> for String {
    fn from(bet_type: BetType) -> Self {
        bet_type.as_str().to_string()
    }
}

/// Settled result of a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Win, Outcome::Loss];

    /// Label as stored in the `outcome` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Err(ValidationError::MissingField("outcome")),
            "win" => Ok(Outcome::Win),
            "loss" => Ok(Outcome::Loss),
            _ => Err(ValidationError::UnknownOutcome(s.trim().to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Wager records
// ---------------------------------------------------------------------------

/// Largest stake accepted.
pub const MAX_STAKE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest decimal odds accepted.
pub const MAX_ODDS: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Identity assigned by the store on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WagerId(pub i64);

impl fmt::Display for WagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One logged bet that satisfies the ledger invariants:
/// `0 < stake <= MAX_STAKE`, `1 < odds <= MAX_ODDS`, non-empty labels.
///
/// The bounds keep every profit and running total well inside `Decimal`
/// range, so aggregation never overflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerRecord {
    pub sport: Sport,
    /// Amount risked.
    pub stake: Decimal,
    /// Decimal odds; a win returns `stake * odds` in total.
    pub odds: Decimal,
    pub outcome: Outcome,
    pub bet_type: BetType,
}

impl fmt::Display for WagerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}: ${:.2} @ {} ({})",
            self.bet_type, self.sport, self.stake, self.odds, self.outcome,
        )
    }
}

impl WagerRecord {
    /// Build a record, rejecting values that break the ledger invariants.
    pub fn new(
        sport: Sport,
        stake: Decimal,
        odds: Decimal,
        outcome: Outcome,
        bet_type: BetType,
    ) -> Result<Self, ValidationError> {
        let record = Self { sport, stake, odds, outcome, bet_type };
        record.validate()?;
        Ok(record)
    }

    /// Re-check the invariants on an existing value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sport.as_str().trim().is_empty() {
            return Err(ValidationError::MissingField("sport"));
        }
        if self.stake <= Decimal::ZERO {
            return Err(ValidationError::StakeNotPositive(self.stake));
        }
        if self.stake > MAX_STAKE {
            return Err(ValidationError::StakeTooLarge(self.stake));
        }
        if self.odds <= Decimal::ONE {
            return Err(ValidationError::OddsTooLow(self.odds));
        }
        if self.odds > MAX_ODDS {
            return Err(ValidationError::OddsTooHigh(self.odds));
        }
        if self.bet_type.as_str().trim().is_empty() {
            return Err(ValidationError::MissingField("bet_type"));
        }
        Ok(())
    }

    /// Profit (positive) or loss (negative) of this wager.
    pub fn profit(&self) -> Decimal {
        match self.outcome {
            Outcome::Win => self.stake * (self.odds - Decimal::ONE),
            Outcome::Loss => -self.stake,
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// A record as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWager {
    pub id: WagerId,
    #[serde(flatten)]
    pub record: WagerRecord,
}

impl fmt::Display for StoredWager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.record)
    }
}

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Raw entry-form values, exactly as typed. Absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WagerForm {
    pub sport: String,
    #[serde(deserialize_with = "lenient_text")]
    pub stake: String,
    #[serde(deserialize_with = "lenient_text")]
    pub odds: String,
    pub outcome: String,
    pub bet_type: String,
}

/// Accept JSON numbers and null for numeric form fields.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("expected text or number, got {other}"))),
    }
}

/// Turn raw form values into a validated record.
///
/// Checks run in the order the form shows them: every field present,
/// then stake and odds numeric, then outcome, then ranges.
pub fn validate_form(form: &WagerForm) -> Result<WagerRecord, ValidationError> {
    let fields = [
        ("sport", &form.sport),
        ("stake", &form.stake),
        ("odds", &form.odds),
        ("outcome", &form.outcome),
        ("bet_type", &form.bet_type),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(name));
        }
    }

    let stake = parse_decimal("stake", &form.stake)?;
    let odds = parse_decimal("odds", &form.odds)?;
    let outcome: Outcome = form.outcome.parse()?;

    WagerRecord::new(form.sport.parse()?, stake, odds, outcome, form.bet_type.parse()?)
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::NotNumeric {
            field,
            value: trimmed.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Rejected wager input. Nothing is stored when one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields must be filled in! ({0} is missing)")]
    MissingField(&'static str),

    #[error("Invalid input! Please enter numbers for Amount and Odds ({field}: {value:?})")]
    NotNumeric { field: &'static str, value: String },

    #[error("Outcome must be Win or Loss, got {0:?}")]
    UnknownOutcome(String),

    #[error("Stake must be greater than zero, got {0}")]
    StakeNotPositive(Decimal),

    #[error("Decimal odds must be greater than 1, got {0}")]
    OddsTooLow(Decimal),

    #[error("Stake must be at most {}, got {0}", MAX_STAKE)]
    StakeTooLarge(Decimal),

    #[error("Decimal odds must be at most {}, got {0}", MAX_ODDS)]
    OddsTooHigh(Decimal),

    #[error("{field} {value} has more digits than the ledger can store; enter fewer decimal places")]
    NotStorable { field: &'static str, value: String },
}

/// Errors raised by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Corrupt wager row {id}: {reason} (correct or delete row {id} of the bets table to recover)")]
    CorruptRow { id: i64, reason: String },
}

impl LedgerError {
    /// Whether the caller should re-prompt for input rather than report a fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
