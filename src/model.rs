use indexmap::IndexMap;
use serde::Serialize;

/// Race name (category suffix included) → that race's results for one season.
///
/// Keeps first-insertion order. A repeated name replaces the earlier value in place.
pub type SeasonResults = IndexMap<String, RaceResult>;

pub const NOT_FOUND: &str = "not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneDayRaceResult {
    pub date: String,
    pub result: String,
    pub flag: String,
    pub distance_km: String,
    pub pcs_points: String,
    pub uci_points: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StageRaceResult {
    pub date_range: String,
    pub flag: String,
    pub stages: Vec<StageResult>,
    pub classifications: Vec<ClassificationResult>,
}

impl StageRaceResult {
    pub fn new(date_range: String, flag: String) -> Self {
        Self {
            date_range,
            flag,
            ..Default::default()
        }
    }

    /// Adds a classification unless one with the same name (ignoring case) is already present.
    /// Returns whether it was added.
    pub fn add_classification(&mut self, class: ClassificationResult) -> bool {
        let key = class.name.to_lowercase();
        if self
            .classifications
            .iter()
            .any(|c| c.name.to_lowercase() == key)
        {
            return false;
        }
        self.classifications.push(class);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub date: String,
    pub result: String,
    pub distance_km: String,
    pub pcs_points: String,
    pub uci_points: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub name: String,
    pub result: String,
    pub pcs_points: String,
    pub uci_points: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RaceResult {
    OneDay(OneDayRaceResult),
    Stage(StageRaceResult),
}

impl RaceResult {
    pub fn flag(&self) -> &str {
        match self {
            RaceResult::OneDay(r) => &r.flag,
            RaceResult::Stage(r) => &r.flag,
        }
    }

    /// Single date for a one-day race, the date range for a stage race.
    pub fn date(&self) -> &str {
        match self {
            RaceResult::OneDay(r) => &r.date,
            RaceResult::Stage(r) => &r.date_range,
        }
    }

    pub fn is_stage_race(&self) -> bool {
        matches!(self, RaceResult::Stage(_))
    }

    pub fn stages(&self) -> &[StageResult] {
        match self {
            RaceResult::OneDay(_) => &[],
            RaceResult::Stage(r) => &r.stages,
        }
    }

    pub fn classifications(&self) -> &[ClassificationResult] {
        match self {
            RaceResult::OneDay(_) => &[],
            RaceResult::Stage(r) => &r.classifications,
        }
    }
}

/// An upcoming race on a rider's program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramEntry {
    pub date: String,
    pub title: String,
    pub url: String,
    pub flag: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RiderProfile {
    pub date_of_birth: Option<String>,
    pub age: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub nationality: Option<String>,
    pub place_of_birth: Option<String>,
}

impl RiderProfile {
    pub fn is_empty(&self) -> bool {
        *self == RiderProfile::default()
    }
}

/// One season of a rider's team history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSeason {
    pub season: i32,
    pub team_name: String,
    pub team_url: String,
    /// Team level as shown in brackets after the name ("WT", "PRT"); empty when absent.
    pub class: String,
}

/// PCS ranking points and position for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonRanking {
    pub season: i32,
    pub points: u32,
    pub rank: u32,
}

/// Points breakdown from a rider page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiderPoints {
    /// Speciality key ("gc", "time_trial", ...) → points, in page order.
    pub per_speciality: IndexMap<String, u32>,
    pub per_season: Vec<SeasonRanking>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Dnf,
    Dns,
    Unknown,
}

/// A result string read for comparison: a finishing place or a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Numeric(u64),
    Status(Status),
}

impl Rank {
    /// Numeric only when the text is made of ASCII digits and nothing else.
    ///
    /// Surrounding whitespace disqualifies; a place too long for `u64` saturates.
    pub fn parse(raw: &str) -> Rank {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return Rank::Numeric(raw.parse::<u64>().unwrap_or(u64::MAX));
        }
        match raw.to_ascii_uppercase().as_str() {
            "DNF" => Rank::Status(Status::Dnf),
            "DNS" => Rank::Status(Status::Dns),
            _ => Rank::Status(Status::Unknown),
        }
    }

    pub fn place(&self) -> Option<u64> {
        match self {
            Rank::Numeric(n) => Some(*n),
            Rank::Status(_) => None,
        }
    }
}
