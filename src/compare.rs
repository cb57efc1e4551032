use std::cmp::Ordering;
use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::Serialize;

use crate::model::{Rank, RaceResult, SeasonResults};

static STAGE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Stage (\d+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    #[serde(rename = "name1")]
    Rider1,
    #[serde(rename = "name2")]
    Rider2,
    #[serde(rename = "tie")]
    Tie,
    /// At least one side has no numeric place.
    #[serde(rename = "none")]
    Undecided,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub race: String,
    pub flag: String,
    pub date: String,
    pub stage_or_class: Option<String>,
    pub name1_result: String,
    pub name2_result: String,
    pub winner: Winner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HeadToHead {
    pub rider1_wins: usize,
    pub rider2_wins: usize,
    pub ties: usize,
    pub undecided: usize,
}

/// Lower place wins; anything that is not a plain number leaves the item undecided.
pub fn decide_winner(result1: &str, result2: &str) -> Winner {
    match (Rank::parse(result1), Rank::parse(result2)) {
        (Rank::Numeric(a), Rank::Numeric(b)) => match a.cmp(&b) {
            Ordering::Less => Winner::Rider1,
            Ordering::Greater => Winner::Rider2,
            Ordering::Equal => Winner::Tie,
        },
        _ => Winner::Undecided,
    }
}

/// Sort key for a sub-result name: the stage number, or `u32::MAX` for anything unnumbered.
pub fn stage_sort_key(name: &str) -> u32 {
    STAGE_NUMBER_RE
        .captures(name)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(u32::MAX)
}

/// Line up two riders' seasons race by race.
///
/// Races follow rider 1's order; races only one of them rode are left out.
pub fn compare_results(first: &SeasonResults, second: &SeasonResults) -> Vec<ComparisonEntry> {
    let mut out = Vec::new();

    for (race, a) in first {
        let Some(b) = second.get(race) else {
            continue;
        };

        if a.is_stage_race() || b.is_stage_race() {
            compare_sub_results(race, a, b, &mut out);
        } else if let (RaceResult::OneDay(r1), RaceResult::OneDay(r2)) = (a, b) {
            out.push(ComparisonEntry {
                race: race.clone(),
                flag: a.flag().to_string(),
                date: a.date().to_string(),
                stage_or_class: None,
                name1_result: r1.result.clone(),
                name2_result: r2.result.clone(),
                winner: decide_winner(&r1.result, &r2.result),
            });
        }
    }

    out
}

pub fn tally(entries: &[ComparisonEntry]) -> HeadToHead {
    entries.iter().fold(HeadToHead::default(), |mut acc, e| {
        match e.winner {
            Winner::Rider1 => acc.rider1_wins += 1,
            Winner::Rider2 => acc.rider2_wins += 1,
            Winner::Tie => acc.ties += 1,
            Winner::Undecided => acc.undecided += 1,
        }
        acc
    })
}

struct SubResult<'a> {
    date: &'a str,
    result: &'a str,
}

/// Stages and classifications of one side, keyed by name as written.
struct SubResults<'a> {
    stages: IndexMap<&'a str, SubResult<'a>>,
    classes: IndexMap<&'a str, SubResult<'a>>,
}

impl<'a> SubResults<'a> {
    fn of(race: &'a RaceResult) -> Self {
        let stages = race
            .stages()
            .iter()
            .map(|s| (s.description.as_str(), SubResult { date: &s.date, result: &s.result }))
            .collect();
        let classes = race
            .classifications()
            .iter()
            .map(|c| (c.name.as_str(), SubResult { date: "", result: &c.result }))
            .collect();
        Self { stages, classes }
    }

    fn get(&self, name: &str) -> Option<&SubResult<'a>> {
        self.stages.get(name).or_else(|| self.classes.get(name))
    }
}

fn compare_sub_results(race: &str, a: &RaceResult, b: &RaceResult, out: &mut Vec<ComparisonEntry>) {
    let subs1 = SubResults::of(a);
    let subs2 = SubResults::of(b);

    let mut names: Vec<&str> = subs1
        .stages
        .keys()
        .chain(subs2.stages.keys())
        .chain(subs1.classes.keys())
        .chain(subs2.classes.keys())
        .copied()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();
    // stable: unnumbered names keep encounter order behind the numbered stages
    names.sort_by_key(|n| stage_sort_key(n));

    for name in names {
        let (Some(s1), Some(s2)) = (subs1.get(name), subs2.get(name)) else {
            continue;
        };

        let date = [s1.date, s2.date, a.date()]
            .into_iter()
            .find(|d| !d.is_empty())
            .unwrap_or("");

        out.push(ComparisonEntry {
            race: race.to_string(),
            flag: a.flag().to_string(),
            date: date.to_string(),
            stage_or_class: Some(name.to_string()),
            name1_result: s1.result.to_string(),
            name2_result: s2.result.to_string(),
            winner: decide_winner(s1.result, s2.result),
        });
    }
}
