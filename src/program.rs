use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ProgramEntry;

/// One race of the combined program, with who is down to ride it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedProgramEntry {
    pub date: String,
    pub title: String,
    pub url: String,
    pub flag: String,
    pub participating_1: bool,
    pub participating_2: bool,
}

/// Merge two programs on (title, date), sorted by month then day.
///
/// Details come from the first program that lists a race. Dates that are not
/// `dd.mm` sort after everything else.
pub fn merge_programs(first: &[ProgramEntry], second: &[ProgramEntry]) -> Vec<MergedProgramEntry> {
    let mut combined: IndexMap<(&str, &str), MergedProgramEntry> = IndexMap::new();

    for race in first {
        combined
            .entry((race.title.as_str(), race.date.as_str()))
            .or_insert_with(|| merged(race, true, false));
    }
    for race in second {
        combined
            .entry((race.title.as_str(), race.date.as_str()))
            .and_modify(|m| m.participating_2 = true)
            .or_insert_with(|| merged(race, false, true));
    }

    let mut out: Vec<MergedProgramEntry> = combined.into_values().collect();
    out.sort_by_key(|m| month_day(&m.date).unwrap_or((u32::MAX, u32::MAX)));
    out
}

fn merged(race: &ProgramEntry, participating_1: bool, participating_2: bool) -> MergedProgramEntry {
    MergedProgramEntry {
        date: race.date.clone(),
        title: race.title.clone(),
        url: race.url.clone(),
        flag: race.flag.clone(),
        participating_1,
        participating_2,
    }
}

/// "12.09" → (9, 12).
pub fn month_day(date: &str) -> Option<(u32, u32)> {
    let (day, month) = date.trim().split_once('.')?;
    Some((month.trim().parse().ok()?, day.trim().parse().ok()?))
}
