pub mod classify;
pub mod extract;
pub mod races;
pub mod rows;

use tracing::debug;

use crate::model::SeasonResults;

/// Two-pass pipeline: page → rows → races.
///
/// A page without a results table yields an empty mapping.
pub fn parse_season_results(html: &str) -> SeasonResults {
    match rows::season_rows(html) {
        Some(rows) => races::assemble_races(&rows),
        None => {
            debug!("No season results table on page");
            SeasonResults::new()
        }
    }
}

// ── Tests ──
