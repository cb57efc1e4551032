use super::rows::Row;

// Column layout of the season results table.
pub const DATE_COL: usize = 0;
pub const RESULT_COL: usize = 1;
pub const NAME_COL: usize = 4;
pub const DISTANCE_COL: usize = 5;
pub const PCS_POINTS_COL: usize = 6;
pub const UCI_POINTS_COL: usize = 7;

/// Separator in a stage race's date cell ("01.07 › 23.07").
pub const RANGE_MARKER: char = '›';

const MAIN_TAG: &str = "main";
const STAGE_TAG: &str = "stage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceKind {
    OneDay,
    Stage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Opens a race; the date cell decides which kind.
    RaceStart(RaceKind),
    /// A stage or classification line belonging to the last opened stage race.
    SubResult,
    Unclassified,
}

pub fn classify_row(row: &Row) -> RowKind {
    if row.cells.is_empty() {
        return RowKind::Unclassified;
    }

    if row.has_tag(MAIN_TAG) {
        let kind = if row.text(DATE_COL).contains(RANGE_MARKER) {
            RaceKind::Stage
        } else {
            RaceKind::OneDay
        };
        RowKind::RaceStart(kind)
    } else if row.has_tag(STAGE_TAG) {
        RowKind::SubResult
    } else {
        RowKind::Unclassified
    }
}
