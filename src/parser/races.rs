use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::classify::*;
use super::rows::Row;
use crate::model::*;

static STAGE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^S\d+\s+").unwrap());
static GLUED_CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^\s])(\(\d.*\))$").unwrap());

const UNKNOWN_RACE: &str = "Unknown Race";
const CLASSIFICATION_MARKER: &str = "classification";

/// Fold state for one assembly pass over a season table.
#[derive(Debug, Default)]
pub struct Assembler {
    races: SeasonResults,
    /// Key of the stage race that sub-result rows attach to.
    current: Option<String>,
}

impl Assembler {
    /// Transition on one row.
    pub fn step(mut self, row: &Row) -> Self {
        match classify_row(row) {
            RowKind::RaceStart(kind) => self.start_race(row, kind),
            RowKind::SubResult => self.add_sub_result(row),
            RowKind::Unclassified => {}
        }
        self
    }

    pub fn finish(self) -> SeasonResults {
        self.races
    }

    fn start_race(&mut self, row: &Row, kind: RaceKind) {
        let name = race_name(row);
        let flag = row
            .cell(NAME_COL)
            .and_then(|c| c.flag.clone())
            .unwrap_or_default();

        match kind {
            RaceKind::Stage => {
                let race = StageRaceResult::new(row.text(DATE_COL).to_string(), flag);
                self.races.insert(name.clone(), RaceResult::Stage(race));
                self.current = Some(name);
            }
            RaceKind::OneDay => {
                let race = OneDayRaceResult {
                    date: row.text(DATE_COL).to_string(),
                    result: row.text(RESULT_COL).to_string(),
                    flag,
                    distance_km: row.text(DISTANCE_COL).to_string(),
                    pcs_points: points(row, PCS_POINTS_COL),
                    uci_points: points(row, UCI_POINTS_COL),
                };
                self.races.insert(name, RaceResult::OneDay(race));
                self.current = None;
            }
        }
    }

    fn add_sub_result(&mut self, row: &Row) {
        let Some(key) = self.current.as_deref() else {
            debug!("Dropping sub-result row with no open stage race");
            return;
        };
        let Some(RaceResult::Stage(race)) = self.races.get_mut(key) else {
            return;
        };

        let description = row
            .cell(NAME_COL)
            .and_then(|c| c.link_text.clone())
            .unwrap_or_default();

        if description.to_lowercase().contains(CLASSIFICATION_MARKER) {
            let result = match row.text(RESULT_COL) {
                "" => "-".to_string(),
                r => r.to_string(),
            };
            let added = race.add_classification(ClassificationResult {
                name: description,
                result,
                pcs_points: points(row, PCS_POINTS_COL),
                uci_points: points(row, UCI_POINTS_COL),
            });
            if !added {
                debug!("Duplicate classification under {}", key);
            }
        } else {
            race.stages.push(StageResult {
                date: row.text(DATE_COL).to_string(),
                result: row.text(RESULT_COL).to_string(),
                distance_km: row.text(DISTANCE_COL).to_string(),
                pcs_points: points(row, PCS_POINTS_COL),
                uci_points: points(row, UCI_POINTS_COL),
                description: STAGE_PREFIX_RE.replace(&description, "").into_owned(),
            });
        }
    }
}

#[cfg(test)]
impl Assembler {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Assemble a flat row sequence into the season's races.
pub fn assemble_races(rows: &[Row]) -> SeasonResults {
    rows.iter().fold(Assembler::default(), Assembler::step).finish()
}

fn race_name(row: &Row) -> String {
    match row.cell(NAME_COL).and_then(|c| c.link_text.as_deref()) {
        Some(name) => GLUED_CATEGORY_RE.replace(name, "$1 $2").into_owned(),
        None => UNKNOWN_RACE.to_string(),
    }
}

/// Point columns are optional; absent or blank reads as "0".
fn points(row: &Row, col: usize) -> String {
    match row.text(col) {
        "" => "0".to_string(),
        p => p.to_string(),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::rows::Cell;

    fn race_start(date: &str, result: &str, name: &str, extra: &[&str]) -> Row {
        let mut cells = vec![
            Cell::plain(date),
            Cell::plain(result),
            Cell::plain(""),
            Cell::plain(""),
            Cell::link(name, "race/x").with_flag("fr"),
        ];
        cells.extend(extra.iter().map(|t| Cell::plain(t)));
        Row::tagged("main", cells)
    }

    fn sub(date: &str, result: &str, desc: &str, extra: &[&str]) -> Row {
        let mut cells = vec![
            Cell::plain(date),
            Cell::plain(result),
            Cell::plain(""),
            Cell::plain(""),
            Cell::link(desc, "race/x/stage"),
        ];
        cells.extend(extra.iter().map(|t| Cell::plain(t)));
        Row::tagged("stage", cells)
    }

    #[test]
    fn one_day_race_defaults_points() {
        let rows = vec![race_start("01.03", "5", "Omloop Het Nieuwsblad (1.UWT)", &["202"])];
        let races = assemble_races(&rows);
        let RaceResult::OneDay(r) = &races["Omloop Het Nieuwsblad (1.UWT)"] else {
            panic!("expected one-day race");
        };
        assert_eq!(r.result, "5");
        assert_eq!(r.distance_km, "202");
        assert_eq!(r.pcs_points, "0");
        assert_eq!(r.uci_points, "0");
        assert_eq!(r.flag, "fr");
    }

    #[test]
    fn stage_race_with_stage_and_classification() {
        let rows = vec![
            race_start("01.07 › 23.07", "", "Tour de France (2.UWT)", &[]),
            sub("01.07", "12", "S1 Bilbao › Bilbao", &["182", "4", ""]),
            sub("", "3", "Youth classification", &["", "60", "40"]),
        ];
        let races = assemble_races(&rows);
        let RaceResult::Stage(r) = &races["Tour de France (2.UWT)"] else {
            panic!("expected stage race");
        };
        assert_eq!(r.date_range, "01.07 › 23.07");
        assert_eq!(r.stages.len(), 1);
        assert_eq!(r.stages[0].description, "Bilbao › Bilbao");
        assert_eq!(r.stages[0].pcs_points, "4");
        assert_eq!(r.stages[0].uci_points, "0");
        assert_eq!(r.classifications.len(), 1);
        assert_eq!(r.classifications[0].name, "Youth classification");
        assert_eq!(r.classifications[0].pcs_points, "60");
    }

    #[test]
    fn empty_classification_result_is_dash() {
        let rows = vec![
            race_start("01.07 › 23.07", "", "Tour de France", &[]),
            sub("", "", "Points classification", &[]),
        ];
        let races = assemble_races(&rows);
        assert_eq!(races["Tour de France"].classifications()[0].result, "-");
    }

    #[test]
    fn duplicate_classifications_dropped() {
        let rows = vec![
            race_start("05.05 › 27.05", "", "Giro d'Italia", &[]),
            sub("", "1", "General classification", &[]),
            sub("", "7", "GENERAL classification", &[]),
            sub("", "2", "Mountains classification", &[]),
        ];
        let races = assemble_races(&rows);
        let classes = races["Giro d'Italia"].classifications();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].result, "1");
    }

    #[test]
    fn orphan_sub_results_skipped() {
        let rows = vec![
            sub("01.07", "12", "S1 Bilbao", &[]),
            race_start("01.03", "5", "Omloop", &[]),
            sub("02.03", "1", "S2 Somewhere", &[]),
        ];
        let races = assemble_races(&rows);
        assert_eq!(races.len(), 1);
        assert!(!races["Omloop"].is_stage_race());
    }

    #[test]
    fn one_day_closes_open_stage_race() {
        let a = Assembler::default()
            .step(&race_start("01.07 › 23.07", "", "Tour", &[]));
        assert_eq!(a.current(), Some("Tour"));
        let a = a.step(&race_start("30.07", "2", "Clasica", &[]));
        assert_eq!(a.current(), None);
        let a = a.step(&sub("31.07", "1", "S1 Late", &[]));
        let races = a.finish();
        assert!(races["Tour"].stages().is_empty());
    }

    #[test]
    fn unclassified_rows_keep_state() {
        let a = Assembler::default()
            .step(&race_start("01.07 › 23.07", "", "Tour", &[]))
            .step(&Row::tagged("sum", vec![Cell::plain("Total")]))
            .step(&Row::tagged("stage", vec![]))
            .step(&sub("02.07", "4", "S2 Flat", &[]));
        assert_eq!(a.current(), Some("Tour"));
        assert_eq!(a.finish()["Tour"].stages().len(), 1);
    }

    #[test]
    fn short_rows_never_panic() {
        let rows = vec![
            Row::tagged("main", vec![Cell::plain("01.03")]),
            Row::tagged("main", vec![Cell::plain("01.07 › 03.07")]),
            Row::tagged("stage", vec![Cell::plain("01.07")]),
        ];
        let races = assemble_races(&rows);
        assert_eq!(races.len(), 1);
        let stages = races[UNKNOWN_RACE].stages();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].description, "");
    }

    #[test]
    fn name_clash_overwrites_in_place() {
        let rows = vec![
            race_start("01.03", "9", "GP", &[]),
            race_start("02.03", "3", "Other", &[]),
            race_start("03.03", "1", "GP", &[]),
        ];
        let races = assemble_races(&rows);
        let names: Vec<&str> = races.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["GP", "Other"]);
        assert_eq!(races["GP"].date(), "03.03");
    }

    #[test]
    fn glued_category_gets_space() {
        let rows = vec![race_start("01.03", "5", "Omloop Het Nieuwsblad(1.UWT)", &[])];
        let races = assemble_races(&rows);
        assert!(races.contains_key("Omloop Het Nieuwsblad (1.UWT)"));
    }

    #[test]
    fn season_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/rider_season.html").unwrap();
        let rows = crate::parser::rows::season_rows(&html).unwrap();
        let races = assemble_races(&rows);
        let names: Vec<&str> = races.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "Tour de France (2.UWT)",
                "Omloop Het Nieuwsblad (1.UWT)",
                "Paris-Nice (2.UWT)",
            ]
        );

        let RaceResult::Stage(tdf) = &races["Tour de France (2.UWT)"] else {
            panic!("expected stage race");
        };
        assert_eq!(tdf.flag, "fr");
        assert_eq!(tdf.stages.len(), 3);
        assert_eq!(tdf.stages[0].description, "Stage 3 | Piacenza - Turin");
        assert_eq!(tdf.classifications.len(), 2);

        let RaceResult::OneDay(omloop) = &races["Omloop Het Nieuwsblad (1.UWT)"] else {
            panic!("expected one-day race");
        };
        assert_eq!(omloop.result, "5");
        assert_eq!(omloop.flag, "be");
        assert_eq!(omloop.pcs_points, "0");

        assert_eq!(races["Paris-Nice (2.UWT)"].stages()[0].result, "DNF");
    }
}
