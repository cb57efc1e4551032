use crate::model::NOT_FOUND;
use crate::names::identity_fragment;
use crate::parser::rows::{result_rows, Row};

const RIDER_CELL_CLASS: &str = "ridername";

/// Rank column text of the first row whose rider link contains `fragment`.
///
/// Matching is a case-insensitive substring test, so "van-der-poel" hits
/// whichever Van der Poel comes first in the table.
pub fn find_rank(fragment: &str, rows: &[Row]) -> Option<String> {
    let needle = fragment.to_lowercase();
    rows.iter()
        .find(|row| {
            row.cells
                .iter()
                .find(|c| c.has_class(RIDER_CELL_CLASS))
                .and_then(|c| c.link_href.as_deref())
                .is_some_and(|href| href.to_lowercase().contains(&needle))
        })
        .map(|row| row.text(0).to_string())
}

/// The rider's rank or status on a race result page, or "not found".
pub fn rider_result(html: &str, rider: &str) -> String {
    result_rows(html)
        .and_then(|rows| find_rank(&identity_fragment(rider), &rows))
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::rows::Cell;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/race_result.html").unwrap()
    }

    #[test]
    fn finds_rank_by_name() {
        let html = fixture();
        assert_eq!(rider_result(&html, "Wout van Aert"), "2");
        assert_eq!(rider_result(&html, "Mathieu van der Poel"), "3");
        assert_eq!(rider_result(&html, "Tom Pidcock"), "DNF");
    }

    #[test]
    fn first_match_wins_on_shared_fragment() {
        let html = fixture();
        assert_eq!(rider_result(&html, "van der Poel"), "3");
    }

    #[test]
    fn missing_rider_or_table() {
        assert_eq!(rider_result(&fixture(), "Remco Evenepoel"), NOT_FOUND);
        assert_eq!(rider_result("<html><body></body></html>", "Wout van Aert"), NOT_FOUND);
    }

    #[test]
    fn rows_without_rider_cell_are_ignored() {
        let rows = vec![
            Row {
                tags: vec![],
                cells: vec![Cell::plain("1"), Cell::link("x", "rider/wout-van-aert")],
            },
            Row {
                tags: vec![],
                cells: vec![
                    Cell::plain("7"),
                    Cell::link("VAN AERT Wout", "/Rider/Wout-Van-Aert").with_class("ridername"),
                ],
            },
        ];
        assert_eq!(find_rank("wout-van-aert", &rows).as_deref(), Some("7"));
    }

    #[test]
    fn accented_name_matches_ascii_link() {
        let html = r#"<div class="borderbox w68 left mb_w100"><table class="results"><tbody>
            <tr><td>1</td><td class="ridername"><a href="rider/tadej-pogacar">POGAČAR Tadej</a></td></tr>
        </tbody></table></div>"#;
        assert_eq!(rider_result(html, "Tadej Pogačar"), "1");
    }
}
