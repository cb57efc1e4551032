use std::sync::LazyLock;

use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};

use crate::model::{RiderPoints, SeasonRanking};
use crate::parser::rows::joined_text;

static SPECIALITY_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.pps.list li").unwrap());
static VALUE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".xvalue").unwrap());
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".xtitle a").unwrap());
static H4: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4").unwrap());
static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table tbody tr").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static CELL_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td .title").unwrap());

const RANKING_HEADER: &str = "pcs ranking position per season";
const RANKING_BLOCK_CLASS: &str = "mt20";

pub fn extract(html: &str) -> RiderPoints {
    let doc = Html::parse_document(html);
    RiderPoints {
        per_speciality: per_speciality(&doc),
        per_season: per_season(&doc),
    }
}

fn per_speciality(doc: &Html) -> IndexMap<String, u32> {
    doc.select(&SPECIALITY_ITEM)
        .filter_map(|li| {
            let value = joined_text(li.select(&VALUE).next()?).parse().ok()?;
            let title = joined_text(li.select(&TITLE_LINK).next()?);
            Some((speciality_key(&title), value))
        })
        .collect()
}

/// Page label → snake_case key ("Onedayraces" → "one_day_races", "TT" → "time_trial").
pub fn speciality_key(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    match lower.as_str() {
        "onedayraces" => "one_day_races".to_string(),
        "tt" => "time_trial".to_string(),
        _ => lower.split_whitespace().collect::<Vec<_>>().join("_"),
    }
}

/// Rows of the table under the "PCS Ranking position per season" heading.
///
/// Numbers are read from the digits of each cell; a cell without digits reads 0.
fn per_season(doc: &Html) -> Vec<SeasonRanking> {
    let Some(block) = doc
        .select(&H4)
        .find(|h| joined_text(*h).to_lowercase().contains(RANKING_HEADER))
        .and_then(ranking_block)
    else {
        return Vec::new();
    };

    block
        .select(&TABLE_ROW)
        .filter_map(|tr| {
            let tds: Vec<ElementRef<'_>> = tr.select(&TD).collect();
            if tds.len() < 3 {
                return None;
            }
            let points_text = match tr.select(&CELL_TITLE).next() {
                Some(title) => joined_text(title),
                None => joined_text(tds[1]),
            };
            Some(SeasonRanking {
                season: digits(&joined_text(tds[0])) as i32,
                points: digits(&points_text),
                rank: digits(&joined_text(tds[tds.len() - 1])),
            })
        })
        .collect()
}

fn ranking_block(header: ElementRef<'_>) -> Option<ElementRef<'_>> {
    header
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div" && el.value().classes().any(|c| c == RANKING_BLOCK_CLASS))
}

/// "5,240" → 5240; no digits → 0.
fn digits(text: &str) -> u32 {
    let only: String = text.chars().filter(char::is_ascii_digit).collect();
    only.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> RiderPoints {
        extract(&std::fs::read_to_string("tests/fixtures/rider_profile.html").unwrap())
    }

    #[test]
    fn speciality_points_fixture() {
        let points = fixture();
        let keys: Vec<&str> = points.per_speciality.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["one_day_races", "gc", "time_trial", "sprint", "climber", "hills"]
        );
        assert_eq!(points.per_speciality["gc"], 7890);
        assert_eq!(points.per_speciality["time_trial"], 1234);
    }

    #[test]
    fn season_ranking_fixture() {
        let points = fixture();
        assert_eq!(
            points.per_season,
            vec![
                SeasonRanking { season: 2024, points: 5240, rank: 1 },
                SeasonRanking { season: 2023, points: 3765, rank: 2 },
            ]
        );
    }

    #[test]
    fn keys_for_unlisted_labels() {
        assert_eq!(speciality_key(" GC "), "gc");
        assert_eq!(speciality_key("One day  races"), "one_day_races");
        assert_eq!(speciality_key("Cobbles"), "cobbles");
    }

    #[test]
    fn missing_sections() {
        let points = extract("<html><body><h4>PCS Ranking position per season</h4></body></html>");
        assert!(points.per_speciality.is_empty());
        assert!(points.per_season.is_empty());
    }
}
