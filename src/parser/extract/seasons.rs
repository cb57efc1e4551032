use std::sync::LazyLock;

use scraper::{Html, Selector};

static SEASON_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.rdrSeasonNav a.rdrFilterSeason").unwrap());

/// Seasons offered by the season navigation of a rider page, in page order.
pub fn extract(html: &str) -> Vec<i32> {
    let doc = Html::parse_document(html);
    doc.select(&SEASON_LINK)
        .filter_map(|a| a.value().attr("data-season"))
        .filter_map(|s| s.trim().parse::<i32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_data_season() {
        let html = std::fs::read_to_string("tests/fixtures/rider_profile.html").unwrap();
        assert_eq!(extract(&html), vec![2025, 2024, 2023]);
    }

    #[test]
    fn no_nav() {
        assert!(extract("<html></html>").is_empty());
    }
}
