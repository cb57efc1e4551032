use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::model::ProgramEntry;
use crate::parser::rows::{flag_code, joined_text};

static PROGRAM_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.list.dashed.flex.pad2").unwrap());
static ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static DATE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.bold").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.ellipsis").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static FLAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.flag").unwrap());

/// Upcoming races listed on a rider page, in page order.
///
/// Items keep their place even when a field is missing; the field is left empty.
pub fn extract(html: &str) -> Vec<ProgramEntry> {
    let doc = Html::parse_document(html);
    let Some(list) = doc.select(&PROGRAM_LIST).next() else {
        return Vec::new();
    };

    list.select(&ITEM)
        .map(|li| {
            let date = li.select(&DATE).next().map(joined_text).unwrap_or_default();
            let title_div = li.select(&TITLE).next();
            let link = title_div.and_then(|d| d.select(&LINK).next());
            let flag = title_div
                .and_then(|d| d.select(&FLAG).next())
                .and_then(flag_code)
                .unwrap_or_default();

            ProgramEntry {
                date,
                title: link.map(joined_text).unwrap_or_default(),
                url: link
                    .and_then(|a| a.value().attr("href"))
                    .unwrap_or_default()
                    .to_string(),
                flag,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_fixture_program() {
        let html = std::fs::read_to_string("tests/fixtures/rider_profile.html").unwrap();
        let program = extract(&html);
        assert_eq!(program.len(), 4);
        assert_eq!(
            program[0],
            ProgramEntry {
                date: "12.09".into(),
                title: "GP Québec".into(),
                url: "race/gp-quebec/2025".into(),
                flag: "ca".into(),
            }
        );
        assert_eq!(program[2].title, "Il Lombardia");
        assert_eq!(program[3].date, "");
        assert_eq!(program[3].title, "");
    }

    #[test]
    fn no_list_is_empty() {
        assert!(extract("<html><body><ul class=\"list\"></ul></body></html>").is_empty());
    }
}
