use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::model::TeamSeason;
use crate::parser::rows::joined_text;

static TEAM_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.rdr-teams2").unwrap());
static SEASON_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li.main").unwrap());
static SEASON: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.season").unwrap());
static NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.name").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// Team per season from a rider page, newest first as listed.
///
/// Only `li.main` rows count; rows without a numeric season or a team link are skipped.
pub fn extract(html: &str) -> Vec<TeamSeason> {
    let doc = Html::parse_document(html);
    let Some(list) = doc.select(&TEAM_LIST).next() else {
        return Vec::new();
    };

    list.select(&SEASON_ITEM)
        .filter_map(|li| {
            let season_text = joined_text(li.select(&SEASON).next()?);
            if season_text.is_empty() || !season_text.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let season = season_text.parse().ok()?;

            let name_div = li.select(&NAME).next()?;
            let link = name_div.select(&LINK).next()?;
            let raw: String = name_div.text().collect();
            let class = CLASS_RE
                .captures(&raw)
                .map(|c| c[1].trim().to_string())
                .unwrap_or_default();

            Some(TeamSeason {
                season,
                team_name: joined_text(link),
                team_url: link.value().attr("href").unwrap_or_default().to_string(),
                class,
            })
        })
        .collect()
}
