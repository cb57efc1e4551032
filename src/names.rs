use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DISALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]").unwrap());
static DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Turn a free-form rider or race name into the URL path fragment PCS uses.
///
/// "Tadej Pogačar" → "tadej-pogacar", "Tour de France" → "tour-de-france".
pub fn reformat_name(name: &str) -> String {
    let folded = deunicode::deunicode(name).to_lowercase();
    let dashed = WHITESPACE_RE.replace_all(&folded, "-");
    let cleaned = DISALLOWED_RE.replace_all(&dashed, "");
    let collapsed = DASHES_RE.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Fragment matched against rider links in a results table.
///
/// ASCII-folds, lowercases and dash-joins; rider links on PCS carry no accents.
pub fn identity_fragment(name: &str) -> String {
    deunicode::deunicode(name).to_lowercase().replace(' ', "-")
}

pub fn rider_url(base: &str, rider: &str) -> String {
    format!("{}/rider/{}", base, reformat_name(rider))
}

pub fn rider_season_url(base: &str, rider: &str, season: i32) -> String {
    format!("{}/{}", rider_url(base, rider), season)
}

pub fn race_url(base: &str, race: &str) -> String {
    format!("{}/race/{}", base, reformat_name(race))
}

pub fn race_result_url(base: &str, race: &str, season: i32) -> String {
    format!("{}/{}/result", race_url(base, race), season)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents() {
        assert_eq!(reformat_name("Tadej Pogačar"), "tadej-pogacar");
        assert_eq!(reformat_name("Primož Roglič"), "primoz-roglic");
    }

    #[test]
    fn strips_punctuation_and_collapses_dashes() {
        assert_eq!(reformat_name("  Mathieu  van der Poel "), "mathieu-van-der-poel");
        assert_eq!(reformat_name("Ben O'Connor"), "ben-oconnor");
        assert_eq!(reformat_name("Liège - Bastogne - Liège"), "liege-bastogne-liege");
        assert_eq!(reformat_name("--x--"), "x");
    }

    #[test]
    fn fragment_folds_accents() {
        assert_eq!(identity_fragment("Tadej Pogačar"), "tadej-pogacar");
        assert_eq!(identity_fragment("van der Poel"), "van-der-poel");
        assert_eq!(identity_fragment("Wout van Aert"), "wout-van-aert");
    }

    #[test]
    fn urls() {
        let base = "https://www.procyclingstats.com";
        assert_eq!(
            rider_season_url(base, "Wout van Aert", 2024),
            "https://www.procyclingstats.com/rider/wout-van-aert/2024"
        );
        assert_eq!(
            race_result_url(base, "Tour de France", 2023),
            "https://www.procyclingstats.com/race/tour-de-france/2023/result"
        );
    }
}
