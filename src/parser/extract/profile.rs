use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::model::RiderProfile;
use crate::parser::rows::joined_text;

static INFO_BOX: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.borderbox.left.w65").unwrap());
static INFO_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul.list").unwrap());
static ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.bold.mr5").unwrap());
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());

/// Personal details from the info box of a rider page.
pub fn extract(html: &str) -> RiderProfile {
    let doc = Html::parse_document(html);
    let mut profile = RiderProfile::default();
    let Some(info) = doc.select(&INFO_BOX).next() else {
        return profile;
    };

    for li in info.select(&INFO_LIST).flat_map(|ul| ul.select(&ITEM)) {
        let Some(label_div) = li.select(&LABEL).next() else {
            continue;
        };
        let label = joined_text(label_div)
            .trim_end_matches(':')
            .trim()
            .to_lowercase();
        let values = values_after_label(li, label_div);

        match label.as_str() {
            "date of birth" => {
                if !values.is_empty() {
                    profile.date_of_birth = Some(values.iter().take(3).cloned().collect::<Vec<_>>().join(" "));
                }
                profile.age = values
                    .iter()
                    .skip(3)
                    .find(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
                    .cloned();
            }
            "weight" => {
                profile.weight = pair(&values, 0);
                profile.height = pair(&values, 3);
            }
            "nationality" => profile.nationality = values.last().cloned(),
            "place of birth" => profile.place_of_birth = values.last().cloned(),
            _ => {}
        }
    }

    profile
}

fn values_after_label(li: ElementRef<'_>, label: ElementRef<'_>) -> Vec<String> {
    li.select(&DIV)
        .filter(|d| d.id() != label.id())
        .map(joined_text)
        .collect()
}

/// "66" + "kg" → "66 kg".
fn pair(values: &[String], at: usize) -> Option<String> {
    match (values.get(at), values.get(at + 1)) {
        (Some(n), Some(unit)) if !n.is_empty() => Some(format!("{} {}", n, unit)),
        _ => None,
    }
}
