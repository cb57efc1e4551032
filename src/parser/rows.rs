use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static SEASON_CONTAINER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#rdrResultCont").unwrap());
static RESULTS_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.borderbox.w68.left.mb_w100").unwrap());
static RESULTS_TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table.results").unwrap());
static TBODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static FLAG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.flag").unwrap());

/// One table cell, flattened to the parts the extractors read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    pub classes: Vec<String>,
    pub link_text: Option<String>,
    pub link_href: Option<String>,
    pub flag: Option<String>,
}

impl Cell {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// One `<tr>`: its CSS classes (the row tags) and its cells in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub tags: Vec<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn cell(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }

    /// Cell text, or "" when the cell is missing.
    pub fn text(&self, idx: usize) -> &str {
        self.cells.get(idx).map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// Rows of the season results table on a rider page.
///
/// `None` when the page has no results container or the container has no body.
pub fn season_rows(html: &str) -> Option<Vec<Row>> {
    let doc = Html::parse_document(html);
    let container = doc.select(&SEASON_CONTAINER).next()?;
    let tbody = container.select(&TBODY).next()?;
    Some(child_rows(tbody))
}

/// Body rows of the results table on a race result page.
pub fn result_rows(html: &str) -> Option<Vec<Row>> {
    let doc = Html::parse_document(html);
    let container = doc.select(&RESULTS_CONTAINER).next()?;
    let table = container.select(&RESULTS_TABLE).next()?;
    let tbody = table.select(&TBODY).next()?;
    Some(child_rows(tbody))
}

fn child_rows(tbody: ElementRef<'_>) -> Vec<Row> {
    tbody
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(build_row)
        .collect()
}

fn build_row(tr: ElementRef<'_>) -> Row {
    Row {
        tags: tr.value().classes().map(str::to_string).collect(),
        cells: tr.select(&TD).map(build_cell).collect(),
    }
}

fn build_cell(td: ElementRef<'_>) -> Cell {
    let link = td.select(&LINK).next();
    Cell {
        text: joined_text(td),
        classes: td.value().classes().map(str::to_string).collect(),
        link_text: link.map(joined_text),
        link_href: link.and_then(|a| a.value().attr("href")).map(str::to_string),
        flag: td.select(&FLAG).next().and_then(flag_code),
    }
}

/// Visible text with every text node trimmed and the non-empty pieces joined by one space.
pub fn joined_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Country code carried as the second class of a `span.flag` ("flag be" → "be").
pub fn flag_code(span: ElementRef<'_>) -> Option<String> {
    span.value()
        .classes()
        .filter(|c| *c != "flag")
        .last()
        .map(str::to_string)
}

#[cfg(test)]
impl Cell {
    pub fn plain(text: &str) -> Self {
        Cell {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn link(text: &str, href: &str) -> Self {
        Cell {
            text: text.to_string(),
            link_text: Some(text.to_string()),
            link_href: Some(href.to_string()),
            ..Default::default()
        }
    }

    pub fn with_flag(mut self, code: &str) -> Self {
        self.flag = Some(code.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }
}

#[cfg(test)]
impl Row {
    pub fn tagged(tag: &str, cells: Vec<Cell>) -> Self {
        Row {
            tags: vec![tag.to_string()],
            cells,
        }
    }
}
