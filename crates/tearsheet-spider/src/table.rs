use crate::{FinancialCategory, Result, SpiderError};
use scraper::{ElementRef, Html, Selector};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Text FT renders in place of the tables when the symbol is unknown.
pub const NO_RESULTS: &str = "No results were returned for";

// statement
// ----------------------------------------------------------------------------

/// A report table, as an ordered mapping of row label -> remaining cells of that row.
///
/// Row order and column order follow the source table. Labels are unique: a label seen a
/// second time replaces the earlier row's values, but keeps the earlier row's position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statement {
    rows: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, returning the values it replaced if the label was already present.
    pub fn insert(&mut self, label: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        let label = label.into();
        match self.index.get(&label) {
            Some(&i) => Some(std::mem::replace(&mut self.rows[i].1, values)),
            None => {
                self.index.insert(label.clone(), self.rows.len());
                self.rows.push((label, values));
                None
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.index.get(label).map(|&i| self.rows[i].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
    }

    /// Widest row, counting the label column.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|(_, values)| values.len() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Serialize for Statement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (label, values) in &self.rows {
            map.serialize_entry(label, values)?;
        }
        map.end()
    }
}

impl<L: Into<String>> FromIterator<(L, Vec<String>)> for Statement {
    fn from_iter<I: IntoIterator<Item = (L, Vec<String>)>>(iter: I) -> Self {
        let mut statement = Statement::new();
        for (label, values) in iter {
            statement.insert(label, values);
        }
        statement
    }
}

// parsing
// ----------------------------------------------------------------------------

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector should parse")
}

/// Concatenated text of an element, with runs of whitespace collapsed to one space.
pub fn cell_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The first text node announcing an unknown symbol, if the page has one.
pub fn no_results(document: &Html) -> Option<String> {
    document
        .root_element()
        .text()
        .find(|text| text.contains(NO_RESULTS))
        .map(|text| text.trim().to_string())
}

/// First table on the page holding a row that reads exactly the category's marker.
pub fn find_table<'a>(document: &'a Html, category: FinancialCategory) -> Option<ElementRef<'a>> {
    let tables = selector("table");
    let rows = selector("tr");
    let marker = category.marker();

    document
        .select(&tables)
        .enumerate()
        .find(|(_, table)| table.select(&rows).any(|row| cell_text(&row) == marker))
        .map(|(i, table)| {
            debug!("{category} table found at index {i}");
            table
        })
}

/// Walk a table's rows into a [`Statement`].
///
/// A row's cells are its `<td>` elements, or its `<th>` elements when it has no `<td>`.
/// The first cell is the label; rows without any cell are skipped.
pub fn parse_statement(table: ElementRef) -> Statement {
    let rows = selector("tr");
    let data = selector("td");
    let header = selector("th");

    let mut statement = Statement::new();
    for row in table.select(&rows) {
        let mut cells: Vec<String> = row.select(&data).map(|cell| cell_text(&cell)).collect();
        if cells.is_empty() {
            cells = row.select(&header).map(|cell| cell_text(&cell)).collect();
        }
        if cells.is_empty() {
            trace!("skipping row without cells");
            continue;
        }

        let values = cells.split_off(1);
        let label = cells.swap_remove(0);
        if let Some(replaced) = statement.insert(label.as_str(), values) {
            trace!("row label {label:?} repeated; replaced {} values", replaced.len());
        }
    }

    statement
}

/// Extract the category's [`Statement`] from a raw tearsheet page.
pub fn extract(html: &str, category: FinancialCategory) -> Result<Statement> {
    let document = Html::parse_document(html);

    if let Some(message) = no_results(&document) {
        return Err(SpiderError::NoResults(message));
    }

    let table = find_table(&document, category).ok_or(SpiderError::TableNotFound { category })?;
    Ok(parse_statement(table))
}
