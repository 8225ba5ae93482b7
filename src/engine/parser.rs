//! Results-page parsing.
//!
//! Finds the top-level `<table>` elements in an archive page, classifies
//! each one by its header row, and turns every data row into a
//! normalized `ResultRow` carrying the query context.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::types::{QueryKey, ResultRow, RowKind, DOMAIN_COLUMNS};

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector"));
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("static selector"));

/// Header token that marks an individual-results table.
pub const INDIVIDUAL_HEADER_TOKEN: &str = "Contestant";

/// Classification predicate for a table's first row text.
///
/// This is the only rule separating individual from team results; swap it
/// here if the archive ever grows a table that needs a real schema check.
pub fn is_individual_header(first_row_text: &str) -> bool {
    first_row_text.trim_start().starts_with(INDIVIDUAL_HEADER_TOKEN)
}

/// A table lifted out of the page, before context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub kind: RowKind,
    /// Data rows only; the header row is already dropped.
    pub rows: Vec<Vec<String>>,
}

/// Extract every top-level table in the page.
///
/// An empty result means the page carried no results for the query.
pub fn parse_tables(html: &str) -> Vec<ParsedTable> {
    let document = Html::parse_document(html);

    document
        .select(&TABLE)
        .filter(|table| enclosing_table(table).is_none())
        .map(parse_table)
        .collect()
}

/// Parse a page and attach the query context to every row.
///
/// Returns `None` when the page has no table at all.
pub fn parse_page(html: &str, key: &QueryKey) -> Option<Vec<ResultRow>> {
    let tables = parse_tables(html);
    if tables.is_empty() {
        return None;
    }

    let context = key.context_cells();
    let rows = tables
        .into_iter()
        .flat_map(|table| {
            let kind = table.kind;
            table.rows.into_iter().map(move |cells| (kind, cells))
        })
        .map(|(kind, mut cells)| {
            cells.extend(context.iter().cloned());
            ResultRow { kind, cells }
        })
        .collect();

    Some(rows)
}

fn parse_table(table: ElementRef<'_>) -> ParsedTable {
    let mut rows = table
        .select(&ROW)
        .filter(|row| enclosing_table(row).map(|t| t.id()) == Some(table.id()));

    let kind = match rows.next() {
        Some(header) if is_individual_header(&element_text(header)) => RowKind::Individual,
        _ => RowKind::Team,
    };

    let rows = rows
        .map(|row| {
            let mut cells = row_cells(row);
            if kind == RowKind::Individual && cells.len() < DOMAIN_COLUMNS {
                // State-level individual tables have no Advance column.
                cells.resize(DOMAIN_COLUMNS, String::new());
            }
            cells
        })
        .collect();

    ParsedTable { kind, rows }
}

/// Trimmed text of the row's own `<td>` cells.
fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| cell.value().name() == "td")
        .map(|cell| element_text(cell).trim().to_string())
        .collect()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Nearest `<table>` ancestor, if any.
fn enclosing_table<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
