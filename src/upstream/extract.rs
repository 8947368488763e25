//! League table extraction from the upstream standings page.
//!
//! This is the only place that knows what the upstream markup looks like.
//! When the page layout changes, [`TableLayout::default`] and the column
//! indices below are what needs updating.
//!
//! Expected row shape (one `<tr>` per team, first row is a header):
//!
//! | idx | content                                  |
//! |-----|------------------------------------------|
//! | 0   | position, e.g. `1` or `1.`               |
//! | 1   | team (full name nested in `.team-name-full`, else this cell's text) |
//! | 2-5 | played, won, drawn, lost                 |
//! | 6   | goals as `for:against`                   |
//! | 7   | goal difference                          |
//! | 8   | points                                   |
//! | 9   | optional form icons                      |
//!
//! The team-name fallback reads the team cell (idx 1) rather than the first
//! cell: the first cell holds the rank, so its text would never be a name.
//!
//! Positions are unique per table. When the row selector also hits a second
//! copy of the table (desktop and mobile markup), repeated positions are
//! skipped.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use crate::standings::error::ExtractError;
use crate::standings::models::{FormResult, StandingsRow, MAX_FORM_LEN};

const MIN_CELLS: usize = 9;
const COL_POSITION: usize = 0;
const COL_TEAM: usize = 1;
const COL_PLAYED: usize = 2;
const COL_WON: usize = 3;
const COL_DRAWN: usize = 4;
const COL_LOST: usize = 5;
const COL_GOALS: usize = 6;
const COL_DIFF: usize = 7;
const COL_POINTS: usize = 8;
const COL_FORM: usize = 9;

/// CSS selectors describing the upstream table markup.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub row: Selector,
    pub cell: Selector,
    pub team_full_name: Selector,
    pub form_icon: Selector,
}

impl TableLayout {
    pub fn new(row: &str, cell: &str, team_full_name: &str, form_icon: &str) -> Result<Self, String> {
        let parse = |s: &str| Selector::parse(s).map_err(|e| format!("bad selector '{}': {}", s, e));
        Ok(TableLayout {
            row: parse(row)?,
            cell: parse(cell)?,
            team_full_name: parse(team_full_name)?,
            form_icon: parse(form_icon)?,
        })
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout::new(
            "table.league-table tr",
            "td, th",
            ".team-name-full",
            "[class], [title]",
        )
        .expect("default table selectors are valid")
    }
}

/// Rows plus diagnostics about what was dropped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub rows: Vec<StandingsRow>,
    /// Candidate rows (header excluded) that were not data rows
    pub skipped_rows: usize,
    /// Rows whose form cell had icons but none were recognised as W/D/L
    pub unclassified_form_rows: usize,
}

/// Parse the standings table out of a full HTML document.
#[cfg(test)]
pub fn extract(html: &str) -> Result<Vec<StandingsRow>, ExtractError> {
    extract_with(html, &TableLayout::default()).map(|e| e.rows)
}

/// Parse the standings table with explicit selectors, reporting what was dropped.
pub fn extract_with(html: &str, layout: &TableLayout) -> Result<Extraction, ExtractError> {
    let document = Html::parse_document(html);
    let candidates: Vec<ElementRef> = document.select(&layout.row).collect();
    if candidates.is_empty() {
        return Err(ExtractError::TableNotFound);
    }

    let mut extraction = Extraction {
        rows: Vec::with_capacity(candidates.len()),
        skipped_rows: 0,
        unclassified_form_rows: 0,
    };

    let mut seen_positions = HashSet::new();

    // First matched row is the header.
    for row in candidates.into_iter().skip(1) {
        match parse_row(row, layout) {
            Some((parsed, _)) if !seen_positions.insert(parsed.position) => {
                extraction.skipped_rows += 1;
            }
            Some((parsed, form_unclassified)) => {
                if form_unclassified {
                    extraction.unclassified_form_rows += 1;
                }
                extraction.rows.push(parsed);
            }
            None => extraction.skipped_rows += 1,
        }
    }

    if extraction.rows.is_empty() {
        return Err(ExtractError::NoValidRows);
    }
    Ok(extraction)
}

/// Returns `None` for anything that is not a team row (separators, ads,
/// footers). The bool flags a form cell whose icons could not be read.
fn parse_row(row: ElementRef, layout: &TableLayout) -> Option<(StandingsRow, bool)> {
    let cells: Vec<ElementRef> = row.select(&layout.cell).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let position = parse_position(&cell_text(cells[COL_POSITION]))?;
    let team = team_name(row, cells[COL_TEAM], layout)?;

    let stat = |idx: usize| parse_int(&cell_text(cells[idx])).unwrap_or(0);
    let (goals_for, goals_against) = parse_goals(&cell_text(cells[COL_GOALS]));

    let (form, form_unclassified) = match cells.get(COL_FORM) {
        Some(cell) => parse_form(*cell, layout),
        None => (Vec::new(), false),
    };

    let parsed = StandingsRow {
        position,
        team,
        played: stat(COL_PLAYED),
        won: stat(COL_WON),
        drawn: stat(COL_DRAWN),
        lost: stat(COL_LOST),
        goals_for,
        goals_against,
        goal_difference: stat(COL_DIFF),
        points: stat(COL_POINTS),
        form,
    };
    Some((parsed, form_unclassified))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<Vec<_>>().join(" ")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefer the nested full-name element; the team cell text often also holds
/// a short name or abbreviation.
fn team_name(row: ElementRef, team_cell: ElementRef, layout: &TableLayout) -> Option<String> {
    let full = row
        .select(&layout.team_full_name)
        .next()
        .map(|el| normalize_ws(&cell_text(el)))
        .filter(|s| !s.is_empty());

    let name = full.unwrap_or_else(|| normalize_ws(&cell_text(team_cell)));
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn parse_position(raw: &str) -> Option<u32> {
    let trimmed = raw.trim().trim_end_matches('.');
    trimmed.parse::<u32>().ok().filter(|p| *p > 0)
}

/// Accepts `12`, ` +5 `, `-3` and the Unicode minus sign used by some sites.
fn parse_int(raw: &str) -> Option<i32> {
    let cleaned = raw.trim().replace('\u{2212}', "-");
    cleaned.trim_end_matches('.').parse::<i32>().ok()
}

/// Goals are a single `for:against` cell. Each side falls back to 0 on its own.
fn parse_goals(raw: &str) -> (i32, i32) {
    match raw.split_once(':') {
        Some((f, a)) => (parse_int(f).unwrap_or(0), parse_int(a).unwrap_or(0)),
        None => (0, 0),
    }
}

fn parse_form(cell: ElementRef, layout: &TableLayout) -> (Vec<FormResult>, bool) {
    let mut icons = 0usize;
    let mut form = Vec::new();
    // An icon wrapping another classed element is one result, not two.
    let mut classified_nodes = Vec::new();

    for icon in cell.select(&layout.form_icon) {
        if icon.ancestors().any(|a| classified_nodes.contains(&a.id())) {
            continue;
        }
        icons += 1;
        let el = icon.value();
        let classified = el
            .classes()
            .find_map(FormResult::from_token)
            .or_else(|| el.attr("title").and_then(FormResult::from_title));
        if let Some(result) = classified {
            classified_nodes.push(icon.id());
            form.push(result);
        }
    }

    let unclassified = icons > 0 && form.is_empty();
    form.truncate(MAX_FORM_LEN);
    (form, unclassified)
}
