pub mod registration;
pub mod scores;

use crate::error::TallyResult;
use crate::model::{Row, Table};
use crate::text::{compact, fold};
use std::collections::HashSet;
use strum_macros::Display;
use tracing::{debug, info, warn};

/// Column titles as they lead a folded header cell ("Họ và tên VĐV" starts with
/// "ho va ten").
const HEADER_KEYWORDS: &[&str] = &[
    "stt", "tt", "lua tuoi", "do tuoi", "tuoi", "age", "noi dung", "event", "ho va ten",
    "ho ten", "ten", "name", "nam sinh", "birth", "don vi", "doan", "team", "diem", "score",
    "giam dinh", "gd", "tong", "total", "hang", "xep hang", "rank", "huy chuong", "medal",
    "loai", "kind",
];

const SCORE_HEADER_KEYWORDS: &[&str] = &["diem", "score", "giam dinh", "gd", "tong", "total"];

/// Minimum width of a score-layout row.
pub const SCORE_LAYOUT_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Layout {
    Registration,
    Scores,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub layout: Layout,
    /// Table rows created, members included.
    pub added: usize,
    /// Data rows with nothing usable in them.
    pub skipped: usize,
    /// Entries already present in the table or earlier in the file.
    pub duplicates: usize,
}

impl ImportReport {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            added: 0,
            skipped: 0,
            duplicates: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.duplicates == 0
    }
}

fn detect_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| first.bytes().filter(|b| b == d).count())
        .filter(|d| first.as_bytes().contains(d))
        .unwrap_or(b',')
}

/// Splits CSV text into trimmed cells. Blank lines are dropped.
pub fn read_cells(text: &str) -> TallyResult<Vec<Vec<String>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);
    debug!("CSV delimiter detected: {:?}", delimiter as char);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut cells = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if row.iter().any(|c| !c.is_empty()) {
            cells.push(row);
        }
    }
    Ok(cells)
}

/// Whether a cell opens with one of the keywords on a word boundary, so that
/// "Hạng" matches "hang" while "Đối kháng" and "Thắng" do not.
fn names_column(cell: &str, keywords: &[&str]) -> bool {
    let words = fold(cell).split_whitespace().collect::<Vec<_>>().join(" ");
    keywords.iter().any(|k| {
        words.strip_prefix(k).is_some_and(|rest| {
            rest.chars().next().map_or(true, |c| !c.is_alphabetic())
        })
    })
}

pub fn is_header_row(row: &[String]) -> bool {
    row.iter().filter(|c| names_column(c, HEADER_KEYWORDS)).count() >= 2
}

/// 1 when the first row is a header, else 0. Later rows are always data.
pub fn header_len(cells: &[Vec<String>]) -> usize {
    match cells.first() {
        Some(first) if is_header_row(first) => 1,
        _ => 0,
    }
}

fn used_width(row: &[String]) -> usize {
    row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1)
}

pub fn detect_layout(cells: &[Vec<String>]) -> Layout {
    let headers = &cells[..header_len(cells)];
    let score_header = headers
        .iter()
        .flatten()
        .any(|c| names_column(c, SCORE_HEADER_KEYWORDS));
    if score_header || cells.iter().any(|r| used_width(r) >= SCORE_LAYOUT_WIDTH) {
        Layout::Scores
    } else {
        Layout::Registration
    }
}

pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Normalized identities of everything already in the table, extended as
/// the import adds rows.
#[derive(Debug, Default)]
pub struct DedupIndex {
    singles: HashSet<String>,
    teams: HashSet<String>,
}

pub fn single_key(age: &str, event: &str, name: &str, birth_year: &str, team: &str) -> String {
    [age, event, name, birth_year, team]
        .iter()
        .map(|s| fold(s))
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

pub fn team_key<'a, I>(age: &str, event: &str, team: &str, members: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut roster: Vec<String> = members
        .into_iter()
        .map(|(name, birth)| format!("{}|{}", fold(name), fold(birth)))
        .collect();
    roster.sort();
    format!("{}\u{1f}{}\u{1f}{}\u{1f}{}", fold(age), fold(event), fold(team), roster.join(","))
}

fn row_single_key(row: &Row) -> String {
    single_key(&row.age_category, &row.event_name, &row.name, &row.birth_year, &row.team)
}

impl DedupIndex {
    pub fn from_table(table: &Table) -> Self {
        let mut index = DedupIndex::default();
        for row in table.scored_rows() {
            index.singles.insert(row_single_key(row));
            if row.is_master() {
                let members = table
                    .members_of(&row.id)
                    .map(|m| (m.name.as_str(), m.birth_year.as_str()));
                index
                    .teams
                    .insert(team_key(&row.age_category, &row.event_name, &row.team, members));
            }
        }
        index
    }

    /// Records the key; false when it was already known.
    pub fn insert_single(&mut self, key: String) -> bool {
        self.singles.insert(key)
    }

    pub fn insert_team(&mut self, key: String) -> bool {
        self.teams.insert(key)
    }
}

/// Interprets cells in whichever layout they carry and appends the rows.
pub fn import_cells(table: &mut Table, cells: &[Vec<String>]) -> ImportReport {
    let layout = detect_layout(cells);
    let headers = header_len(cells);
    let data = &cells[headers..];
    let mut index = DedupIndex::from_table(table);

    // Registration sheets may lead with an "STT" index column.
    let offset = match cells.first() {
        Some(first) if headers > 0 && compact(cell(first, 0)) == "stt" => 1,
        _ => 0,
    };

    let report = match layout {
        Layout::Registration => registration::import(table, data, offset, &mut index),
        Layout::Scores => scores::import(table, data, &mut index),
    };

    if report.is_empty() {
        warn!("Import found no valid rows ({} skipped)", report.skipped);
    } else {
        info!(
            "Imported {} layout: {} added, {} duplicates, {} skipped",
            report.layout, report.added, report.duplicates, report.skipped
        );
    }
    report
}
