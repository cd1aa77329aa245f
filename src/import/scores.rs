//! Scored sheets, the layout written by the rows export:
//! index, age, event, name, birth year, delegation, five judges, total,
//! rank, medal, row kind.

use super::{cell, single_key, DedupIndex, ImportReport, Layout};
use crate::model::{Entry, Medal, RowFields, RowId, Scores, Table, JUDGE_COUNT};
use crate::scorer::{is_combat_event, parse_rank};
use crate::text::compact;

const COL_AGE: usize = 1;
const COL_EVENT: usize = 2;
const COL_NAME: usize = 3;
const COL_BIRTH: usize = 4;
const COL_TEAM: usize = 5;
const COL_FIRST_JUDGE: usize = 6;
const COL_RANK: usize = 12;
const COL_MEDAL: usize = 13;
const COL_KIND: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportedKind {
    Single,
    Master,
    Member,
}

fn parse_kind(raw: &str) -> ImportedKind {
    match compact(raw).as_str() {
        "team" | "doi" | "teammaster" => ImportedKind::Master,
        "member" | "thanhvien" | "teammember" => ImportedKind::Member,
        _ => ImportedKind::Single,
    }
}

fn entry_from(row: &[String], event: &str) -> Entry {
    let judges: Vec<&str> = (0..JUDGE_COUNT)
        .map(|j| cell(row, COL_FIRST_JUDGE + j))
        .collect();
    let mut entry = Entry {
        scores: Scores::from_texts(&judges),
        pinned_medal: Medal::parse_entry(cell(row, COL_MEDAL)).ok().flatten(),
        ..Entry::default()
    };
    if is_combat_event(event) {
        let rank = parse_rank(cell(row, COL_RANK));
        entry.manual_rank = rank;
        entry.rank = rank;
    }
    entry
}

pub fn import(table: &mut Table, data: &[Vec<String>], index: &mut DedupIndex) -> ImportReport {
    let mut report = ImportReport::new(Layout::Scores);
    // Most recent master; `None` inside means it was a duplicate and its
    // members are dropped with it.
    let mut last_master: Option<Option<(RowId, String, String)>> = None;

    for row in data {
        let name = cell(row, COL_NAME);
        let kind = parse_kind(cell(row, COL_KIND));

        if kind == ImportedKind::Member {
            match &last_master {
                Some(Some((parent, age, event))) if !name.is_empty() => {
                    let fields = RowFields::new(
                        age,
                        event,
                        name,
                        cell(row, COL_BIRTH),
                        cell(row, COL_TEAM),
                    );
                    match table.add_member(parent, fields) {
                        Ok(_) => report.added += 1,
                        Err(_) => report.skipped += 1,
                    }
                }
                Some(None) => report.duplicates += 1,
                _ => report.skipped += 1,
            }
            continue;
        }

        let age = cell(row, COL_AGE);
        let event = cell(row, COL_EVENT);
        if name.is_empty() {
            report.skipped += 1;
            if kind == ImportedKind::Master {
                last_master = None;
            }
            continue;
        }

        let birth_year = cell(row, COL_BIRTH);
        let team = cell(row, COL_TEAM);
        let key = single_key(age, event, name, birth_year, team);
        if !index.insert_single(key) {
            report.duplicates += 1;
            if kind == ImportedKind::Master {
                last_master = Some(None);
            }
            continue;
        }

        let fields = RowFields::new(age, event, name, birth_year, team);
        let entry = entry_from(row, event);
        match kind {
            ImportedKind::Master => {
                let id = table.add_master_with(fields, entry);
                last_master = Some(Some((id, age.to_string(), event.to_string())));
            }
            _ => {
                table.add_single_with(fields, entry);
            }
        }
        report.added += 1;
    }
    report
}
