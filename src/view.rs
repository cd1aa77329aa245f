use crate::export::format_score;
use crate::model::{Row, RowId, Table, JUDGE_COUNT};
use crate::scorer::{display_total, is_combat_event, row_total, tied_rows};
use crate::text::fold;
use serde::Serialize;
use std::collections::HashSet;

/// Display record for one table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: RowId,
    /// Running number of singles and team rows; members have none.
    pub index: Option<usize>,
    pub kind: &'static str,
    pub age_category: String,
    pub event_name: String,
    pub name: String,
    pub birth_year: String,
    pub team: String,
    pub scores: [String; JUDGE_COUNT],
    pub total: String,
    pub rank: String,
    pub medal: String,
    pub manual_medal: bool,
    pub combat: bool,
    pub scores_editable: bool,
    pub tied: bool,
}

fn matches(row: &Row, needle: &str) -> bool {
    [&row.name, &row.team, &row.birth_year]
        .iter()
        .any(|field| fold(field).contains(needle))
}

/// Ids visible under `filter`. A team row shows when it or one of its
/// members matches; a member shows when it or its team row matches.
fn visible(table: &Table, needle: &str) -> HashSet<RowId> {
    let mut shown: HashSet<RowId> = HashSet::new();
    for row in table.rows() {
        if !matches(row, needle) {
            continue;
        }
        shown.insert(row.id.clone());
        if let Some(parent) = row.parent_id() {
            shown.insert(parent.clone());
        }
    }
    for row in table.rows() {
        if let Some(parent) = row.parent_id() {
            if matches(row, needle) || table.get(parent).is_some_and(|p| matches(p, needle)) {
                shown.insert(row.id.clone());
            }
        }
    }
    shown
}

pub fn project(table: &Table, filter: Option<&str>) -> Vec<RowView> {
    let tied = tied_rows(table);
    let needle = filter.map(fold).filter(|n| !n.is_empty());
    let shown = needle.as_deref().map(|n| visible(table, n));

    let mut index = 0;
    let mut views = Vec::with_capacity(table.len());
    for row in table.rows() {
        let display_index = if row.is_member() {
            None
        } else {
            index += 1;
            Some(index)
        };
        if shown.as_ref().is_some_and(|s| !s.contains(&row.id)) {
            continue;
        }

        let combat = is_combat_event(&row.event_name);
        let entry = row.entry();
        let scores = match entry {
            Some(e) => e.scores.0.map(|s| s.map(format_score).unwrap_or_default()),
            None => Default::default(),
        };

        views.push(RowView {
            id: row.id.clone(),
            index: display_index,
            kind: row.kind_label(),
            age_category: row.age_category.clone(),
            event_name: row.event_name.clone(),
            name: row.name.clone(),
            birth_year: row.birth_year.clone(),
            team: row.team.clone(),
            scores,
            total: if entry.is_some() { display_total(row_total(row)) } else { String::new() },
            rank: entry
                .and_then(|e| e.rank)
                .map(|r| r.to_string())
                .unwrap_or_default(),
            medal: row
                .final_medal()
                .map(|m| m.label_vi().to_string())
                .unwrap_or_default(),
            manual_medal: entry.is_some_and(|e| e.is_manual_medal()),
            combat,
            scores_editable: entry.is_some() && !combat,
            tied: tied.contains(&row.id),
        });
    }
    views
}
