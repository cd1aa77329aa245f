use super::classify::{classify_event, EventKind};
use super::total::row_total_key;
use crate::config::TallyConfig;
use crate::model::{Medal, Row, RowId, Table};
use crate::text::collate;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Comparison group key: exact (age category, event name) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub age_category: String,
    pub event_name: String,
}

impl GroupKey {
    pub fn of(row: &Row) -> Self {
        Self {
            age_category: row.age_category.clone(),
            event_name: row.event_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    pub key: GroupKey,
    pub kind: EventKind,
    /// Positions of the group's singles/masters in the table, in table order.
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecomputeSummary {
    pub performance_groups: usize,
    pub combat_groups: usize,
    pub ranked_rows: usize,
    pub cleared_overrides: usize,
}

/// Partitions the non-member rows into comparison groups, in order of first
/// appearance.
pub fn build_groups(table: &Table) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for (pos, row) in table.rows().iter().enumerate() {
        if row.is_member() {
            continue;
        }
        let key = GroupKey::of(row);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                kind: classify_event(&key.event_name),
                key: key.clone(),
                positions: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].positions.push(pos);
    }
    groups
}

/// Recomputes ranks and auto medals of every performance group, reconciles
/// manual medals and regroups the table. Combat rows keep their committed
/// rank and order.
pub fn recompute(table: &mut Table, config: &TallyConfig) -> RecomputeSummary {
    run(table, config, false)
}

/// The explicit sort action: a full recompute that also commits combat
/// ranks from the final medals and reorders combat rows.
pub fn apply_sort(table: &mut Table, config: &TallyConfig) -> RecomputeSummary {
    run(table, config, true)
}

fn run(table: &mut Table, config: &TallyConfig, sort_combat: bool) -> RecomputeSummary {
    let groups = build_groups(table);
    let mut summary = RecomputeSummary::default();
    let mut order: Vec<usize> = Vec::with_capacity(table.len());

    for group in &groups {
        let ordered = match group.kind {
            EventKind::Performance => {
                summary.performance_groups += 1;
                let ordered = performance_order(table.rows(), &group.positions);
                summary.ranked_rows += assign_performance(table, &ordered, config.double_bronze);
                ordered
            }
            EventKind::Combat => {
                summary.combat_groups += 1;
                for &pos in &group.positions {
                    if let Some(entry) = table.rows_mut()[pos].entry_mut() {
                        entry.auto_medal = None;
                    }
                }
                if sort_combat {
                    let ordered = combat_order(table.rows(), &group.positions);
                    summary.ranked_rows += assign_combat(table, &ordered, config.double_bronze);
                    ordered
                } else {
                    group.positions.clone()
                }
            }
        };
        order.extend(ordered);
    }

    summary.cleared_overrides = reconcile_overrides(table);
    regroup(table, &order);

    debug!(
        "Recomputed {} performance / {} combat groups, {} ranked rows",
        summary.performance_groups, summary.combat_groups, summary.ranked_rows
    );
    summary
}

fn manual_rank_cmp(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn manual_rank(row: &Row) -> Option<u32> {
    row.entry().and_then(|e| e.manual_rank)
}

fn performance_order(rows: &[Row], positions: &[usize]) -> Vec<usize> {
    let mut ordered = positions.to_vec();
    ordered.sort_by(|&a, &b| {
        let (ra, rb) = (&rows[a], &rows[b]);
        row_total_key(rb)
            .cmp(&row_total_key(ra))
            .then_with(|| manual_rank_cmp(manual_rank(ra), manual_rank(rb)))
            .then_with(|| collate(&ra.name, &rb.name))
            .then_with(|| a.cmp(&b))
    });
    ordered
}

fn assign_performance(table: &mut Table, ordered: &[usize], double_bronze: bool) -> usize {
    let mut ranked = 0;
    for (i, &pos) in ordered.iter().enumerate() {
        let positive = row_total_key(&table.rows()[pos]) > 0;
        let Some(entry) = table.rows_mut()[pos].entry_mut() else {
            continue;
        };
        if positive {
            let rank = (i + 1) as u32;
            entry.rank = Some(rank);
            entry.auto_medal = Medal::from_rank(rank, double_bronze);
            ranked += 1;
        } else {
            entry.rank = None;
            entry.auto_medal = None;
        }
    }
    ranked
}

fn medal_order(medal: Option<Medal>) -> u8 {
    match medal {
        Some(Medal::Gold) => 0,
        Some(Medal::Silver) => 1,
        Some(Medal::Bronze) => 2,
        None => 3,
    }
}

fn combat_order(rows: &[Row], positions: &[usize]) -> Vec<usize> {
    let mut ordered = positions.to_vec();
    ordered.sort_by(|&a, &b| {
        let (ra, rb) = (&rows[a], &rows[b]);
        medal_order(ra.final_medal())
            .cmp(&medal_order(rb.final_medal()))
            .then_with(|| manual_rank_cmp(manual_rank(ra), manual_rank(rb)))
            .then_with(|| collate(&ra.name, &rb.name))
            .then_with(|| a.cmp(&b))
    });
    ordered
}

fn assign_combat(table: &mut Table, ordered: &[usize], double_bronze: bool) -> usize {
    let mut gold_taken = false;
    let mut silver_taken = false;
    let mut bronzes = 0;
    let mut ranked = 0;

    for &pos in ordered {
        let medal = table.rows()[pos].final_medal();
        let rank = match medal {
            Some(Medal::Gold) if !gold_taken => {
                gold_taken = true;
                Some(1)
            }
            Some(Medal::Silver) if !silver_taken => {
                silver_taken = true;
                Some(2)
            }
            Some(Medal::Bronze) => {
                bronzes += 1;
                match bronzes {
                    1 => Some(3),
                    2 if double_bronze => Some(4),
                    _ => None,
                }
            }
            _ => None,
        };
        if let Some(entry) = table.rows_mut()[pos].entry_mut() {
            entry.rank = rank;
            if rank.is_some() {
                ranked += 1;
            }
        }
    }
    ranked
}

/// Clears pinned medals that now equal the computed medal.
fn reconcile_overrides(table: &mut Table) -> usize {
    let mut cleared = 0;
    for row in table.rows_mut() {
        if let Some(entry) = row.entry_mut() {
            if entry.pinned_medal.is_some() && entry.pinned_medal == entry.auto_medal {
                entry.pinned_medal = None;
                cleared += 1;
            }
        }
    }
    cleared
}

/// Rebuilds the table in `order` (positions of singles/masters), each
/// master followed by its members.
fn regroup(table: &mut Table, order: &[usize]) {
    let rows = table.rows();
    let mut members: HashMap<&RowId, Vec<usize>> = HashMap::new();
    for (pos, row) in rows.iter().enumerate() {
        if let Some(parent) = row.parent_id() {
            members.entry(parent).or_default().push(pos);
        }
    }

    let mut rebuilt = Vec::with_capacity(rows.len());
    for &pos in order {
        let row = &rows[pos];
        rebuilt.push(row.clone());
        if let Some(list) = members.get(&row.id) {
            rebuilt.extend(list.iter().map(|&m| rows[m].clone()));
        }
    }
    table.replace_order(rebuilt);
}

/// Rows of performance groups that share a rounded positive total with
/// another row of the same group.
pub fn tied_rows(table: &Table) -> HashSet<RowId> {
    let mut tied = HashSet::new();
    for group in build_groups(table) {
        if group.kind != EventKind::Performance {
            continue;
        }
        let mut by_total: HashMap<i64, Vec<&RowId>> = HashMap::new();
        for &pos in &group.positions {
            let row = &table.rows()[pos];
            let key = row_total_key(row);
            if key > 0 {
                by_total.entry(key).or_default().push(&row.id);
            }
        }
        for ids in by_total.into_values().filter(|ids| ids.len() > 1) {
            tied.extend(ids.into_iter().cloned());
        }
    }
    tied
}
