use crate::config::{RankingMode, TallyConfig};
use crate::model::{Medal, Row, Table};
use crate::text::{collate, fold};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub fn add(&mut self, medal: Medal) {
        match medal {
            Medal::Gold => self.gold += 1,
            Medal::Silver => self.silver += 1,
            Medal::Bronze => self.bronze += 1,
        }
    }

    pub fn sum(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }
}

/// One leaderboard line. For delegations `team` repeats `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyEntry {
    pub rank: u32,
    pub name: String,
    pub team: String,
    pub birth_year: String,
    pub medals: MedalCount,
    pub sum: u32,
    pub points: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboards {
    pub athletes: Vec<TallyEntry>,
    pub delegations: Vec<TallyEntry>,
}

#[derive(Default)]
struct Accumulator {
    name: String,
    team: String,
    birth_year: String,
    medals: MedalCount,
}

#[derive(Default)]
struct Tally {
    order: Vec<(String, String)>,
    map: HashMap<(String, String), Accumulator>,
}

impl Tally {
    fn credit(&mut self, name: &str, team: &str, birth_year: &str, medal: Medal) {
        let key = (fold(name), fold(team));
        let acc = self.map.entry(key.clone()).or_insert_with(|| {
            self.order.push(key);
            Accumulator {
                name: name.trim().to_string(),
                team: team.trim().to_string(),
                ..Default::default()
            }
        });
        if acc.birth_year.is_empty() {
            acc.birth_year = birth_year.trim().to_string();
        }
        acc.medals.add(medal);
    }

    fn into_entries(mut self, config: &TallyConfig) -> Vec<TallyEntry> {
        let mut entries: Vec<TallyEntry> = self
            .order
            .iter()
            .filter_map(|key| self.map.remove(key))
            .map(|acc| TallyEntry {
                rank: 0,
                sum: acc.medals.sum(),
                points: config.weights.points(
                    acc.medals.gold,
                    acc.medals.silver,
                    acc.medals.bronze,
                ),
                name: acc.name,
                team: acc.team,
                birth_year: acc.birth_year,
                medals: acc.medals,
            })
            .collect();

        entries.sort_by(|a, b| compare_entries(a, b, config.ranking_mode));
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = (i + 1) as u32;
        }
        entries
    }
}

/// Points (score mode only), then gold, silver, bronze descending, then
/// name and delegation by collation.
pub fn compare_entries(a: &TallyEntry, b: &TallyEntry, mode: RankingMode) -> Ordering {
    let by_points = match mode {
        RankingMode::Score => b.points.total_cmp(&a.points),
        RankingMode::Count => Ordering::Equal,
    };
    by_points
        .then_with(|| b.medals.gold.cmp(&a.medals.gold))
        .then_with(|| b.medals.silver.cmp(&a.medals.silver))
        .then_with(|| b.medals.bronze.cmp(&a.medals.bronze))
        .then_with(|| collate(&a.name, &b.name))
        .then_with(|| collate(&a.team, &b.team))
}

/// Names credited by a single row: "A / B" pairs credit each side.
pub fn split_pair_names(name: &str) -> Vec<&str> {
    if name.contains('/') {
        name.split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed]
        }
    }
}

fn qualifying(row: &Row) -> Option<Medal> {
    if row.is_member() || row.team.trim().is_empty() {
        return None;
    }
    row.final_medal()
}

/// Scans finalized rows and builds the athlete and delegation leaderboards.
pub fn build_leaderboards(table: &Table, config: &TallyConfig) -> Leaderboards {
    let mut athletes = Tally::default();
    let mut delegations = Tally::default();

    for row in table.rows() {
        let Some(medal) = qualifying(row) else {
            continue;
        };

        delegations.credit(&row.team, &row.team, "", medal);

        if row.is_master() {
            for member in table.members_of(&row.id) {
                if member.name.trim().is_empty() {
                    continue;
                }
                let team = if member.team.trim().is_empty() {
                    &row.team
                } else {
                    &member.team
                };
                athletes.credit(&member.name, team, &member.birth_year, medal);
            }
        } else {
            let names = split_pair_names(&row.name);
            let birth_year = if names.len() == 1 { row.birth_year.as_str() } else { "" };
            for name in names {
                athletes.credit(name, &row.team, birth_year, medal);
            }
        }
    }

    Leaderboards {
        athletes: athletes.into_entries(config),
        delegations: delegations.into_entries(config),
    }
}
