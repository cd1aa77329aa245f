use super::row::{Entry, Field, Row, RowFields, RowId, RowKind, JUDGE_COUNT};
use crate::error::{TallyError, TallyResult};
use std::collections::HashSet;
use tracing::warn;

/// The single competition table. Owns every row and enforces the
/// master/member ownership invariant.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    rng: fastrand::Rng,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic ids, for tests and benchmarks.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rows: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Rebuilds a table from stored rows. Rows violating the ownership
    /// invariant are dropped and reported.
    pub fn from_rows(rows: Vec<Row>) -> (Self, Vec<String>) {
        let mut table = Table::new();
        let mut warnings = Vec::new();
        let mut seen: HashSet<RowId> = HashSet::new();

        let masters: HashSet<RowId> = rows
            .iter()
            .filter(|r| r.is_master())
            .map(|r| r.id.clone())
            .collect();

        for row in rows {
            if !seen.insert(row.id.clone()) {
                let message = format!("Dropping row '{}' with duplicate id {}", row.name, row.id);
                warn!("{message}");
                warnings.push(message);
                continue;
            }
            if let Some(parent) = row.parent_id() {
                if !masters.contains(parent) {
                    let message = format!(
                        "Dropping member '{}': team row {} does not exist",
                        row.name, parent
                    );
                    warn!("{message}");
                    warnings.push(message);
                    continue;
                }
            }
            table.rows.push(row);
        }

        table.group_members_after_masters();
        (table, warnings)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id == id)
    }

    pub fn get(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == id)
    }

    pub fn get_mut(&mut self, id: &RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| &r.id == id)
    }

    pub fn require(&self, id: &RowId) -> TallyResult<&Row> {
        self.get(id)
            .ok_or_else(|| TallyError::UnknownRow(id.to_string()))
    }

    pub fn require_mut(&mut self, id: &RowId) -> TallyResult<&mut Row> {
        self.get_mut(id)
            .ok_or_else(|| TallyError::UnknownRow(id.to_string()))
    }

    pub fn members_of<'a>(&'a self, master: &'a RowId) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows
            .iter()
            .filter(move |r| r.parent_id() == Some(master))
    }

    /// Rows that take part in ranking: singles and team masters.
    pub fn scored_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.is_member())
    }

    fn fresh_id(&mut self) -> RowId {
        loop {
            let id = RowId::generate(&mut self.rng);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn build(&mut self, fields: RowFields, kind: RowKind) -> Row {
        Row {
            id: self.fresh_id(),
            age_category: fields.age_category,
            event_name: fields.event_name,
            name: fields.name,
            birth_year: fields.birth_year,
            team: fields.team,
            kind,
        }
    }

    pub fn add_single(&mut self, fields: RowFields) -> RowId {
        self.add_single_with(fields, Entry::default())
    }

    pub fn add_single_with(&mut self, fields: RowFields, entry: Entry) -> RowId {
        let row = self.build(fields, RowKind::Single(entry));
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    pub fn add_master(&mut self, fields: RowFields) -> RowId {
        self.add_master_with(fields, Entry::default())
    }

    pub fn add_master_with(&mut self, fields: RowFields, entry: Entry) -> RowId {
        let row = self.build(fields, RowKind::TeamMaster(entry));
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    /// Adds a member directly after the master's existing members.
    pub fn add_member(&mut self, parent: &RowId, fields: RowFields) -> TallyResult<RowId> {
        let parent_pos = self
            .position(parent)
            .ok_or_else(|| TallyError::UnknownRow(parent.to_string()))?;
        if !self.rows[parent_pos].is_master() {
            return Err(TallyError::Validation(format!(
                "Row {} is not a team row and cannot own members",
                parent
            )));
        }

        let mut insert_at = parent_pos + 1;
        while insert_at < self.rows.len() && self.rows[insert_at].parent_id() == Some(parent) {
            insert_at += 1;
        }

        let row = self.build(
            fields,
            RowKind::TeamMember {
                parent_id: parent.clone(),
            },
        );
        let id = row.id.clone();
        self.rows.insert(insert_at, row);
        Ok(id)
    }

    /// Deletes a row; deleting a team master also deletes its members.
    /// Returns the number of rows removed.
    pub fn delete(&mut self, id: &RowId) -> TallyResult<usize> {
        self.require(id)?;
        let before = self.rows.len();
        self.rows
            .retain(|r| &r.id != id && r.parent_id() != Some(id));
        Ok(before - self.rows.len())
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn set_field(&mut self, id: &RowId, field: Field, value: &str) -> TallyResult<()> {
        let row = self.require_mut(id)?;
        let value = value.trim().to_string();
        match field {
            Field::AgeCategory => row.age_category = value,
            Field::EventName => row.event_name = value,
            Field::Name => row.name = value,
            Field::BirthYear => row.birth_year = value,
            Field::Team => row.team = value,
        }
        Ok(())
    }

    /// `judge` is zero-based.
    pub fn set_score(&mut self, id: &RowId, judge: usize, value: Option<f64>) -> TallyResult<()> {
        if judge >= JUDGE_COUNT {
            return Err(TallyError::Validation(format!(
                "Judge index {} out of range (1-{})",
                judge + 1,
                JUDGE_COUNT
            )));
        }
        let row = self.require_mut(id)?;
        let entry = row.entry_mut().ok_or_else(|| {
            TallyError::Validation(format!("Team member {} has no scores", id))
        })?;
        entry.scores.set(judge, value);
        Ok(())
    }

    pub(crate) fn replace_order(&mut self, rows: Vec<Row>) {
        debug_assert_eq!(rows.len(), self.rows.len());
        self.rows = rows;
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// Moves every member directly behind its master, keeping relative order.
    fn group_members_after_masters(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        let (members, others): (Vec<Row>, Vec<Row>) = rows.into_iter().partition(Row::is_member);
        let mut ordered = Vec::with_capacity(members.len() + others.len());
        for row in others {
            let id = row.id.clone();
            ordered.push(row);
            ordered.extend(members.iter().filter(|m| m.parent_id() == Some(&id)).cloned());
        }
        self.rows = ordered;
    }

    pub fn to_rows(&self) -> Vec<Row> {
        self.rows.clone()
    }
}
