use crate::config::TallyConfig;
use crate::debounce::{Debouncer, PERSIST_QUIET, RECOMPUTE_QUIET};
use crate::error::{TallyError, TallyResult};
use crate::import::{import_cells, read_cells, ImportReport};
use crate::model::{Field, RowFields, RowId, Table};
use crate::scorer::tally::{build_leaderboards, Leaderboards};
use crate::scorer::{self, is_combat_event, MedalEntry, RecomputeSummary};
use crate::storage::{parse_state, SerializedState, StateStore};
use crate::text::parse_score;
use crate::view::{project, RowView};
use std::time::Instant;
use strum_macros::Display;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the operator. Failures that must not interrupt the
/// session are reported this way instead of as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// The live competition: the table, its configuration, and the pending
/// recompute and persistence work.
///
/// Every mutation takes the current instant. Edits made while typing
/// (scores, names) schedule a recompute after a short quiet period;
/// structural changes recompute immediately. Persistence is always
/// debounced unless `save_now` is called.
#[derive(Debug)]
pub struct Session {
    table: Table,
    config: TallyConfig,
    recalc: Debouncer,
    persist: Debouncer,
    notices: Vec<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TallyConfig::default())
    }
}

impl Session {
    pub fn new(config: TallyConfig) -> Self {
        Self::with_table(Table::new(), config)
    }

    pub fn with_table(table: Table, mut config: TallyConfig) -> Self {
        config.weights = config.weights.sanitized();
        let mut session = Self {
            table,
            config,
            recalc: Debouncer::new(RECOMPUTE_QUIET),
            persist: Debouncer::new(PERSIST_QUIET),
            notices: Vec::new(),
        };
        session.recompute_now();
        session
    }

    /// Restores the stored state. Unreadable state leaves an empty table
    /// with `fallback` and a warning.
    pub fn open(store: &dyn StateStore, fallback: TallyConfig) -> Self {
        match store.load() {
            Ok(Some(state)) => {
                let (table, config, dropped) = state.into_parts();
                let mut session = Self::with_table(table, config);
                for message in dropped {
                    session.notify(NoticeLevel::Warning, message);
                }
                info!("Restored {} rows", session.table.len());
                session
            }
            Ok(None) => Self::new(fallback),
            Err(e) => {
                let mut session = Self::new(fallback);
                session.notify(
                    NoticeLevel::Warning,
                    format!("Saved data could not be read and was ignored: {}", e),
                );
                session
            }
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn recompute_pending(&self) -> bool {
        self.recalc.is_pending()
    }

    pub fn save_pending(&self) -> bool {
        self.persist.is_pending()
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Info => info!("{}", message),
            NoticeLevel::Warning => warn!("{}", message),
            NoticeLevel::Error => error!("{}", message),
        }
        self.notices.push(Notice { level, message });
    }

    fn recompute_now(&mut self) -> RecomputeSummary {
        self.recalc.cancel();
        scorer::recompute(&mut self.table, &self.config)
    }

    /// Runs a pending debounced recompute right away.
    fn settle(&mut self) {
        if self.recalc.is_pending() {
            self.recompute_now();
        }
    }

    fn changed(&mut self, now: Instant) {
        self.recompute_now();
        self.persist.schedule(now);
    }

    fn edited(&mut self, now: Instant) {
        self.recalc.schedule(now);
        self.persist.schedule(now);
    }

    // --- Configuration ---

    pub fn set_config(&mut self, mut config: TallyConfig, now: Instant) {
        config.weights = config.weights.sanitized();
        if config != self.config {
            self.config = config;
            self.changed(now);
        }
    }

    // --- Rows ---

    pub fn add_single(&mut self, fields: RowFields, now: Instant) -> RowId {
        let id = self.table.add_single(fields);
        self.changed(now);
        id
    }

    /// Adds a team row with its members. A blank team name becomes the
    /// member names joined by " / ".
    pub fn add_team(
        &mut self,
        mut fields: RowFields,
        members: Vec<RowFields>,
        now: Instant,
    ) -> TallyResult<RowId> {
        if fields.name.is_empty() {
            fields.name = members
                .iter()
                .map(|m| m.name.as_str())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(" / ");
        }
        let master = self.table.add_master(fields);
        for member in members {
            self.table.add_member(&master, member)?;
        }
        self.changed(now);
        Ok(master)
    }

    pub fn add_member(&mut self, parent: &RowId, fields: RowFields, now: Instant) -> TallyResult<RowId> {
        let id = self.table.add_member(parent, fields)?;
        self.changed(now);
        Ok(id)
    }

    pub fn delete(&mut self, id: &RowId, now: Instant) -> TallyResult<usize> {
        let removed = self.table.delete(id)?;
        self.changed(now);
        Ok(removed)
    }

    /// `judge` is zero-based. Unusable text clears the score.
    pub fn edit_score(&mut self, id: &RowId, judge: usize, raw: &str, now: Instant) -> TallyResult<()> {
        let row = self.table.require(id)?;
        if is_combat_event(&row.event_name) {
            return Err(TallyError::Validation(format!(
                "Row {} is in a combat event and takes no scores",
                id
            )));
        }
        self.table.set_score(id, judge, parse_score(raw))?;
        self.edited(now);
        Ok(())
    }

    /// A row that lands in a different combat group drops its committed rank;
    /// only a manual rank or the next sort ranks it there.
    pub fn edit_field(&mut self, id: &RowId, field: Field, value: &str, now: Instant) -> TallyResult<()> {
        let row = self.table.require(id)?;
        let before = (row.age_category.clone(), row.event_name.clone());
        self.table.set_field(id, field, value)?;

        let row = self.table.require_mut(id)?;
        let moved = before != (row.age_category.clone(), row.event_name.clone());
        if moved && is_combat_event(&row.event_name) {
            if let Some(entry) = row.entry_mut() {
                entry.rank = entry.manual_rank;
            }
        }
        self.edited(now);
        Ok(())
    }

    /// Medal text is compared against the medal computed from the latest
    /// scores, so any pending recompute runs first.
    pub fn enter_medal(&mut self, id: &RowId, raw: &str, now: Instant) -> TallyResult<MedalEntry> {
        self.settle();
        let outcome = scorer::enter_medal(&mut self.table, id, raw)?;
        if let MedalEntry::Rejected(text) = &outcome {
            let message = format!("Medal '{}' was not recognised; use V, B or Đ", text);
            self.notify(NoticeLevel::Warning, message);
        }
        self.changed(now);
        Ok(outcome)
    }

    pub fn enter_rank(&mut self, id: &RowId, rank: Option<u32>, now: Instant) -> TallyResult<()> {
        scorer::enter_rank(&mut self.table, id, rank)?;
        self.changed(now);
        Ok(())
    }

    /// Commits combat ranks and order from the entered medals.
    pub fn apply_sort(&mut self, now: Instant) -> RecomputeSummary {
        self.recalc.cancel();
        let summary = scorer::apply_sort(&mut self.table, &self.config);
        self.persist.schedule(now);
        summary
    }

    pub fn reset(&mut self, store: &mut dyn StateStore) {
        self.table.clear();
        self.recalc.cancel();
        self.persist.cancel();
        if let Err(e) = store.clear() {
            self.notify(NoticeLevel::Error, format!("Failed to clear saved data: {}", e));
        }
    }

    // --- Import / export ---

    pub fn import_cells(&mut self, cells: &[Vec<String>], now: Instant) -> ImportReport {
        self.settle();
        let report = import_cells(&mut self.table, cells);
        if report.is_empty() {
            self.notify(NoticeLevel::Warning, "No valid rows found");
        } else {
            self.notify(
                NoticeLevel::Info,
                format!(
                    "Added {} rows; {} duplicates and {} unusable rows skipped",
                    report.added, report.duplicates, report.skipped
                ),
            );
        }
        if report.added > 0 {
            self.changed(now);
        }
        report
    }

    /// Imports CSV text. An unreadable file is reported and changes nothing.
    pub fn import_csv(&mut self, text: &str, now: Instant) -> Option<ImportReport> {
        match read_cells(text) {
            Ok(cells) => Some(self.import_cells(&cells, now)),
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not read file: {}", e));
                None
            }
        }
    }

    /// Replaces the table with a JSON export. Returns false, leaving the
    /// table untouched, when the document is unusable.
    pub fn import_json(&mut self, raw: &str, now: Instant) -> bool {
        match parse_state(raw) {
            Ok(state) => {
                let (table, config, dropped) = state.into_parts();
                self.table = table;
                self.config = config;
                for message in dropped {
                    self.notify(NoticeLevel::Warning, message);
                }
                self.changed(now);
                let message = format!("Loaded {} rows", self.table.len());
                self.notify(NoticeLevel::Info, message);
                true
            }
            Err(e) => {
                self.notify(NoticeLevel::Warning, format!("Invalid data file: {}", e));
                false
            }
        }
    }

    /// The table with any pending recompute applied.
    pub fn settled_table(&mut self) -> &Table {
        self.settle();
        &self.table
    }

    pub fn snapshot(&mut self) -> SerializedState {
        self.settle();
        SerializedState::capture(&self.table, &self.config)
    }

    pub fn export_json(&mut self) -> TallyResult<String> {
        self.snapshot().to_json()
    }

    pub fn leaderboards(&mut self) -> Leaderboards {
        self.settle();
        build_leaderboards(&self.table, &self.config)
    }

    pub fn view(&mut self, filter: Option<&str>) -> Vec<RowView> {
        self.settle();
        project(&self.table, filter)
    }

    // --- Scheduling ---

    fn persist_to(&mut self, store: &mut dyn StateStore) -> TallyResult<()> {
        let state = self.snapshot();
        match store.save(&state) {
            Ok(()) => {
                debug!("Persisted {} rows", state.rows.len());
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Could not save: {}", e));
                Err(e)
            }
        }
    }

    /// Runs whatever debounced work is due at `now`. Returns true when
    /// something ran.
    pub fn tick(&mut self, now: Instant, store: &mut dyn StateStore) -> bool {
        let mut ran = false;
        if self.recalc.take_due(now) {
            scorer::recompute(&mut self.table, &self.config);
            ran = true;
        }
        if self.persist.take_due(now) {
            // Failures are already reported as notices.
            let _ = self.persist_to(store);
            ran = true;
        }
        ran
    }

    /// Runs all pending work regardless of deadlines.
    pub fn flush(&mut self, store: &mut dyn StateStore) {
        self.settle();
        if self.persist.cancel() {
            let _ = self.persist_to(store);
        }
    }

    /// Explicit save: bypasses the debounce and reports the outcome.
    pub fn save_now(&mut self, store: &mut dyn StateStore) -> TallyResult<()> {
        self.persist.cancel();
        self.persist_to(store)?;
        self.notify(NoticeLevel::Info, "Saved");
        Ok(())
    }
}
