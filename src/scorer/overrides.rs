use super::classify::is_combat_event;
use crate::error::{TallyError, TallyResult};
use crate::model::{Entry, Medal, RowId, Table};
use tracing::{info, warn};

/// Outcome of an operator medal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedalEntry {
    /// Stored as a manual override.
    Pinned(Medal),
    /// Same as the computed medal, so no override is kept.
    MatchesAuto(Medal),
    /// Field emptied; the computed medal applies again.
    Cleared,
    /// Not a medal. The field and any previous override were cleared.
    Rejected(String),
}

fn scored_entry<'a>(table: &'a mut Table, id: &RowId) -> TallyResult<(&'a mut Entry, bool)> {
    let row = table.require_mut(id)?;
    let combat = is_combat_event(&row.event_name);
    let entry = row.entry_mut().ok_or_else(|| {
        TallyError::Validation(format!("Team member {} carries no result", id))
    })?;
    Ok((entry, combat))
}

/// Applies medal text typed by the operator against the row's current
/// computed medal.
pub fn enter_medal(table: &mut Table, id: &RowId, raw: &str) -> TallyResult<MedalEntry> {
    let (entry, _) = scored_entry(table, id)?;
    let outcome = match Medal::parse_entry(raw) {
        Err(invalid) => {
            entry.pinned_medal = None;
            warn!("Rejected medal entry for {}: {}", id, invalid);
            MedalEntry::Rejected(invalid.to_string())
        }
        Ok(None) => {
            entry.pinned_medal = None;
            MedalEntry::Cleared
        }
        Ok(Some(medal)) if entry.auto_medal == Some(medal) => {
            entry.pinned_medal = None;
            MedalEntry::MatchesAuto(medal)
        }
        Ok(Some(medal)) => {
            entry.pinned_medal = Some(medal);
            info!("Pinned {} for row {}", medal, id);
            MedalEntry::Pinned(medal)
        }
    };
    Ok(outcome)
}

/// Parses a manual rank; anything but a positive integer clears it.
pub fn parse_rank(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|r| *r >= 1)
}

/// Stores a manual rank. Performance groups use it only as a tie-break on
/// the next recompute; in combat groups it also becomes the displayed rank.
pub fn enter_rank(table: &mut Table, id: &RowId, rank: Option<u32>) -> TallyResult<()> {
    let (entry, combat) = scored_entry(table, id)?;
    entry.manual_rank = rank;
    if combat {
        entry.rank = rank;
    }
    Ok(())
}
