use crate::text::compact;
use strum_macros::Display;

const COMBAT_PATTERNS: &[&str] = &["doikhang", "sparring", "combat"];
const TEAM_PATTERNS: &[&str] = &["songluyen", "dongdoi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EventKind {
    /// Judged by win/loss; result is entered as a medal.
    Combat,
    /// Judged by numeric scores.
    Performance,
}

pub fn classify_event(event_name: &str) -> EventKind {
    let key = compact(event_name);
    if COMBAT_PATTERNS.iter().any(|p| key.contains(p)) {
        EventKind::Combat
    } else {
        EventKind::Performance
    }
}

pub fn is_combat_event(event_name: &str) -> bool {
    classify_event(event_name) == EventKind::Combat
}

/// Paired or multi-member events ("song luyện", "đồng đội").
pub fn is_team_event(event_name: &str) -> bool {
    let key = compact(event_name);
    TEAM_PATTERNS.iter().any(|p| key.contains(p))
}
