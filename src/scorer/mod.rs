pub mod classify;
pub mod overrides;
pub mod ranking;
pub mod tally;
pub mod total;

pub use self::classify::{classify_event, is_combat_event, is_team_event, EventKind};
pub use self::overrides::{enter_medal, enter_rank, parse_rank, MedalEntry};
pub use self::ranking::{apply_sort, build_groups, recompute, tied_rows, GroupKey, RecomputeSummary};
pub use self::tally::{build_leaderboards, Leaderboards, MedalCount, TallyEntry};
pub use self::total::{aggregate, display_total, row_total, scores_total};
