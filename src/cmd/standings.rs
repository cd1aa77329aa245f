use crate::reports;
use clap::Args;
use std::time::Instant;
use tracing::info;
use vovinam::Session;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Match name, delegation or birth year
    #[arg(short, long)]
    pub filter: Option<String>,
}

pub fn run_sort(session: &mut Session) {
    let summary = session.apply_sort(Instant::now());
    info!(
        "Sorted {} performance and {} combat groups",
        summary.performance_groups, summary.combat_groups
    );
    reports::print_rows(&session.view(None));
}

pub fn run_show(args: ShowArgs, session: &mut Session) {
    let rows = session.view(args.filter.as_deref());
    reports::print_rows(&rows);
}

pub fn run_tally(session: &mut Session) {
    let boards = session.leaderboards();
    let mode = session.config().ranking_mode;
    reports::print_athletes(&boards.athletes, mode);
    reports::print_delegations(&boards.delegations, mode);
}
