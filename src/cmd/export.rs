use clap::Args;
use std::path::PathBuf;
use vovinam::export::{athletes_csv, delegations_csv, rows_csv, write_text};
use vovinam::{Session, TallyError, TallyResult};

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Full table as CSV
    #[arg(long)]
    pub rows: Option<PathBuf>,
    /// Athlete leaderboard as CSV
    #[arg(long)]
    pub athletes: Option<PathBuf>,
    /// Delegation leaderboard as CSV
    #[arg(long)]
    pub delegations: Option<PathBuf>,
    /// Whole state as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

pub fn run(args: ExportArgs, session: &mut Session) -> TallyResult<()> {
    let nothing = args.rows.is_none()
        && args.athletes.is_none()
        && args.delegations.is_none()
        && args.json.is_none();
    if nothing {
        return Err(TallyError::Validation(
            "Nothing to export; pass --rows, --athletes, --delegations or --json".into(),
        ));
    }

    if let Some(path) = &args.rows {
        let text = rows_csv(session.settled_table())?;
        write_text(path, &text)?;
    }

    if args.athletes.is_some() || args.delegations.is_some() {
        let boards = session.leaderboards();
        let mode = session.config().ranking_mode;
        if let Some(path) = &args.athletes {
            write_text(path, &athletes_csv(&boards.athletes, mode)?)?;
        }
        if let Some(path) = &args.delegations {
            write_text(path, &delegations_csv(&boards.delegations, mode)?)?;
        }
    }

    if let Some(path) = &args.json {
        write_text(path, &session.export_json()?)?;
    }
    Ok(())
}
