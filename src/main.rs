use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing::{debug, error, info, Level};
use vovinam::storage::JsonFileStore;
use vovinam::{Session, TallyConfig, TallyResult};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vovinam tournament scoring and medal tally", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Saved competition state
    #[arg(global = true, short, long, default_value = "vovinam-state.json")]
    state: PathBuf,

    /// JSON file with tally settings, used when no state is saved yet
    #[arg(global = true, long)]
    settings: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,

    #[command(flatten)]
    config: TallyConfig,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import registrations or scored rows from CSV
    Import(cmd::import::ImportArgs),
    /// Replace the table with a JSON export
    LoadJson(cmd::import::LoadJsonArgs),
    /// Add an individual or pair entry
    Add(cmd::edit::AddArgs),
    /// Add a team entry with its members
    AddTeam(cmd::edit::AddTeamArgs),
    /// Enter one judge score
    Score(cmd::edit::ScoreArgs),
    /// Enter or clear a medal
    Medal(cmd::edit::MedalArgs),
    /// Enter or clear a manual rank
    Rank(cmd::edit::RankArgs),
    /// Edit a descriptive column
    Set(cmd::edit::SetArgs),
    /// Delete a row (team rows take their members along)
    Delete(cmd::edit::DeleteArgs),
    /// Commit combat ranks from the entered medals
    Sort,
    /// Print the table
    Show(cmd::standings::ShowArgs),
    /// Print the athlete and delegation leaderboards
    Tally,
    /// Write CSV or JSON exports
    Export(cmd::export::ExportArgs),
    /// Delete every row and the saved state
    Reset,
}

fn base_config(cli: &Cli) -> TallyResult<TallyConfig> {
    match &cli.settings {
        Some(path) => {
            info!("Loading settings from {}", path.display());
            TallyConfig::load_from_file(path)
        }
        None => Ok(TallyConfig::default()),
    }
}

fn run(cli: Cli, matches: &clap::ArgMatches) -> TallyResult<()> {
    let mut store = JsonFileStore::new(&cli.state);
    let mut session = Session::open(&store, base_config(&cli)?);

    let mut config = session.config().clone();
    config.merge_from_cli(&cli.config, matches);
    session.set_config(config, Instant::now());
    debug!("Effective settings: {:?}", session.config());

    match cli.command {
        Commands::Import(args) => cmd::import::run(args, &mut session)?,
        Commands::LoadJson(args) => cmd::import::run_load_json(args, &mut session)?,
        Commands::Add(args) => cmd::edit::run_add(args, &mut session),
        Commands::AddTeam(args) => cmd::edit::run_add_team(args, &mut session)?,
        Commands::Score(args) => cmd::edit::run_score(args, &mut session)?,
        Commands::Medal(args) => cmd::edit::run_medal(args, &mut session)?,
        Commands::Rank(args) => cmd::edit::run_rank(args, &mut session)?,
        Commands::Set(args) => cmd::edit::run_set(args, &mut session)?,
        Commands::Delete(args) => cmd::edit::run_delete(args, &mut session)?,
        Commands::Sort => cmd::standings::run_sort(&mut session),
        Commands::Show(args) => cmd::standings::run_show(args, &mut session),
        Commands::Tally => cmd::standings::run_tally(&mut session),
        Commands::Export(args) => cmd::export::run(args, &mut session)?,
        Commands::Reset => {
            session.reset(&mut store);
            info!("Table cleared");
        }
    }

    session.flush(&mut store);
    Ok(())
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("{}", e);
        process::exit(1);
    }
}
