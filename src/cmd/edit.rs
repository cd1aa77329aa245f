use clap::Args;
use std::time::Instant;
use vovinam::model::{Field, RowFields, RowId};
use vovinam::scorer::{parse_rank, MedalEntry};
use vovinam::{Session, TallyError, TallyResult};

#[derive(Args, Debug, Clone)]
pub struct RowArgs {
    #[arg(long, default_value = "")]
    pub age: String,
    #[arg(long, default_value = "")]
    pub event: String,
    #[arg(long, default_value = "")]
    pub team: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[command(flatten)]
    pub row: RowArgs,
    /// Athlete name; "A / B" for a pair
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub birth_year: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddTeamArgs {
    #[command(flatten)]
    pub row: RowArgs,
    /// Display name; defaults to the member names
    #[arg(long, default_value = "")]
    pub name: String,
    /// NAME[:BIRTH_YEAR[:TEAM]], repeatable
    #[arg(short, long = "member", required = true)]
    pub members: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    pub id: String,
    /// Judge number, 1 to 5
    pub judge: usize,
    /// Score; empty clears it
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct MedalArgs {
    pub id: String,
    /// V, B, Đ (or Vàng, Bạc, Đồng); empty clears
    #[arg(default_value = "")]
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    pub id: String,
    /// Omit to clear
    pub rank: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    pub id: String,
    /// age-category, event-name, name, birth-year or team
    pub field: Field,
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: String,
}

fn member_fields(row: &RowArgs, raw: &str) -> RowFields {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or("");
    let birth_year = parts.next().unwrap_or("");
    let team = parts.next().unwrap_or("");
    RowFields::new(&row.age, &row.event, name, birth_year, team)
}

pub fn run_add(args: AddArgs, session: &mut Session) {
    let fields = RowFields::new(
        &args.row.age,
        &args.row.event,
        &args.name,
        &args.birth_year,
        &args.row.team,
    );
    let id = session.add_single(fields, Instant::now());
    println!("{}", id);
}

pub fn run_add_team(args: AddTeamArgs, session: &mut Session) -> TallyResult<()> {
    let members: Vec<RowFields> = args
        .members
        .iter()
        .map(|m| member_fields(&args.row, m))
        .collect();
    if members.iter().any(|m| m.name.is_empty()) {
        return Err(TallyError::Validation("Every member needs a name".into()));
    }
    let fields = RowFields::new(&args.row.age, &args.row.event, &args.name, "", &args.row.team);
    let id = session.add_team(fields, members, Instant::now())?;
    println!("{}", id);
    Ok(())
}

pub fn run_score(args: ScoreArgs, session: &mut Session) -> TallyResult<()> {
    if args.judge == 0 {
        return Err(TallyError::Validation("Judges are numbered from 1".into()));
    }
    session.edit_score(&RowId::from(args.id), args.judge - 1, &args.value, Instant::now())
}

pub fn run_medal(args: MedalArgs, session: &mut Session) -> TallyResult<()> {
    match session.enter_medal(&RowId::from(args.id), &args.text, Instant::now())? {
        MedalEntry::Pinned(medal) => println!("{} (manual)", medal.label_vi()),
        MedalEntry::MatchesAuto(medal) => println!("{}", medal.label_vi()),
        MedalEntry::Cleared => println!("Medal cleared"),
        MedalEntry::Rejected(text) => println!("Rejected '{}'", text),
    }
    Ok(())
}

pub fn run_rank(args: RankArgs, session: &mut Session) -> TallyResult<()> {
    let rank = args.rank.as_deref().and_then(parse_rank);
    session.enter_rank(&RowId::from(args.id), rank, Instant::now())
}

pub fn run_set(args: SetArgs, session: &mut Session) -> TallyResult<()> {
    session.edit_field(&RowId::from(args.id), args.field, &args.value, Instant::now())
}

pub fn run_delete(args: DeleteArgs, session: &mut Session) -> TallyResult<()> {
    let removed = session.delete(&RowId::from(args.id), Instant::now())?;
    println!("Deleted {} rows", removed);
    Ok(())
}
