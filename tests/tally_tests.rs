use vovinam::config::{MedalWeights, RankingMode, TallyConfig};
use vovinam::model::{RowFields, RowId, Table};
use vovinam::scorer::tally::{build_leaderboards, split_pair_names, TallyEntry};
use vovinam::scorer::{enter_medal, recompute};

const AGE: &str = "Senior";

fn medalled(table: &mut Table, event: &str, name: &str, team: &str, medal: &str) -> RowId {
    let id = table.add_single(RowFields::new(AGE, event, name, "2000", team));
    enter_medal(table, &id, medal).unwrap();
    id
}

fn find<'a>(entries: &'a [TallyEntry], name: &str) -> &'a TallyEntry {
    entries
        .iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("no leaderboard entry for {}", name))
}

#[test]
fn test_team_bronze_credits_every_member_once_and_delegation_once() {
    let mut table = Table::with_seed(21);
    let master = table.add_master(RowFields::new(AGE, "Đồng đội nam", "Team", "", "HCM"));
    for (name, year) in [("Lê A", "2001"), ("Trần B", "2002"), ("Phạm C", "2003")] {
        table
            .add_member(&master, RowFields::new(AGE, "Đồng đội nam", name, year, ""))
            .unwrap();
    }
    enter_medal(&mut table, &master, "Đ").unwrap();

    let boards = build_leaderboards(&table, &TallyConfig::default());

    assert_eq!(boards.athletes.len(), 3);
    for name in ["Lê A", "Trần B", "Phạm C"] {
        let entry = find(&boards.athletes, name);
        assert_eq!(entry.medals.bronze, 1);
        assert_eq!(entry.sum, 1);
        assert_eq!(entry.team, "HCM");
    }
    assert_eq!(find(&boards.athletes, "Trần B").birth_year, "2002");

    assert_eq!(boards.delegations.len(), 1);
    assert_eq!(boards.delegations[0].name, "HCM");
    assert_eq!(boards.delegations[0].medals.bronze, 1);
    assert_eq!(boards.delegations[0].points, 3.0);
}

#[test]
fn test_member_with_own_delegation_is_credited_there() {
    let mut table = Table::with_seed(22);
    let master = table.add_master(RowFields::new(AGE, "Song luyện", "A / B", "", "HCM"));
    table
        .add_member(&master, RowFields::new(AGE, "Song luyện", "A", "", ""))
        .unwrap();
    table
        .add_member(&master, RowFields::new(AGE, "Song luyện", "B", "", "Đồng Nai"))
        .unwrap();
    enter_medal(&mut table, &master, "V").unwrap();

    let boards = build_leaderboards(&table, &TallyConfig::default());
    assert_eq!(find(&boards.athletes, "A").team, "HCM");
    assert_eq!(find(&boards.athletes, "B").team, "Đồng Nai");
    // The team row still counts for the master's delegation only.
    assert_eq!(boards.delegations.len(), 1);
    assert_eq!(boards.delegations[0].medals.gold, 1);
}

#[test]
fn test_pair_names_split_on_slash() {
    let mut table = Table::with_seed(23);
    medalled(&mut table, "Song luyện", "Lê A /Trần B", "HN", "B");

    let boards = build_leaderboards(&table, &TallyConfig::default());
    assert_eq!(boards.athletes.len(), 2);
    assert_eq!(find(&boards.athletes, "Lê A").medals.silver, 1);
    assert_eq!(find(&boards.athletes, "Trần B").medals.silver, 1);
    assert_eq!(split_pair_names(" / X / "), vec!["X"]);
}

#[test]
fn test_rows_without_delegation_or_medal_are_ignored() {
    let mut table = Table::with_seed(24);
    medalled(&mut table, "Quyền", "No Team", "", "V");
    table.add_single(RowFields::new(AGE, "Quyền", "No Medal", "", "HN"));

    let boards = build_leaderboards(&table, &TallyConfig::default());
    assert!(boards.athletes.is_empty());
    assert!(boards.delegations.is_empty());
}

#[test]
fn test_ranking_modes() {
    let mut table = Table::with_seed(25);
    medalled(&mut table, "Quyền 1", "Silver Only", "X", "B");
    for event in ["Quyền 2", "Quyền 3", "Quyền 4"] {
        medalled(&mut table, event, "Bronzes", "Y", "Đ");
    }

    let score = build_leaderboards(&table, &TallyConfig::default());
    assert_eq!(score.delegations[0].name, "Y");
    assert_eq!(score.delegations[0].points, 9.0);
    assert_eq!(score.delegations[0].rank, 1);
    assert_eq!(score.delegations[1].rank, 2);

    let count = build_leaderboards(
        &table,
        &TallyConfig {
            ranking_mode: RankingMode::Count,
            ..TallyConfig::default()
        },
    );
    assert_eq!(count.delegations[0].name, "X");
}

#[test]
fn test_tie_breaks_by_gold_then_name() {
    let mut table = Table::with_seed(26);
    let config = TallyConfig {
        weights: MedalWeights {
            weight_gold: 6.0,
            weight_silver: 3.0,
            weight_bronze: 1.0,
        },
        ..TallyConfig::default()
    };
    // 6 points each: one Gold vs two Silvers.
    medalled(&mut table, "E1", "Silvers", "Zeta", "B");
    medalled(&mut table, "E2", "Silvers", "Zeta", "B");
    medalled(&mut table, "E3", "Golden", "Alpha", "V");
    // Same counts, name decides.
    medalled(&mut table, "E4", "Ánh", "Beta", "Đ");
    medalled(&mut table, "E5", "an", "Gamma", "Đ");

    let boards = build_leaderboards(&table, &config);
    let order: Vec<&str> = boards.athletes.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(order, vec!["Golden", "Silvers", "an", "Ánh"]);
}

#[test]
fn test_invalid_weights_fall_back_to_defaults() {
    let mut table = Table::with_seed(27);
    medalled(&mut table, "E1", "A", "X", "V");
    let config = TallyConfig {
        weights: MedalWeights {
            weight_gold: 0.0,
            weight_silver: -2.0,
            weight_bronze: f64::NAN,
        },
        ..TallyConfig::default()
    };
    let boards = build_leaderboards(&table, &config);
    assert_eq!(boards.athletes[0].points, 10.0);
}

#[test]
fn test_athlete_keys_fold_case_and_marks() {
    let mut table = Table::with_seed(28);
    medalled(&mut table, "E1", "Nguyễn An", "Đồng Nai", "V");
    medalled(&mut table, "E2", "nguyen an", "dong nai", "B");

    let boards = build_leaderboards(&table, &TallyConfig::default());
    assert_eq!(boards.athletes.len(), 1);
    assert_eq!(boards.athletes[0].name, "Nguyễn An");
    assert_eq!(boards.athletes[0].sum, 2);
    assert_eq!(boards.delegations.len(), 1);
}

#[test]
fn test_auto_medals_feed_the_tally() {
    let mut table = Table::with_seed(29);
    let a = table.add_single(RowFields::new(AGE, "Quyền", "A", "", "X"));
    table.set_score(&a, 0, Some(9.0)).unwrap();
    recompute(&mut table, &TallyConfig::default());

    let boards = build_leaderboards(&table, &TallyConfig::default());
    assert_eq!(boards.athletes[0].medals.gold, 1);
}
