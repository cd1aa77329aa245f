use std::time::{Duration, Instant};
use vovinam::config::TallyConfig;
use vovinam::model::{Field, Medal, RowFields};
use vovinam::scorer::MedalEntry;
use vovinam::storage::{MemoryStore, StateStore};
use vovinam::{NoticeLevel, Session};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn fields(event: &str, name: &str) -> RowFields {
    RowFields::new("U18", event, name, "2008", "HCM")
}

#[test]
fn test_score_edits_are_debounced() {
    let t0 = Instant::now();
    let mut store = MemoryStore::new();
    let mut session = Session::default();
    let a = session.add_single(fields("Quyền", "An"), t0);

    session.edit_score(&a, 0, "9", t0).unwrap();
    session.edit_score(&a, 1, "8,5", t0 + ms(40)).unwrap();
    assert!(session.recompute_pending());

    assert!(!session.tick(t0 + ms(100), &mut store));
    assert_eq!(session.table().get(&a).unwrap().entry().unwrap().rank, None);

    assert!(session.tick(t0 + ms(120), &mut store));
    assert!(!session.recompute_pending());
    assert_eq!(session.table().get(&a).unwrap().entry().unwrap().rank, Some(1));
    assert_eq!(store.saves, 0);

    assert!(session.tick(t0 + ms(540), &mut store));
    assert_eq!(store.saves, 1);
    assert!(!session.save_pending());
}

#[test]
fn test_structural_changes_recompute_immediately() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let a = session.add_single(fields("Quyền", "An"), t0);
    session.edit_score(&a, 0, "9", t0).unwrap();
    let b = session.add_single(fields("Quyền", "Bình"), t0);

    assert!(!session.recompute_pending());
    assert_eq!(session.table().get(&a).unwrap().final_medal(), Some(Medal::Gold));
    assert_eq!(session.table().get(&b).unwrap().final_medal(), None);
}

#[test]
fn test_medal_entry_sees_pending_scores() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let a = session.add_single(fields("Quyền", "An"), t0);
    session.edit_score(&a, 0, "9", t0).unwrap();

    // Typed before the quiet period ends; still compared with Gold.
    let outcome = session.enter_medal(&a, "V", t0 + ms(10)).unwrap();
    assert_eq!(outcome, MedalEntry::MatchesAuto(Medal::Gold));
}

#[test]
fn test_rejected_medal_raises_warning() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let a = session.add_single(fields("Đối kháng", "An"), t0);
    let outcome = session.enter_medal(&a, "xyz", t0).unwrap();

    assert!(matches!(outcome, MedalEntry::Rejected(_)));
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert!(session.notices().is_empty());
}

#[test]
fn test_combat_rows_take_no_scores() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let a = session.add_single(fields("Doi khang", "An"), t0);
    assert!(session.edit_score(&a, 0, "9", t0).is_err());
}

#[test]
fn test_save_failure_is_reported_and_state_kept() {
    let t0 = Instant::now();
    let mut store = MemoryStore::with_quota(10);
    let mut session = Session::default();
    session.add_single(fields("Quyền", "An"), t0);

    assert!(session.save_now(&mut store).is_err());
    assert_eq!(session.table().len(), 1);
    let notices = session.take_notices();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Error));
}

#[test]
fn test_save_and_reopen() {
    let t0 = Instant::now();
    let mut store = MemoryStore::new();
    let config = TallyConfig {
        double_bronze: true,
        ..TallyConfig::default()
    };
    let mut session = Session::new(config.clone());
    let a = session.add_single(fields("Quyền", "An"), t0);
    session.edit_score(&a, 0, "7", t0).unwrap();
    session.flush(&mut store);
    assert_eq!(store.saves, 1);

    let reopened = Session::open(&store, TallyConfig::default());
    assert_eq!(reopened.config(), &config);
    assert_eq!(reopened.table().to_rows(), session.table().to_rows());
}

#[test]
fn test_corrupt_store_opens_empty_with_warning() {
    let store = MemoryStore::with_raw("{\"version\": 3, \"rows\": [");
    let session = Session::open(&store, TallyConfig::default());
    assert!(session.table().is_empty());
    assert_eq!(session.notices()[0].level, NoticeLevel::Warning);
}

#[test]
fn test_import_without_rows_warns() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let report = session
        .import_csv("Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị\n", t0)
        .unwrap();
    assert!(report.is_empty());
    let notices = session.take_notices();
    assert_eq!(notices[0].message, "No valid rows found");
    assert!(!session.save_pending());
}

#[test]
fn test_bad_json_import_leaves_table() {
    let t0 = Instant::now();
    let mut session = Session::default();
    session.add_single(fields("Quyền", "An"), t0);
    assert!(!session.import_json("[]", t0));
    assert_eq!(session.table().len(), 1);
}

#[test]
fn test_json_export_round_trip() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let a = session.add_single(fields("Quyền", "An"), t0);
    session.edit_score(&a, 0, "9.5", t0).unwrap();
    let json = session.export_json().unwrap();

    let mut other = Session::default();
    assert!(other.import_json(&json, t0));
    assert_eq!(other.table().to_rows(), session.table().to_rows());
}

#[test]
fn test_config_change_recomputes() {
    let t0 = Instant::now();
    let mut session = Session::default();
    let mut ids = Vec::new();
    for (i, score) in ["9", "8", "7", "6"].iter().enumerate() {
        let id = session.add_single(fields("Quyền", &format!("P{}", i)), t0);
        session.edit_score(&id, 0, score, t0).unwrap();
        ids.push(id);
    }
    let mut config = session.config().clone();
    config.double_bronze = true;
    session.set_config(config, t0);
    assert_eq!(session.table().get(&ids[3]).unwrap().final_medal(), Some(Medal::Bronze));
}

#[test]
fn test_reset_clears_store() {
    let t0 = Instant::now();
    let mut store = MemoryStore::new();
    let mut session = Session::default();
    session.add_single(fields("Quyền", "An"), t0);
    session.save_now(&mut store).unwrap();

    session.reset(&mut store);
    assert!(session.table().is_empty());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_view_filter_keeps_team_context() {
    let t0 = Instant::now();
    let mut session = Session::default();
    session.add_single(fields("Quyền", "An"), t0);
    session
        .add_team(
            RowFields::new("U18", "Song luyện", "", "", "HN"),
            vec![
                RowFields::new("U18", "Song luyện", "Lê Bảo", "2008", ""),
                RowFields::new("U18", "Song luyện", "Trần Cúc", "2009", ""),
            ],
            t0,
        )
        .unwrap();

    // Trần Cúc is hidden: neither the member nor the team row matches.
    let view = session.view(Some("2008"));
    let names: Vec<&str> = view.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["An", "Lê Bảo / Trần Cúc", "Lê Bảo"]);

    let all = session.view(None);
    assert_eq!(all.len(), 4);
    assert_eq!(all[1].index, Some(2));
    assert_eq!(all[2].index, None);
    assert!(!all[2].scores_editable);
}

#[test]
fn test_moving_into_combat_drops_score_rank() {
    let t0 = Instant::now();
    let mut store = MemoryStore::new();
    let mut session = Session::default();
    let a = session.add_single(fields("Quyền", "An"), t0);
    let b = session.add_single(fields("Quyền", "Bình"), t0);
    session.edit_score(&a, 0, "9", t0).unwrap();
    session.edit_score(&b, 0, "8", t0).unwrap();
    session.enter_rank(&b, Some(3), t0).unwrap();
    session.flush(&mut store);
    assert_eq!(session.table().get(&a).unwrap().entry().unwrap().rank, Some(1));

    session.edit_field(&a, Field::EventName, "Đối kháng 54kg", t0).unwrap();
    session.edit_field(&b, Field::EventName, "Đối kháng 54kg", t0).unwrap();
    session.flush(&mut store);

    let view = session.view(None);
    let an = view.iter().find(|v| v.name == "An").unwrap();
    assert!(an.combat);
    assert_eq!(an.rank, "");
    assert_eq!(an.medal, "");
    // A manual rank survives the move and is shown.
    assert_eq!(session.table().get(&b).unwrap().entry().unwrap().rank, Some(3));
}
