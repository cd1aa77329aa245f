use rstest::rstest;
use vovinam::config::TallyConfig;
use vovinam::export::rows_csv;
use vovinam::import::{detect_layout, import_cells, is_header_row, read_cells, Layout};
use vovinam::model::{Medal, RowFields, RowKind, Table};
use vovinam::scorer::{apply_sort, enter_medal, recompute};

fn cells(text: &str) -> Vec<Vec<String>> {
    read_cells(text).unwrap()
}

const REGISTRATION: &str = "\
Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị
U18,Song luyện,Lê A,2008,HCM
U18,Song luyện,Trần B,2009,
U18,Quyền,Phạm C,2008,HN
";

#[test]
fn test_read_cells_detects_delimiter_and_strips_bom() {
    let rows = cells("\u{feff}a;b;c\n\n1; 2 ;3\n");
    assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);

    let rows = cells("x\ty\n1\t2\n");
    assert_eq!(rows[1], vec!["1", "2"]);
}

#[rstest]
#[case(&["STT", "Họ tên", "Đơn vị"], true)]
#[case(&["Lứa tuổi", "Nội dung"], true)]
#[case(&["U18", "Quyền", "Lê A", "2008", "HCM"], false)]
#[case(&["Name"], false)]
#[case(&["STT", "Họ và tên VĐV", "GĐ1", "Hạng"], true)]
#[case(&["U18", "Đối kháng 54kg", "Nguyễn Văn Thắng", "2008", "HCM"], false)]
#[case(&["U15", "Đối kháng 45kg", "Trần Khang", "2010", "Đoàn Huế"], false)]
fn test_header_detection(#[case] row: &[&str], #[case] expected: bool) {
    let row: Vec<String> = row.iter().map(|s| s.to_string()).collect();
    assert_eq!(is_header_row(&row), expected);
}

#[test]
fn test_combat_rows_after_header_are_data() {
    let text = "\
Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị
U18,Đối kháng 54kg,Nguyễn Văn Thắng,2008,HCM
U18,Đối kháng 54kg,Lê Văn An,2008,HN
Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị
";
    let mut table = Table::with_seed(36);
    let report = import_cells(&mut table, &cells(text));

    // Only the first row is a header; a repeated title row later is data
    // and gets counted rather than vanishing.
    assert_eq!(report.added, 3);
    let names: Vec<&str> = table.rows().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names[..2], ["Nguyễn Văn Thắng", "Lê Văn An"]);
}

#[test]
fn test_headerless_file_keeps_first_row() {
    let text = "U15,Đối kháng 45kg,Trần Khang,2010,Đoàn Huế\n";
    let mut table = Table::with_seed(37);
    let report = import_cells(&mut table, &cells(text));

    assert_eq!(report.added, 1);
    assert_eq!(table.rows()[0].name, "Trần Khang");
    assert_eq!(table.rows()[0].team, "Đoàn Huế");
}

#[test]
fn test_layout_detection() {
    assert_eq!(detect_layout(&cells(REGISTRATION)), Layout::Registration);
    let scored = "STT,Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị,GĐ1,GĐ2\n1,U18,Quyền,A,2008,HN,9,8\n";
    assert_eq!(detect_layout(&cells(scored)), Layout::Scores);
    let wide = "1,U18,Quyền,A,2008,HN,9,8,7,,,24,1,V,single\n";
    assert_eq!(detect_layout(&cells(wide)), Layout::Scores);
}

#[test]
fn test_blank_delegation_continues_team_event() {
    let mut table = Table::with_seed(31);
    let report = import_cells(&mut table, &cells(REGISTRATION));

    assert_eq!(report.layout, Layout::Registration);
    assert_eq!(report.added, 4);
    assert_eq!(report.duplicates, 0);

    let rows = table.rows();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].is_master());
    assert_eq!(rows[0].name, "Lê A / Trần B");
    assert_eq!(rows[0].team, "HCM");
    assert_eq!(rows[1].parent_id(), Some(&rows[0].id));
    assert_eq!(rows[2].name, "Trần B");
    assert_eq!(rows[2].parent_id(), Some(&rows[0].id));
    assert!(matches!(rows[3].kind, RowKind::Single(_)));
}

#[test]
fn test_new_delegation_or_event_closes_team() {
    let text = "\
U18,Song luyện,Lê A,2008,HCM
U18,Song luyện,Trần B,2009,HN
U18,Song luyện,Võ D,2009,
U18,Đồng đội,Ngô E,2008,
";
    let mut table = Table::with_seed(32);
    let report = import_cells(&mut table, &cells(text));

    // Lê A closes alone and stays a single; Trần B + Võ D form a team;
    // Ngô E has no open team of that event.
    assert_eq!(report.added, 5);
    let kinds: Vec<&str> = table.rows().iter().map(|r| r.kind_label()).collect();
    assert_eq!(kinds, vec!["single", "team", "member", "member", "single"]);
}

#[test]
fn test_reimport_reports_duplicates() {
    let mut table = Table::with_seed(33);
    import_cells(&mut table, &cells(REGISTRATION));
    let again = import_cells(&mut table, &cells(&REGISTRATION.to_uppercase()));

    assert_eq!(again.added, 0);
    assert_eq!(again.duplicates, 2);
    assert_eq!(table.len(), 4);
}

#[test]
fn test_duplicates_within_one_file() {
    let text = "U18,Quyền,Lê A,2008,HCM\nu18,quyen,le a,2008,hcm\n";
    let mut table = Table::with_seed(34);
    let report = import_cells(&mut table, &cells(text));
    assert_eq!(report.added, 1);
    assert_eq!(report.duplicates, 1);
}

#[rstest]
#[case("")]
#[case("Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị\n")]
#[case("U18,Quyền,,2008,HCM\n")]
fn test_nothing_usable(#[case] text: &str) {
    let mut table = Table::with_seed(35);
    let report = import_cells(&mut table, &cells(text));
    assert!(report.is_empty());
    assert!(table.is_empty());
}

#[test]
fn test_stt_column_is_skipped() {
    let text = "STT,Lứa tuổi,Nội dung,Họ tên,Năm sinh,Đơn vị\n1,U18,Quyền,Lê A,2008,HCM\n";
    let mut table = Table::with_seed(36);
    import_cells(&mut table, &cells(text));
    assert_eq!(table.rows()[0].name, "Lê A");
    assert_eq!(table.rows()[0].team, "HCM");
}

#[test]
fn test_rows_export_reimports() {
    let config = TallyConfig {
        double_bronze: true,
        ..TallyConfig::default()
    };
    let mut source = Table::with_seed(37);
    let a = source.add_single(RowFields::new("U18", "Quyền", "An", "2008", "HCM"));
    source.set_score(&a, 0, Some(8.5)).unwrap();
    source.set_score(&a, 1, Some(9.0)).unwrap();
    source.set_score(&a, 2, Some(8.0)).unwrap();
    let team = source.add_master(RowFields::new("U18", "Song luyện", "Lê A / Trần B", "", "HN"));
    source.set_score(&team, 0, Some(7.0)).unwrap();
    source
        .add_member(&team, RowFields::new("U18", "Song luyện", "Lê A", "2008", ""))
        .unwrap();
    source
        .add_member(&team, RowFields::new("U18", "Song luyện", "Trần B", "2009", "ĐN"))
        .unwrap();
    let fighter = source.add_single(RowFields::new("U18", "Đối kháng", "Cường", "2007", "HCM"));
    enter_medal(&mut source, &fighter, "Đ").unwrap();
    apply_sort(&mut source, &config);

    let csv = rows_csv(&source).unwrap();
    let mut target = Table::with_seed(38);
    let report = import_cells(&mut target, &cells(&csv));
    assert_eq!(report.layout, Layout::Scores);
    assert_eq!(report.added, 5);
    recompute(&mut target, &config);

    let names = |t: &Table| t.rows().iter().map(|r| r.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&target), names(&source));

    let members: Vec<_> = target.rows().iter().filter(|r| r.is_member()).collect();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1].team, "ĐN");

    let imported_fighter = target.rows().iter().find(|r| r.name == "Cường").unwrap();
    let entry = imported_fighter.entry().unwrap();
    assert_eq!(entry.pinned_medal, Some(Medal::Bronze));
    assert_eq!(entry.rank, Some(3));

    // The exported auto medal matches the recomputed one and is not kept as an override.
    let imported_a = target.rows().iter().find(|r| r.name == "An").unwrap();
    assert_eq!(imported_a.entry().unwrap().pinned_medal, None);
    assert_eq!(imported_a.final_medal(), Some(Medal::Gold));

    // Importing the same export again adds nothing.
    let again = import_cells(&mut target, &cells(&csv));
    assert_eq!(again.added, 0);
}
