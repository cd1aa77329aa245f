use crate::config::RankingMode;
use crate::error::{TallyError, TallyResult};
use crate::model::{Row, Table};
use crate::scorer::tally::TallyEntry;
use crate::scorer::{display_total, row_total};
use std::fs;
use std::path::Path;
use tracing::info;

const BOM: &str = "\u{feff}";

pub const ROWS_HEADER: [&str; 15] = [
    "STT", "Lứa tuổi", "Nội dung", "Họ tên", "Năm sinh", "Đơn vị", "GĐ1", "GĐ2", "GĐ3", "GĐ4",
    "GĐ5", "Tổng", "Hạng", "Huy chương", "Loại",
];

fn finish(wtr: csv::Writer<Vec<u8>>) -> TallyResult<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| TallyError::Storage(format!("Failed to flush CSV buffer: {}", e)))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| TallyError::Validation(format!("CSV output is not UTF-8: {}", e)))?;
    Ok(format!("{}{}", BOM, body))
}

/// Score cells as typed: "8.5", "9".
pub fn format_score(value: f64) -> String {
    format!("{}", value)
}

fn scored_record(index: usize, row: &Row) -> Vec<String> {
    let mut record = vec![
        index.to_string(),
        row.age_category.clone(),
        row.event_name.clone(),
        row.name.clone(),
        row.birth_year.clone(),
        row.team.clone(),
    ];
    let entry = row.entry().cloned().unwrap_or_default();
    record.extend(entry.scores.0.iter().map(|s| s.map(format_score).unwrap_or_default()));
    record.push(display_total(row_total(row)));
    record.push(entry.rank.map(|r| r.to_string()).unwrap_or_default());
    record.push(
        entry
            .final_medal()
            .map(|m| m.label_vi().to_string())
            .unwrap_or_default(),
    );
    record.push(row.kind_label().to_string());
    record
}

fn member_record(row: &Row) -> Vec<String> {
    let mut record = vec![String::new(); ROWS_HEADER.len()];
    record[3] = row.name.clone();
    record[4] = row.birth_year.clone();
    record[5] = row.team.clone();
    record[14] = row.kind_label().to_string();
    record
}

/// The full table in display order. Members follow their team row and
/// leave the shared columns blank.
pub fn rows_csv(table: &Table) -> TallyResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(ROWS_HEADER)?;

    let mut index = 0;
    for row in table.rows() {
        if row.is_member() {
            wtr.write_record(member_record(row))?;
        } else {
            index += 1;
            wtr.write_record(scored_record(index, row))?;
        }
    }
    finish(wtr)
}

fn format_points(points: f64) -> String {
    format!("{}", points)
}

fn counts(entry: &TallyEntry) -> [String; 4] {
    [
        entry.medals.gold.to_string(),
        entry.medals.silver.to_string(),
        entry.medals.bronze.to_string(),
        entry.sum.to_string(),
    ]
}

pub fn athletes_csv(entries: &[TallyEntry], mode: RankingMode) -> TallyResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["Rank", "Name", "BirthYear", "Team", "Gold", "Silver", "Bronze", "Total"];
    if mode == RankingMode::Score {
        header.push("Points");
    }
    wtr.write_record(&header)?;

    for entry in entries {
        let mut record = vec![
            entry.rank.to_string(),
            entry.name.clone(),
            entry.birth_year.clone(),
            entry.team.clone(),
        ];
        record.extend(counts(entry));
        if mode == RankingMode::Score {
            record.push(format_points(entry.points));
        }
        wtr.write_record(&record)?;
    }
    finish(wtr)
}

pub fn delegations_csv(entries: &[TallyEntry], mode: RankingMode) -> TallyResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["Rank", "Team", "Gold", "Silver", "Bronze", "Total"];
    if mode == RankingMode::Score {
        header.push("Points");
    }
    wtr.write_record(&header)?;

    for entry in entries {
        let mut record = vec![entry.rank.to_string(), entry.name.clone()];
        record.extend(counts(entry));
        if mode == RankingMode::Score {
            record.push(format_points(entry.points));
        }
        wtr.write_record(&record)?;
    }
    finish(wtr)
}

pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> TallyResult<()> {
    let path = path.as_ref();
    fs::write(path, text)?;
    info!("Wrote {}", path.display());
    Ok(())
}
