use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use vovinam::scorer::TallyEntry;
use vovinam::view::RowView;
use vovinam::RankingMode;

fn medal_color(label: &str) -> Color {
    match label {
        "Vàng" => Color::Yellow,
        "Bạc" => Color::White,
        "Đồng" => Color::DarkYellow,
        _ => Color::Reset,
    }
}

pub fn print_rows(rows: &[RowView]) {
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Id"),
        Cell::new("Age"),
        Cell::new("Event"),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Born"),
        Cell::new("Team"),
        Cell::new("J1"),
        Cell::new("J2"),
        Cell::new("J3"),
        Cell::new("J4"),
        Cell::new("J5"),
        Cell::new("Total").fg(Color::Cyan),
        Cell::new("Rank"),
        Cell::new("Medal"),
    ]);

    for i in 7..=13 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for row in rows {
        let index = row.index.map(|i| i.to_string()).unwrap_or_default();
        let name = if row.index.is_none() {
            format!("  └ {}", row.name)
        } else {
            row.name.clone()
        };
        let medal = if row.manual_medal {
            format!("{}*", row.medal)
        } else {
            row.medal.clone()
        };
        let mut total = Cell::new(&row.total).fg(Color::Cyan);
        if row.tied {
            total = total.fg(Color::Red).add_attribute(Attribute::Bold);
        }

        let mut cells = vec![
            Cell::new(index),
            Cell::new(row.id.as_str()),
            Cell::new(&row.age_category),
            Cell::new(&row.event_name),
            Cell::new(name),
            Cell::new(&row.birth_year),
            Cell::new(&row.team),
        ];
        cells.extend(row.scores.iter().map(|s| {
            if row.scores_editable {
                Cell::new(s)
            } else {
                Cell::new(s).fg(Color::DarkGrey)
            }
        }));
        cells.push(total);
        cells.push(Cell::new(&row.rank));
        cells.push(Cell::new(medal).fg(medal_color(&row.medal)));
        table.add_row(cells);
    }
    println!("{}", table);
    if rows.iter().any(|r| r.tied) {
        println!("Totals in red are tied within their group.");
    }
}

fn leaderboard(title: &str, entries: &[TallyEntry], mode: RankingMode, with_athlete: bool) {
    println!("\n{}", title);
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Rank").add_attribute(Attribute::Bold)];
    if with_athlete {
        header.push(Cell::new("Name").add_attribute(Attribute::Bold));
        header.push(Cell::new("Born"));
    }
    header.extend([
        Cell::new("Team"),
        Cell::new("Gold").fg(Color::Yellow),
        Cell::new("Silver"),
        Cell::new("Bronze").fg(Color::DarkYellow),
        Cell::new("Total"),
    ]);
    if mode == RankingMode::Score {
        header.push(Cell::new("Points").fg(Color::Cyan));
    }
    let width = header.len();
    table.set_header(header);

    let first_count = if with_athlete { 4 } else { 2 };
    for i in first_count..width {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for entry in entries {
        let mut cells = vec![Cell::new(entry.rank)];
        if with_athlete {
            cells.push(Cell::new(&entry.name).add_attribute(Attribute::Bold));
            cells.push(Cell::new(&entry.birth_year));
        }
        cells.extend([
            Cell::new(&entry.team),
            Cell::new(entry.medals.gold),
            Cell::new(entry.medals.silver),
            Cell::new(entry.medals.bronze),
            Cell::new(entry.sum),
        ]);
        if mode == RankingMode::Score {
            cells.push(Cell::new(format!("{}", entry.points)).fg(Color::Cyan));
        }
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_athletes(entries: &[TallyEntry], mode: RankingMode) {
    leaderboard("Athletes", entries, mode, true);
}

pub fn print_delegations(entries: &[TallyEntry], mode: RankingMode) {
    leaderboard("Delegations", entries, mode, false);
}
