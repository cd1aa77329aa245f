//! Registration sheets: age category, event, name, birth year, delegation.
//!
//! In team events a row with a blank delegation continues the team opened by
//! the last row that carried one.

use super::{cell, single_key, team_key, DedupIndex, ImportReport, Layout};
use crate::model::{RowFields, Table};
use crate::scorer::is_team_event;
use crate::text::fold;

struct Member {
    name: String,
    birth_year: String,
}

struct OpenTeam {
    age: String,
    event: String,
    team: String,
    members: Vec<Member>,
}

impl OpenTeam {
    fn continues_with(&self, age: &str, event: &str) -> bool {
        fold(&self.age) == fold(age) && fold(&self.event) == fold(event)
    }
}

pub fn import(
    table: &mut Table,
    data: &[Vec<String>],
    offset: usize,
    index: &mut DedupIndex,
) -> ImportReport {
    let mut report = ImportReport::new(Layout::Registration);
    let mut open: Option<OpenTeam> = None;

    for row in data {
        let age = cell(row, offset);
        let event = cell(row, offset + 1);
        let name = cell(row, offset + 2);
        let birth_year = cell(row, offset + 3);
        let team = cell(row, offset + 4);

        if name.is_empty() {
            report.skipped += 1;
            continue;
        }

        let team_event = is_team_event(event);
        if team_event && team.is_empty() {
            if let Some(group) = open.as_mut().filter(|g| g.continues_with(age, event)) {
                group.members.push(Member {
                    name: name.to_string(),
                    birth_year: birth_year.to_string(),
                });
                continue;
            }
        }

        if let Some(group) = open.take() {
            close_team(table, group, index, &mut report);
        }

        if team_event && !team.is_empty() {
            open = Some(OpenTeam {
                age: age.to_string(),
                event: event.to_string(),
                team: team.to_string(),
                members: vec![Member {
                    name: name.to_string(),
                    birth_year: birth_year.to_string(),
                }],
            });
        } else {
            add_single(table, RowFields::new(age, event, name, birth_year, team), index, &mut report);
        }
    }

    if let Some(group) = open.take() {
        close_team(table, group, index, &mut report);
    }
    report
}

fn add_single(table: &mut Table, fields: RowFields, index: &mut DedupIndex, report: &mut ImportReport) {
    let key = single_key(
        &fields.age_category,
        &fields.event_name,
        &fields.name,
        &fields.birth_year,
        &fields.team,
    );
    if index.insert_single(key) {
        table.add_single(fields);
        report.added += 1;
    } else {
        report.duplicates += 1;
    }
}

fn close_team(table: &mut Table, group: OpenTeam, index: &mut DedupIndex, report: &mut ImportReport) {
    if let [only] = group.members.as_slice() {
        let fields = RowFields::new(&group.age, &group.event, &only.name, &only.birth_year, &group.team);
        add_single(table, fields, index, report);
        return;
    }

    let key = team_key(
        &group.age,
        &group.event,
        &group.team,
        group.members.iter().map(|m| (m.name.as_str(), m.birth_year.as_str())),
    );
    if !index.insert_team(key) {
        report.duplicates += 1;
        return;
    }

    let display_name = group
        .members
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(" / ");
    let master_fields = RowFields::new(&group.age, &group.event, &display_name, "", &group.team);
    index.insert_single(single_key(&group.age, &group.event, &display_name, "", &group.team));
    let master = table.add_master(master_fields);
    report.added += 1;

    for member in &group.members {
        let fields = RowFields::new(&group.age, &group.event, &member.name, &member.birth_year, "");
        // The master was just created, so this cannot fail.
        if table.add_member(&master, fields).is_ok() {
            report.added += 1;
        }
    }
}
