use crate::text::{fold, parse_score};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

pub const JUDGE_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn generate(rng: &mut fastrand::Rng) -> Self {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let tail: String = (0..7)
            .map(|_| ALPHABET[rng.usize(..ALPHABET.len())] as char)
            .collect();
        RowId(format!("a{}", tail))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        RowId(s)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Parses operator medal text. `Ok(None)` means the field was cleared.
    pub fn parse_entry(raw: &str) -> Result<Option<Medal>, InvalidMedal> {
        let key = fold(raw);
        match key.as_str() {
            "" => Ok(None),
            "v" | "vang" | "hcv" | "gold" => Ok(Some(Medal::Gold)),
            "b" | "bac" | "hcb" | "silver" => Ok(Some(Medal::Silver)),
            "d" | "dd" | "dong" | "hcd" | "bronze" => Ok(Some(Medal::Bronze)),
            _ => Err(InvalidMedal(raw.trim().to_string())),
        }
    }

    pub fn from_rank(rank: u32, double_bronze: bool) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            4 if double_bronze => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn label_vi(&self) -> &'static str {
        match self {
            Medal::Gold => "Vàng",
            Medal::Silver => "Bạc",
            Medal::Bronze => "Đồng",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMedal(pub String);

impl fmt::Display for InvalidMedal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a medal (expected V, B or Đ)", self.0)
    }
}

/// Up to five judge scores; `None` is an absent score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores(pub [Option<f64>; JUDGE_COUNT]);

impl Scores {
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        let mut scores = Scores::default();
        for (slot, raw) in scores.0.iter_mut().zip(texts.iter()) {
            *slot = parse_score(raw.as_ref());
        }
        scores
    }

    /// Present scores only; negative or non-finite values are ignored.
    pub fn present(&self) -> Vec<f64> {
        self.0
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .collect()
    }

    pub fn set(&mut self, judge: usize, value: Option<f64>) {
        if let Some(slot) = self.0.get_mut(judge) {
            *slot = value.filter(|v| v.is_finite() && *v >= 0.0);
        }
    }
}

/// Result-bearing part of a scored row (single or team master).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Entry {
    pub scores: Scores,
    pub rank: Option<u32>,
    pub auto_medal: Option<Medal>,
    pub pinned_medal: Option<Medal>,
    pub manual_rank: Option<u32>,
}

impl Entry {
    pub fn final_medal(&self) -> Option<Medal> {
        self.pinned_medal.or(self.auto_medal)
    }

    pub fn is_manual_medal(&self) -> bool {
        self.pinned_medal.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RowKind {
    Single(Entry),
    TeamMaster(Entry),
    #[serde(rename_all = "camelCase")]
    TeamMember { parent_id: RowId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub age_category: String,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_year: String,
    #[serde(default)]
    pub team: String,
    #[serde(flatten)]
    pub kind: RowKind,
}

impl Row {
    pub fn entry(&self) -> Option<&Entry> {
        match &self.kind {
            RowKind::Single(e) | RowKind::TeamMaster(e) => Some(e),
            RowKind::TeamMember { .. } => None,
        }
    }

    pub fn entry_mut(&mut self) -> Option<&mut Entry> {
        match &mut self.kind {
            RowKind::Single(e) | RowKind::TeamMaster(e) => Some(e),
            RowKind::TeamMember { .. } => None,
        }
    }

    pub fn parent_id(&self) -> Option<&RowId> {
        match &self.kind {
            RowKind::TeamMember { parent_id } => Some(parent_id),
            _ => None,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self.kind, RowKind::TeamMember { .. })
    }

    pub fn is_master(&self) -> bool {
        matches!(self.kind, RowKind::TeamMaster(_))
    }

    pub fn final_medal(&self) -> Option<Medal> {
        self.entry().and_then(Entry::final_medal)
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            RowKind::Single(_) => "single",
            RowKind::TeamMaster(_) => "team",
            RowKind::TeamMember { .. } => "member",
        }
    }
}

/// Descriptive fields shared by every row kind, used when creating rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFields {
    pub age_category: String,
    pub event_name: String,
    pub name: String,
    pub birth_year: String,
    pub team: String,
}

impl RowFields {
    pub fn new(age: &str, event: &str, name: &str, birth_year: &str, team: &str) -> Self {
        Self {
            age_category: age.trim().to_string(),
            event_name: event.trim().to_string(),
            name: name.trim().to_string(),
            birth_year: birth_year.trim().to_string(),
            team: team.trim().to_string(),
        }
    }
}

/// Editable descriptive column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Field {
    AgeCategory,
    EventName,
    Name,
    BirthYear,
    Team,
}
