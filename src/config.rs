use crate::error::{TallyError, TallyResult};
use clap::{parser::ValueSource, ArgAction, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_WEIGHT_GOLD: f64 = 10.0;
pub const DEFAULT_WEIGHT_SILVER: f64 = 6.0;
pub const DEFAULT_WEIGHT_BRONZE: f64 = 3.0;

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TallyConfig {
    #[command(flatten)]
    #[serde(default)]
    pub weights: MedalWeights,

    /// Award a second Bronze to rank 4 of every group
    #[arg(long, action = ArgAction::Set, default_value_t = false)]
    #[serde(default)]
    pub double_bronze: bool,

    /// `score` sorts leaderboards by points, `count` by medal counts only
    #[arg(long, default_value = "score")]
    #[serde(default)]
    pub ranking_mode: RankingMode,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            weights: MedalWeights::default(),
            double_bronze: false,
            ranking_mode: RankingMode::Score,
        }
    }
}

#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MedalWeights {
    #[arg(long, default_value_t = DEFAULT_WEIGHT_GOLD)]
    #[serde(alias = "g", alias = "gold")]
    pub weight_gold: f64,
    #[arg(long, default_value_t = DEFAULT_WEIGHT_SILVER)]
    #[serde(alias = "s", alias = "silver")]
    pub weight_silver: f64,
    #[arg(long, default_value_t = DEFAULT_WEIGHT_BRONZE)]
    #[serde(alias = "b", alias = "bronze")]
    pub weight_bronze: f64,
}

impl Default for MedalWeights {
    fn default() -> Self {
        Self {
            weight_gold: DEFAULT_WEIGHT_GOLD,
            weight_silver: DEFAULT_WEIGHT_SILVER,
            weight_bronze: DEFAULT_WEIGHT_BRONZE,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RankingMode {
    #[default]
    Score,
    Count,
}

impl MedalWeights {
    /// Non-finite or non-positive weights fall back to their defaults.
    pub fn sanitized(&self) -> Self {
        fn pick(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }
        Self {
            weight_gold: pick(self.weight_gold, DEFAULT_WEIGHT_GOLD),
            weight_silver: pick(self.weight_silver, DEFAULT_WEIGHT_SILVER),
            weight_bronze: pick(self.weight_bronze, DEFAULT_WEIGHT_BRONZE),
        }
    }

    pub fn points(&self, gold: u32, silver: u32, bronze: u32) -> f64 {
        let w = self.sanitized();
        gold as f64 * w.weight_gold + silver as f64 * w.weight_silver + bronze as f64 * w.weight_bronze
    }

    /// Parses operator text for a single weight; unusable input reverts to the default.
    pub fn parse_weight(raw: &str, fallback: f64) -> f64 {
        match raw.trim().replace(',', ".").parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => fallback,
        }
    }
}

impl TallyConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TallyResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TallyError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let mut config: TallyConfig = serde_json::from_str(&content)?;
        config.weights = config.weights.sanitized();
        Ok(config)
    }

    pub fn merge_from_cli(&mut self, cli: &TallyConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($($field:ident).+, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$($field).+ = cli.$($field).+.clone();
                }
            };
        }

        update_if_present!(weights.weight_gold, "weight_gold");
        update_if_present!(weights.weight_silver, "weight_silver");
        update_if_present!(weights.weight_bronze, "weight_bronze");
        update_if_present!(double_bronze, "double_bronze");
        update_if_present!(ranking_mode, "ranking_mode");

        self.weights = self.weights.sanitized();
    }
}
