use crate::config::{MedalWeights, RankingMode, TallyConfig};
use crate::error::{TallyError, TallyResult};
use crate::model::{Row, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SCHEMA_VERSION: u32 = 3;

/// Persisted snapshot of the table and its configuration. Totals are
/// derived and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedState {
    pub version: u32,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub double_bronze: bool,
    #[serde(default)]
    pub weights: MedalWeights,
    #[serde(default)]
    pub ranking_mode: RankingMode,
}

impl SerializedState {
    pub fn capture(table: &Table, config: &TallyConfig) -> Self {
        Self {
            version: SCHEMA_VERSION,
            rows: table.to_rows(),
            double_bronze: config.double_bronze,
            weights: config.weights,
            ranking_mode: config.ranking_mode,
        }
    }

    pub fn config(&self) -> TallyConfig {
        TallyConfig {
            weights: self.weights.sanitized(),
            double_bronze: self.double_bronze,
            ranking_mode: self.ranking_mode,
        }
    }

    /// Rebuilds the table. The second element lists rows dropped because
    /// they broke team ownership.
    pub fn into_parts(self) -> (Table, TallyConfig, Vec<String>) {
        let config = self.config();
        let (table, warnings) = Table::from_rows(self.rows);
        (table, config, warnings)
    }

    pub fn to_json(&self) -> TallyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    athletes: Option<serde_json::Value>,
}

/// Parses a persisted or exported state document.
pub fn parse_state(raw: &str) -> TallyResult<SerializedState> {
    let probe: VersionProbe = serde_json::from_str(raw)?;
    match probe.version {
        Some(v) if v > SCHEMA_VERSION => return Err(TallyError::UnsupportedVersion(v)),
        None if probe.athletes.is_some() => {
            return Err(TallyError::Validation(
                "Per-athlete medal count documents cannot be loaded as a scoring table".into(),
            ))
        }
        _ => {}
    }
    let mut state: SerializedState = serde_json::from_str(raw)?;
    state.version = SCHEMA_VERSION;
    Ok(state)
}

pub trait StateStore {
    fn load(&self) -> TallyResult<Option<SerializedState>>;
    fn save(&mut self, state: &SerializedState) -> TallyResult<()>;
    fn clear(&mut self) -> TallyResult<()>;
}

/// Stores the state as pretty JSON in one file, replaced atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> TallyResult<Option<SerializedState>> {
        if !self.path.exists() {
            debug!("No state file at {}", self.path.display());
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_state(&raw).map(Some)
    }

    fn save(&mut self, state: &SerializedState) -> TallyResult<()> {
        let json = state.to_json()?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, json.as_bytes()).map_err(|e| {
            TallyError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            TallyError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;
        info!("Saved {} rows to {}", state.rows.len(), self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> TallyResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-process store. A quota makes saves larger than `quota` bytes fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Option<String>,
    quota: Option<usize>,
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Seeds raw text, as if written by another session.
    pub fn with_raw(raw: &str) -> Self {
        Self {
            data: Some(raw.to_string()),
            ..Self::default()
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> TallyResult<Option<SerializedState>> {
        match &self.data {
            None => Ok(None),
            Some(raw) => parse_state(raw).map(Some),
        }
    }

    fn save(&mut self, state: &SerializedState) -> TallyResult<()> {
        let json = serde_json::to_string(state)?;
        if let Some(quota) = self.quota {
            if json.len() > quota {
                warn!("State of {} bytes exceeds quota of {}", json.len(), quota);
                return Err(TallyError::Storage(format!(
                    "Quota exceeded: {} bytes needed, {} available",
                    json.len(),
                    quota
                )));
            }
        }
        self.data = Some(json);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> TallyResult<()> {
        self.data = None;
        Ok(())
    }
}
