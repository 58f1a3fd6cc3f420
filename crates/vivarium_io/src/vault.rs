//! Directory-backed persistence for agent state and the event stream.
//!
//! The vault stores two things under its root: `state.json`, the last
//! persisted agent mapping, and `stream.log`, an append-only JSON-lines
//! record of dispatched commands. It is a sandboxed data directory, not an
//! attempt at a real filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use vivarium_core::AgentState;

use crate::error::Result;

/// One dispatched command and its response, as recorded in the stream log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub address: String,
    pub payload: Value,
    pub response: Value,
}

impl StreamEntry {
    #[must_use]
    pub fn new(address: impl Into<String>, payload: Value, response: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            address: address.into(),
            payload,
            response,
        }
    }
}

/// Handle on one vault directory.
pub struct Vault {
    root: PathBuf,
    state_path: PathBuf,
    stream_path: PathBuf,
}

impl Vault {
    /// Opens (and creates if needed) the vault rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let state_path = root.join("state.json");
        let stream_path = root.join("stream.log");
        Ok(Self {
            root,
            state_path,
            stream_path,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the last persisted agent state.
    ///
    /// A missing or corrupt state file reads as `None`; the caller is
    /// expected to fall back to a fresh agent rather than refuse to boot.
    pub fn load_state(&self) -> Result<Option<AgentState>> {
        if !self.state_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.state_path)?;
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                tracing::warn!(
                    path = %self.state_path.display(),
                    error = %err,
                    "Corrupt state file, treating as empty"
                );
                Ok(None)
            }
        }
    }

    /// Persists the agent state, replacing the previous file atomically.
    pub fn save_state(&self, state: &AgentState) -> Result<()> {
        let data = serde_json::to_string_pretty(state)?;
        let tmp_path = self.state_path.with_extension("tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.state_path)?;
        Ok(())
    }

    /// Appends one entry to the event stream.
    pub fn append_stream(&self, entry: &StreamEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.stream_path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;
        Ok(())
    }

    /// Returns up to `limit` most recent well-formed stream entries.
    pub fn tail_stream(&self, limit: usize) -> Result<Vec<StreamEntry>> {
        let file = match File::open(&self.stream_path) {
            Ok(file) => file,
            Err(_) => return Ok(Vec::new()),
        };
        let reader = BufReader::new(file);
        let lines: Vec<String> = reader.lines().map_while(std::result::Result::ok).collect();
        let start = lines.len().saturating_sub(limit);
        Ok(lines[start..]
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}
