//! Source fingerprints and persisted generation state.
//!
//! Rendering the dashboard means opening every collection database, so the
//! generator first checks whether anything changed since the last successful
//! run and skips the work when nothing did.
//!
//! # Design
//!
//! Change detection is **content-addressed**: each database file is reduced
//! to the SHA-256 of its bytes. Content rather than mtime, so a `git checkout`
//! or a backup restore that resets timestamps does not trigger a rebuild, and
//! a rewrite that leaves bytes identical does not either.
//!
//! - **Source fingerprint**: hex digest of one database file, or the
//!   [`Fingerprint::Missing`] sentinel when the file is absent. A missing
//!   source is a valid state, not an error.
//! - **Combined fingerprint**: digest over the per-source fingerprints in
//!   configuration order, joined by `|`. Reordering collections changes it,
//!   because it changes the rendered page.
//!
//! ## Storage
//!
//! [`GenerationState`] is a JSON file (default `.site_state.json`). It is
//! written only after the dashboard itself has been written, through a
//! temporary sibling file that is renamed into place, so the file on disk is
//! always either the previous complete state or the new complete state.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default name of the state file.
pub const STATE_FILENAME: &str = ".site_state.json";

/// Separator between fingerprints in the combined digest input.
const SEPARATOR: &str = "|";

/// String form of [`Fingerprint::Missing`].
const MISSING: &str = "missing";

#[derive(Error, Debug)]
pub enum StateError {
    #[error("IO error writing {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Content fingerprint of a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    /// The source does not exist (or could not be read).
    Missing,
    /// Lowercase hex SHA-256 of the source bytes.
    Digest(String),
}

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        match self {
            Fingerprint::Missing => MISSING,
            Fingerprint::Digest(hex) => hex,
        }
    }

    /// Digest for the persisted state; `None` stands for a missing source.
    pub fn digest(&self) -> Option<&str> {
        match self {
            Fingerprint::Missing => None,
            Fingerprint::Digest(hex) => Some(hex),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// Fingerprint a source file. Never fails: an absent or unreadable file
/// yields [`Fingerprint::Missing`].
pub fn fingerprint_of(path: &Path) -> Fingerprint {
    if !path.exists() {
        return Fingerprint::Missing;
    }
    match hash_file(path) {
        Ok(hex) => Fingerprint::Digest(hex),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Source exists but cannot be read; treating as missing");
            Fingerprint::Missing
        }
    }
}

/// Digest over an ordered sequence of fingerprints.
pub fn combined_fingerprint(fingerprints: &[Fingerprint]) -> String {
    let joined = fingerprints
        .iter()
        .map(Fingerprint::as_str)
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    format!("{:x}", Sha256::digest(joined.as_bytes()))
}

/// Whether the dashboard must be rebuilt.
///
/// `stored` is the combined fingerprint from the last successful run, if any.
pub fn should_regenerate(current: &str, stored: Option<&str>, force: bool) -> bool {
    force || stored != Some(current)
}

/// State of the last successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationState {
    pub last_generated: DateTime<Local>,
    /// Combined fingerprint over all sources.
    pub databases_hash: String,
    /// Per-collection digests by name; `null` for a missing source.
    pub individual_hashes: IndexMap<String, Option<String>>,
}

impl GenerationState {
    /// Build a state record from named fingerprints, in configuration order.
    pub fn new<'a>(
        last_generated: DateTime<Local>,
        combined: String,
        fingerprints: impl IntoIterator<Item = (&'a str, &'a Fingerprint)>,
    ) -> Self {
        Self {
            last_generated,
            databases_hash: combined,
            individual_hashes: fingerprints
                .into_iter()
                .map(|(name, fp)| (name.to_string(), fp.digest().map(str::to_string)))
                .collect(),
        }
    }
}

/// Location of the persisted [`GenerationState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous state. Returns `None` if the file doesn't exist or
    /// can't be parsed; a damaged state file only costs one full rebuild.
    pub fn load(&self) -> Option<GenerationState> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Cannot read generation state; regenerating");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "Ignoring unparseable generation state");
                None
            }
        }
    }

    /// Replace the stored state wholesale.
    ///
    /// Writes a temporary sibling and renames it over the target, so readers
    /// never observe a half-written file.
    pub fn save(&self, state: &GenerationState) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state)?;
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            io_err(source)
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| STATE_FILENAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
