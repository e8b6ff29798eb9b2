//! Versioned store reader — height-addressed, merkleized version files
//!
//! The store is a directory of append-only version files. Each file holds
//! every (key, value) pair committed at one version, a CRC32C checksum per
//! entry, and a sha256 merkle root over the entry leaves. Values are
//! self-describing envelopes ([`crate::envelope`]).
//!
//! Features:
//! - Version discovery from filenames, newest-first height matching
//! - CRC32C checksum validation on every entry
//! - Merkle root verification over the full entry set
//! - Optional zstd-compressed files (`.store.zst`)
//! - Block-height recovery from the app-state envelope

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::envelope::{self, DecodeError, Envelope, Payload};

/// Current store file format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot open store at {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("no stored version matches block height {height}")]
    VersionNotFound { height: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported store format version {0}")]
    UnsupportedFormat(u32),

    #[error("checksum mismatch for key {key} in version {version}")]
    ChecksumMismatch { version: u64, key: String },

    #[error("merkle root mismatch in version {version}: stored {stored}, computed {computed}")]
    RootHashMismatch {
        version: u64,
        stored: String,
        computed: String,
    },

    #[error("corrupt version file {path}: {detail}")]
    Corrupt { path: PathBuf, detail: String },

    #[error("payload decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

// ── On-disk format ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct VersionFile {
    format_version: u32,
    version: u64,
    root_hash: String,
    entries: Vec<RawEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawEntry {
    key: String,
    value: Vec<u8>,
    checksum: u32,
}

/// Sha256 merkle root over entry leaves: leaf = sha256(key ‖ value),
/// parents combine pairwise, an odd node is promoted unchanged.
pub fn merkle_root(entries: &[(String, Vec<u8>)]) -> String {
    if entries.is_empty() {
        return hex_digest(Sha256::digest(b"").as_slice());
    }

    let mut level: Vec<[u8; 32]> = entries
        .iter()
        .map(|(key, value)| {
            let mut hasher = Sha256::new();
            hasher.update(key.as_bytes());
            hasher.update(value);
            hasher.finalize().into()
        })
        .collect();

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                if let [left, right] = pair {
                    let mut hasher = Sha256::new();
                    hasher.update(left);
                    hasher.update(right);
                    hasher.finalize().into()
                } else {
                    pair[0]
                }
            })
            .collect();
    }

    hex_digest(&level[0])
}

fn hex_digest(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ── Loaded version ──────────────────────────────────────────────────

/// One fully loaded, integrity-checked store version.
pub struct StoreVersion {
    version: u64,
    height: u64,
    entries: Vec<(String, Envelope)>,
}

impl StoreVersion {
    /// Store-internal version number.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Block height recovered from the app-state envelope.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Visit every stored (key, envelope) pair in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Envelope)> {
        self.entries.iter().map(|(key, env)| (key.as_str(), env))
    }

    /// Decode every envelope, skipping unknown discriminators.
    pub fn decode_payloads(&self) -> Result<Vec<Payload>, DecodeError> {
        let mut payloads = Vec::with_capacity(self.entries.len());
        for (key, env) in self.iter() {
            match envelope::decode(env)? {
                Payload::Ignored(kind) => {
                    debug!(key, kind, "skipping unknown payload kind");
                }
                payload => payloads.push(payload),
            }
        }
        Ok(payloads)
    }
}

// ── Store handle ────────────────────────────────────────────────────

/// Read-only handle over a store directory.
pub struct VersionedStore {
    dir: PathBuf,
    /// (version, path), ascending by version.
    versions: Vec<(u64, PathBuf)>,
}

impl VersionedStore {
    /// Open a store directory, discovering its version files.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.is_dir() {
            return Err(StoreError::Open {
                path: path.to_path_buf(),
                reason: "path is missing or not a directory".into(),
            });
        }

        let mut versions: Vec<(u64, PathBuf)> = fs::read_dir(path)
            .map_err(|e| StoreError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                parse_version_filename(&name).map(|version| (version, entry.path()))
            })
            .collect();

        if versions.is_empty() {
            return Err(StoreError::Open {
                path: path.to_path_buf(),
                reason: "no version files found".into(),
            });
        }

        versions.sort_by_key(|(version, _)| *version);
        Ok(Self {
            dir: path.to_path_buf(),
            versions,
        })
    }

    /// Store directory this handle reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Discovered version numbers, ascending.
    pub fn versions(&self) -> Vec<u64> {
        self.versions.iter().map(|(version, _)| *version).collect()
    }

    /// Load the version whose recovered block height equals `height`,
    /// scanning newest-first and stopping at the first match.
    /// `height == 0` selects the most recent version available.
    pub fn load_version(&self, height: u64) -> Result<StoreVersion, StoreError> {
        for (version, path) in self.versions.iter().rev() {
            let loaded = self.load_file(*version, path)?;
            if height == 0 || loaded.height == height {
                debug!(
                    version = loaded.version,
                    height = loaded.height,
                    "loaded store version"
                );
                return Ok(loaded);
            }
            debug!(
                version = loaded.version,
                stored_height = loaded.height,
                requested = height,
                "height mismatch, trying older version"
            );
        }
        Err(StoreError::VersionNotFound { height })
    }

    fn load_file(&self, version: u64, path: &Path) -> Result<StoreVersion, StoreError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let is_compressed = path.to_string_lossy().ends_with(".store.zst");
        let decompressed = if is_compressed {
            zstd::decode_all(data.as_slice()).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                detail: format!("decompression failed: {e}"),
            })?
        } else {
            data
        };

        let parsed: VersionFile =
            bincode::deserialize(&decompressed).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        if parsed.format_version > STORE_FORMAT_VERSION {
            return Err(StoreError::UnsupportedFormat(parsed.format_version));
        }
        if parsed.version != version {
            return Err(StoreError::Corrupt {
                path: path.to_path_buf(),
                detail: format!(
                    "filename version {version} does not match stored version {}",
                    parsed.version
                ),
            });
        }

        // Entry checksums, then the root over the full set.
        for entry in &parsed.entries {
            if crc32c::crc32c(&entry.value) != entry.checksum {
                return Err(StoreError::ChecksumMismatch {
                    version,
                    key: entry.key.clone(),
                });
            }
        }
        let leaves: Vec<(String, Vec<u8>)> = parsed
            .entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect();
        let computed = merkle_root(&leaves);
        if computed != parsed.root_hash {
            return Err(StoreError::RootHashMismatch {
                version,
                stored: parsed.root_hash,
                computed,
            });
        }

        let mut entries = Vec::with_capacity(parsed.entries.len());
        for raw in parsed.entries {
            let env = Envelope::from_bytes(&raw.value)?;
            entries.push((raw.key, env));
        }

        let height = recover_height(&entries).ok_or_else(|| StoreError::Corrupt {
            path: path.to_path_buf(),
            detail: "no app state entry".into(),
        })?;

        Ok(StoreVersion {
            version,
            height,
            entries,
        })
    }
}

fn parse_version_filename(name: &str) -> Option<u64> {
    let stripped = name
        .strip_prefix("version-")?
        .trim_end_matches(".store.zst")
        .trim_end_matches(".store");
    stripped.parse::<u64>().ok()
}

fn recover_height(entries: &[(String, Envelope)]) -> Option<u64> {
    entries
        .iter()
        .find(|(_, env)| env.kind == envelope::kind::APP_STATE)
        .and_then(|(_, env)| match envelope::decode(env) {
            Ok(Payload::AppState(app)) => Some(app.height),
            _ => None,
        })
}

// ── Store Writer ────────────────────────────────────────────────────

/// Writes version files in the store format.
///
/// The engine itself never mutates a store it audits; this exists for
/// store construction and test fixtures.
pub struct StoreWriter {
    dir: PathBuf,
    compress: bool,
}

impl StoreWriter {
    /// Create a new writer. `compress` enables zstd compression.
    pub fn new(dir: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            dir: dir.into(),
            compress,
        }
    }

    /// Write one version atomically: checksum entries → root → write tmp →
    /// fsync → rename.
    pub fn write(
        &self,
        version: u64,
        entries: &[(String, Envelope)],
    ) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)?;

        let mut raw = Vec::with_capacity(entries.len());
        let mut leaves = Vec::with_capacity(entries.len());
        for (key, env) in entries {
            let value = env.to_bytes()?;
            raw.push(RawEntry {
                key: key.clone(),
                value: value.clone(),
                checksum: crc32c::crc32c(&value),
            });
            leaves.push((key.clone(), value));
        }

        let file = VersionFile {
            format_version: STORE_FORMAT_VERSION,
            version,
            root_hash: merkle_root(&leaves),
            entries: raw,
        };
        let data =
            bincode::serialize(&file).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let (final_data, ext) = if self.compress {
            let compressed = zstd::encode_all(data.as_slice(), 3)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            (compressed, "store.zst")
        } else {
            (data, "store")
        };

        let filename = format!("version-{:012}.{}", version, ext);
        let path = self.dir.join(&filename);
        let tmp_path = self.dir.join(format!("{}.tmp", filename));

        {
            let mut out = File::create(&tmp_path)?;
            out.write_all(&final_data)?;
            out.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        Ok(path)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
