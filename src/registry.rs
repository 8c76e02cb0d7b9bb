//! Nullifier registry for double-vote detection.
//!
//! After a reveal proof verifies, its public nullifier hash is recorded
//! against the ballot. A second reveal producing the same nullifier for the
//! same ballot is rejected. Nullifiers are keyed by their canonical 32-byte
//! little-endian encoding, so ordering and persistence do not depend on the
//! field type.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config;
use crate::error::{GadgetError, Result};
use crate::utils::field_to_bytes32_le;
use crate::FieldElement;

type Key = [u8; 32];

/// Versioned wrapper for registry serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistryData {
    version: u16,
    ballots: BTreeMap<Key, BTreeSet<Key>>,
    /// Stored total for validation on load
    total: usize,
}

/// Seen nullifier hashes, per ballot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullifierRegistry {
    ballots: BTreeMap<Key, BTreeSet<Key>>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `nullifier_hash` for `ballot_id`.
    ///
    /// Fails with [`GadgetError::DuplicateNullifier`] if it was already seen;
    /// the registry is left unchanged in that case.
    pub fn record(&mut self, ballot_id: FieldElement, nullifier_hash: FieldElement) -> Result<()> {
        let seen = self
            .ballots
            .entry(field_to_bytes32_le(&ballot_id))
            .or_default();
        if !seen.insert(field_to_bytes32_le(&nullifier_hash)) {
            return Err(GadgetError::DuplicateNullifier {
                ballot_id: format!("{:?}", ballot_id),
            });
        }
        debug!(ballot_id = ?ballot_id, "Recorded nullifier");
        Ok(())
    }

    pub fn contains(&self, ballot_id: FieldElement, nullifier_hash: FieldElement) -> bool {
        self.ballots
            .get(&field_to_bytes32_le(&ballot_id))
            .is_some_and(|seen| seen.contains(&field_to_bytes32_le(&nullifier_hash)))
    }

    /// Number of reveals accepted for `ballot_id`.
    pub fn count(&self, ballot_id: FieldElement) -> usize {
        self.ballots
            .get(&field_to_bytes32_le(&ballot_id))
            .map_or(0, BTreeSet::len)
    }

    /// Total nullifiers across all ballots.
    pub fn len(&self) -> usize {
        self.ballots.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Saves the registry to `path` using bincode serialization.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = RegistryData {
            version: config::REGISTRY_FORMAT_VERSION,
            ballots: self.ballots.clone(),
            total: self.len(),
        };

        let encoded = bincode::serialize(&data).map_err(|e| {
            GadgetError::Serialization(format!("Failed to serialize registry: {}", e))
        })?;

        if encoded.len() > config::MAX_REGISTRY_SIZE_BYTES {
            return Err(GadgetError::InvalidInput(format!(
                "Serialized registry size {} bytes exceeds maximum {} bytes",
                encoded.len(),
                config::MAX_REGISTRY_SIZE_BYTES
            )));
        }

        fs::write(path, encoded).map_err(|e| {
            GadgetError::IO(format!(
                "Failed to write registry to {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(path = %path.display(), nullifiers = data.total, "Saved nullifier registry");
        Ok(())
    }

    /// Loads a registry from `path`, checking version and contents.
    pub fn load(path: &Path) -> Result<Self> {
        let encoded = fs::read(path).map_err(|e| {
            GadgetError::IO(format!(
                "Failed to read registry from {}: {}",
                path.display(),
                e
            ))
        })?;

        if encoded.len() > config::MAX_REGISTRY_SIZE_BYTES {
            return Err(GadgetError::InvalidInput(format!(
                "Registry file size {} bytes exceeds maximum {} bytes",
                encoded.len(),
                config::MAX_REGISTRY_SIZE_BYTES
            )));
        }

        let data: RegistryData = bincode::deserialize(&encoded).map_err(|e| {
            GadgetError::Serialization(format!("Failed to deserialize registry: {}", e))
        })?;

        if data.version != config::REGISTRY_FORMAT_VERSION {
            return Err(GadgetError::InvalidInput(format!(
                "Registry format version {} is not compatible with current version {}",
                data.version,
                config::REGISTRY_FORMAT_VERSION
            )));
        }

        let registry = Self {
            ballots: data.ballots,
        };
        if registry.len() != data.total {
            return Err(GadgetError::Serialization(format!(
                "Registry holds {} nullifiers but header records {}",
                registry.len(),
                data.total
            )));
        }
        Ok(registry)
    }

    /// Loads the registry at `path`, or starts an empty one if the file does
    /// not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}
