//! Centralized configuration for the zkvote gadget library.
//!
//! This module contains constants, shape validators and the hash-primitive
//! selector used throughout the crate to ensure consistency and ease of
//! modification.

use serde::{Deserialize, Serialize};

use crate::error::{GadgetError, Result};

// --- Circuit Shape Parameters ---

/// Maximum supported Merkle tree depth (2^32 leaves).
pub const MAX_TREE_DEPTH: usize = 32;

/// Maximum number of field elements a compression call accepts.
pub const MAX_COMPRESSION_ARITY: usize = 16;

/// Maximum number of ballot choices (keeps one-of-n tallies tractable).
pub const MAX_CHOICES: usize = 1 << 16;

/// Maximum number of ballots in a single tally circuit.
pub const MAX_TALLY_VOTES: usize = 1 << 16;

/// Leaf value marking an unoccupied slot.
pub const EMPTY_LEAF: u64 = 0;

// --- MiMC Parameters ---

/// Number of MiMC-7 rounds (x^7 over a ~255-bit field).
pub const MIMC_ROUNDS: usize = 91;

/// Seed prefix for deriving MiMC round constants.
pub const MIMC_CONSTANTS_SEED: &[u8] = b"zkvote.mimc7";

// --- Registry I/O Constants ---

/// Maximum size for serialized nullifier registries (64 MB)
pub const MAX_REGISTRY_SIZE_BYTES: usize = 64 * 1024 * 1024;

/// Current registry format version
pub const REGISTRY_FORMAT_VERSION: u16 = 1;

// --- Test-related Constants ---

/// A fixed random seed used in tests to ensure deterministic behavior.
pub const TEST_RANDOM_SEED: u64 = 42;

/// The default tree depth used for tests and CLI defaults.
pub const DEFAULT_TREE_DEPTH: usize = 4;

/// Interchangeable compression primitives, selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashPrimitive {
    /// Poseidon sponge permutation (field-native).
    #[default]
    Poseidon,
    /// MiMC-7 block cipher in Miyaguchi-Preneel mode.
    Mimc,
}

impl HashPrimitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashPrimitive::Poseidon => "poseidon",
            HashPrimitive::Mimc => "mimc",
        }
    }
}

/// Validate a Merkle tree depth.
pub fn validate_depth(depth: usize) -> Result<()> {
    if depth == 0 || depth > MAX_TREE_DEPTH {
        return Err(GadgetError::Configuration(format!(
            "tree depth {} outside supported range [1, {}]",
            depth, MAX_TREE_DEPTH
        )));
    }
    Ok(())
}

/// Validate the number of ballot choices.
pub fn validate_num_choices(num_choices: usize) -> Result<()> {
    if num_choices == 0 || num_choices > MAX_CHOICES {
        return Err(GadgetError::Configuration(format!(
            "number of choices {} outside supported range [1, {}]",
            num_choices, MAX_CHOICES
        )));
    }
    Ok(())
}

/// Validate the number of ballots processed by a tally.
pub fn validate_num_votes(num_votes: usize) -> Result<()> {
    if num_votes == 0 || num_votes > MAX_TALLY_VOTES {
        return Err(GadgetError::Configuration(format!(
            "number of votes {} outside supported range [1, {}]",
            num_votes, MAX_TALLY_VOTES
        )));
    }
    Ok(())
}

/// Validate a compression arity.
pub fn validate_arity(arity: usize) -> Result<()> {
    if arity == 0 || arity > MAX_COMPRESSION_ARITY {
        return Err(GadgetError::Configuration(format!(
            "unsupported compression arity {} (supported: 1..={})",
            arity, MAX_COMPRESSION_ARITY
        )));
    }
    Ok(())
}

/// Bit width needed to hold `num_choices` itself.
///
/// A choice is range-checked to this width and then compared against
/// `num_choices`, so both operands of the comparator fit.
#[inline]
pub fn choice_bits(num_choices: usize) -> usize {
    (usize::BITS - num_choices.leading_zeros()).max(1) as usize
}
