//! Prover-side witness data for each circuit.
//!
//! Witness structs hold raw field values exactly as a prover would supply
//! them. Nothing here is validated against the constraints; that is the job
//! of synthesis. Only the *shape* (path lengths, vote counts) is checked, so
//! that a caller programming error surfaces as a structural mismatch before
//! any constraint is declared.

use ff::Field;

use crate::error::{GadgetError, Result};
use crate::merkle::MerkleProof;
use crate::utils::bool_to_field;
use crate::FieldElement;

pub(crate) fn check_len(what: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(GadgetError::StructuralMismatch {
            what: what.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}

/// Sibling values and direction signals for one authentication path.
///
/// Directions are kept as field elements rather than `bool`s so that a
/// dishonest prover's non-boolean direction reaches the constraint system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathWitness {
    pub siblings: Vec<FieldElement>,
    pub directions: Vec<FieldElement>,
}

impl PathWitness {
    pub fn new(siblings: Vec<FieldElement>, directions: Vec<FieldElement>) -> Self {
        Self {
            siblings,
            directions,
        }
    }

    /// Converts a native proof into circuit form.
    pub fn from_proof(proof: &MerkleProof) -> Self {
        Self {
            siblings: proof.siblings.clone(),
            directions: proof.path_indices.iter().map(|b| bool_to_field(*b)).collect(),
        }
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        check_len("path siblings", depth, self.siblings.len())?;
        check_len("path directions", depth, self.directions.len())
    }
}

/// Inputs to an inclusion proof.
#[derive(Clone, Debug)]
pub struct InclusionWitness {
    pub leaf: FieldElement,
    pub path: PathWitness,
    pub root: FieldElement,
}

impl InclusionWitness {
    pub fn from_proof(proof: &MerkleProof, root: FieldElement) -> Self {
        Self {
            leaf: proof.leaf,
            path: PathWitness::from_proof(proof),
            root,
        }
    }
}

/// Inputs to a non-membership proof.
///
/// `slot` is the value the prover claims occupies the position; an honest
/// prover supplies the empty sentinel.
#[derive(Clone, Debug)]
pub struct ExclusionWitness {
    pub slot: FieldElement,
    pub path: PathWitness,
    pub root: FieldElement,
}

impl ExclusionWitness {
    pub fn from_proof(proof: &MerkleProof, root: FieldElement) -> Self {
        Self {
            slot: proof.leaf,
            path: PathWitness::from_proof(proof),
            root,
        }
    }
}

/// Inputs to an append-at-index proof. Directions are derived from `index`.
#[derive(Clone, Debug)]
pub struct AppendWitness {
    pub leaf: FieldElement,
    pub index: FieldElement,
    pub siblings: Vec<FieldElement>,
    pub root: FieldElement,
}

impl AppendWitness {
    pub fn from_proof(proof: &MerkleProof, root: FieldElement) -> Self {
        Self {
            leaf: proof.leaf,
            index: FieldElement::from(proof.index() as u64),
            siblings: proof.siblings.clone(),
            root,
        }
    }
}

/// Inputs to a single-leaf state transition proof.
#[derive(Clone, Debug)]
pub struct UpdateWitness {
    pub old_leaf: FieldElement,
    pub new_leaf: FieldElement,
    pub path: PathWitness,
    pub old_root: FieldElement,
    pub new_root: FieldElement,
}

/// Secret and public inputs of one ballot.
#[derive(Clone, Debug)]
pub struct BallotWitness {
    pub choice: FieldElement,
    pub identity: FieldElement,
    pub salt: FieldElement,
    pub ballot_id: FieldElement,
    /// The commitment published at commit time.
    pub commitment: FieldElement,
}

impl BallotWitness {
    pub fn new(
        choice: u64,
        identity: FieldElement,
        salt: FieldElement,
        ballot_id: FieldElement,
        commitment: FieldElement,
    ) -> Self {
        Self {
            choice: FieldElement::from(choice),
            identity,
            salt,
            ballot_id,
            commitment,
        }
    }
}

/// Private votes fed to a tally.
#[derive(Clone, Debug)]
pub struct TallyWitness {
    pub votes: Vec<FieldElement>,
}

impl TallyWitness {
    pub fn from_choices(choices: &[u64]) -> Self {
        Self {
            votes: choices.iter().map(|c| FieldElement::from(*c)).collect(),
        }
    }
}

/// A ballot reveal plus proof that the voter's identity is on the allowlist.
#[derive(Clone, Debug)]
pub struct AllowlistWitness {
    pub ballot: BallotWitness,
    pub identity_path: PathWitness,
    pub allowlist_root: FieldElement,
}

impl Default for PathWitness {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl Default for BallotWitness {
    fn default() -> Self {
        Self {
            choice: FieldElement::ZERO,
            identity: FieldElement::ZERO,
            salt: FieldElement::ZERO,
            ballot_id: FieldElement::ZERO,
            commitment: FieldElement::ZERO,
        }
    }
}
