//! Arithmetic-circuit gadgets for Merkle membership and commit-reveal voting.
//!
//! Circuits are expressed as R1CS over the Pallas scalar field using the
//! Nova frontend. Each circuit has a shape fixed at construction (tree depth,
//! number of choices, number of votes) and a pluggable compression primitive.
//!
//! ## Main Components
//!
//! - [`circuit`]: signal/constraint primitives, gadgets, circuits and [`circuit::solve`]
//! - [`merkle`]: native fixed-depth Merkle tree producing circuit witnesses
//! - [`voting`]: native commitment, nullifier and tally helpers
//! - [`registry`]: nullifier registry rejecting double votes
//! - [`config`]: limits, validators and primitive selection
//!
//! ## Error Handling
//!
//! Fallible operations return `Result<T, GadgetError>`:
//!
//! - a violated constraint is `UnsatisfiableWitness`, naming the constraint
//! - a path or vote vector of the wrong length is `StructuralMismatch`
//! - a zero depth, zero choices or unsupported arity is `Configuration`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zkvote_gadgets::circuit::{solve, BallotWitness, VoteRevealCircuit};
//! use zkvote_gadgets::{voting, FieldElement, GadgetError, PoseidonCompression};
//!
//! let identity = FieldElement::from(12345u64);
//! let salt = FieldElement::from(67890u64);
//! let ballot_id = FieldElement::from(1u64);
//! let commitment = voting::commitment::<PoseidonCompression>(2, identity, salt, ballot_id)?;
//!
//! let witness = BallotWitness::new(2, identity, salt, ballot_id, commitment);
//! let circuit = VoteRevealCircuit::<PoseidonCompression>::new(3, Some(witness))?;
//! let solved = solve(&circuit)?;
//! assert_eq!(
//!     solved.get("nullifier_hash"),
//!     Some(voting::nullifier::<PoseidonCompression>(identity, ballot_id)?)
//! );
//! # Ok::<(), GadgetError>(())
//! ```

use nova_snark::provider::PallasEngine;
use nova_snark::traits::Engine;

pub mod circuit;
pub mod config;
pub mod error;
pub mod merkle;
pub mod mimc;
pub mod poseidon;
pub mod registry;
pub mod utils;
pub mod voting;

/// The scalar field of the Pallas curve.
pub type FieldElement = <PallasEngine as Engine>::Scalar;

// Re-export commonly used types and functions for convenience
pub use circuit::gadgets::{CompressionGadget, MimcCompression, PoseidonCompression};
pub use circuit::{solve, CompiledCircuit, GadgetCircuit, Witness};
pub use config::HashPrimitive;
pub use error::{GadgetError, Result};
pub use merkle::{compute_root, verify_merkle_proof, MerkleProof, MerkleTree};
pub use registry::NullifierRegistry;
