//! Test fixtures: ballots, trees and seeded randomness.

#![allow(dead_code)]

use ff::Field;
use rand::rngs::StdRng;
use rand::SeedableRng;
use zkvote_gadgets::{
    circuit::{BallotWitness, PathWitness, UpdateWitness},
    config, voting, CompressionGadget, FieldElement, MerkleTree,
};

/// Shorthand for a small field element.
pub fn f(v: u64) -> FieldElement {
    FieldElement::from(v)
}

/// Deterministic RNG so failures are reproducible.
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(config::TEST_RANDOM_SEED)
}

pub fn random_field(rng: &mut StdRng) -> FieldElement {
    FieldElement::random(rng)
}

/// Ballot used throughout the voting examples: identity 12345, salt 67890,
/// ballot 1, with the matching commitment.
pub fn sample_ballot<H: CompressionGadget>(choice: u64) -> BallotWitness {
    ballot_with::<H>(choice, f(12345), f(67890), f(1))
}

/// A ballot with the matching commitment for the given secrets.
pub fn ballot_with<H: CompressionGadget>(
    choice: u64,
    identity: FieldElement,
    salt: FieldElement,
    ballot_id: FieldElement,
) -> BallotWitness {
    let commitment = voting::commitment::<H>(choice, identity, salt, ballot_id)
        .expect("commitment arity is supported");
    BallotWitness::new(choice, identity, salt, ballot_id, commitment)
}

/// A tree of the given depth holding leaves `10, 20, 30, ...` in its first
/// `count` slots.
pub fn sample_tree<H: CompressionGadget>(depth: usize, count: usize) -> MerkleTree<H> {
    let leaves: Vec<FieldElement> = (1..=count as u64).map(|i| f(i * 10)).collect();
    MerkleTree::from_leaves(depth, &leaves).expect("sample tree fits its depth")
}

/// Update witness for replacing the leaf at `index` with `new_leaf`.
pub fn update_witness<H: CompressionGadget>(
    tree: &MerkleTree<H>,
    index: usize,
    new_leaf: FieldElement,
) -> UpdateWitness {
    let proof = tree.proof(index).expect("index within capacity");
    let mut updated = tree.clone();
    updated.update(index, new_leaf).expect("index within capacity");
    UpdateWitness {
        old_leaf: proof.leaf,
        new_leaf,
        path: PathWitness::from_proof(&proof),
        old_root: tree.root(),
        new_root: updated.root(),
    }
}
