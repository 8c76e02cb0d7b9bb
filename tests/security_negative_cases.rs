//! Negative security tests that should fail.
//!
//! These tests play a dishonest prover: every witness here is crafted to
//! satisfy all but one constraint, and the circuit must name that one.

use ff::Field;
use zkvote_gadgets::circuit::{
    BallotWitness, InclusionCircuit, InclusionWitness, PathWitness, TallyCircuit, TallyWitness,
    UpdateCircuit, VoteCommitCircuit, VoteRevealCircuit,
};
use zkvote_gadgets::{CompressionGadget, FieldElement, PoseidonCompression};

mod common;
use common::assertions::assert_unsatisfied;
use common::fixtures::update_witness;
use common::{f, sample_tree};

type P = PoseidonCompression;

/// A ballot whose commitment is honestly computed over an arbitrary field
/// value for the choice.
fn ballot_with_raw_choice(choice: FieldElement) -> BallotWitness {
    let (identity, salt, ballot_id) = (f(12345), f(67890), f(1));
    let commitment = P::hash(&[choice, identity, salt, ballot_id]).unwrap();
    BallotWitness {
        choice,
        identity,
        salt,
        ballot_id,
        commitment,
    }
}

#[test]
fn test_negative_choice_wraps_and_is_rejected() {
    println!("Testing that choice = p - 1 cannot pass the range check");
    let ballot = ballot_with_raw_choice(-FieldElement::ONE);
    let circuit = VoteCommitCircuit::<P>::new(3, Some(ballot)).unwrap();
    assert_unsatisfied(&circuit, "ballot/choice_valid/choice_range/recompose");
    println!("✓ Wrapped negative choice rejected");
}

#[test]
fn test_huge_choice_rejected_by_reveal() {
    let ballot = ballot_with_raw_choice(f(1 << 40));
    let circuit = VoteRevealCircuit::<P>::new(3, Some(ballot)).unwrap();
    assert_unsatisfied(&circuit, "choice_valid");
}

#[test]
fn test_direction_outside_zero_one_rejected() {
    // direction = 1/2 would mix the two children if it were accepted
    let tree = sample_tree::<P>(2, 4);
    let proof = tree.proof(1).unwrap();
    let mut witness = InclusionWitness::from_proof(&proof, tree.root());
    witness.path.directions[0] = f(2).invert().unwrap();
    let circuit = InclusionCircuit::<P>::new(2, Some(witness)).unwrap();
    assert_unsatisfied(&circuit, "path/direction_0/bit_is_boolean/boolean");
}

#[test]
fn test_leaf_swapped_with_sibling_rejected() {
    // presenting the sibling as the leaf and vice versa, with directions kept
    let tree = sample_tree::<P>(2, 4);
    let proof = tree.proof(0).unwrap();
    let witness = InclusionWitness {
        leaf: f(20),
        path: PathWitness::new(
            vec![P::hash(&[f(10)]).unwrap(), proof.siblings[1]],
            vec![f(0), f(0)],
        ),
        root: tree.root(),
    };
    let circuit = InclusionCircuit::<P>::new(2, Some(witness)).unwrap();
    assert_unsatisfied(&circuit, "root_matches/equal");
}

#[test]
fn test_update_cannot_touch_two_leaves() {
    // New root changes two slots; a single path can explain only one.
    let tree = sample_tree::<P>(2, 4);
    let mut w = update_witness(&tree, 0, f(11));
    let mut two_changes = tree.clone();
    two_changes.update(0, f(11)).unwrap();
    two_changes.update(3, f(44)).unwrap();
    w.new_root = two_changes.root();
    let circuit = UpdateCircuit::<P>::new(2, Some(w)).unwrap();
    assert_unsatisfied(&circuit, "new_root_matches/equal");
}

#[test]
fn test_update_non_boolean_direction_rejected() {
    let tree = sample_tree::<P>(2, 4);
    let mut w = update_witness(&tree, 2, f(5));
    w.path.directions[1] = f(3);
    let circuit = UpdateCircuit::<P>::new(2, Some(w)).unwrap();
    assert_unsatisfied(&circuit, "path/direction_1/bit_is_boolean/boolean");
}

#[test]
fn test_tally_negative_vote_rejected() {
    let witness = TallyWitness {
        votes: vec![f(0), -FieldElement::ONE, f(1)],
    };
    let circuit = TallyCircuit::new(3, 3, Some(witness)).unwrap();
    assert_unsatisfied(&circuit, "vote_1/one_of_n/exactly_one");
}

#[test]
fn test_commitment_binds_ballot_id() {
    // reuse a commitment from ballot 1 in ballot 2
    let mut ballot = ballot_with_raw_choice(f(1));
    ballot.ballot_id = f(2);
    let circuit = VoteCommitCircuit::<P>::new(3, Some(ballot)).unwrap();
    assert_unsatisfied(&circuit, "ballot/commitment_matches/equal");
}
