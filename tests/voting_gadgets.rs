//! Commit-reveal voting circuit tests: commitment, reveal, allowlist and tally.

use zkvote_gadgets::circuit::{
    AllowlistRevealCircuit, AllowlistWitness, PathWitness, TallyCircuit, TallyWitness,
    VoteCommitCircuit, VoteRevealCircuit,
};
use zkvote_gadgets::{
    voting, CompressionGadget, FieldElement, GadgetCircuit, GadgetError, MerkleTree,
    MimcCompression, NullifierRegistry, PoseidonCompression,
};

mod common;
use common::assertions::{assert_error_contains, assert_solves, assert_unsatisfied};
use common::fixtures::ballot_with;
use common::{f, sample_ballot};

type P = PoseidonCompression;

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

fn commit_accepts_valid_ballot<H: CompressionGadget>() {
    let ballot = sample_ballot::<H>(2);
    let circuit = VoteCommitCircuit::<H>::new(3, Some(ballot.clone())).unwrap();
    let witness = assert_solves(&circuit);
    assert_eq!(
        witness.public_values(),
        vec![ballot.ballot_id, f(3), ballot.commitment]
    );
}

#[test]
fn test_commit_accepts_valid_ballot() {
    commit_accepts_valid_ballot::<PoseidonCompression>();
    commit_accepts_valid_ballot::<MimcCompression>();
    println!("✓ choice 2, identity 12345, salt 67890, ballot 1 commits under both primitives");
}

#[test]
fn test_commit_rejects_wrong_commitment() {
    let mut ballot = sample_ballot::<P>(2);
    ballot.commitment = f(999999);
    let circuit = VoteCommitCircuit::<P>::new(3, Some(ballot)).unwrap();
    assert_unsatisfied(&circuit, "ballot/commitment_matches/equal");
}

#[test]
fn test_commit_rejects_changed_salt() {
    let mut ballot = sample_ballot::<P>(1);
    ballot.salt = f(67891);
    let circuit = VoteCommitCircuit::<P>::new(3, Some(ballot)).unwrap();
    assert_unsatisfied(&circuit, "commitment_matches");
}

#[test]
fn test_every_valid_choice_accepted() {
    for choice in 0..5 {
        let circuit = VoteCommitCircuit::<P>::new(5, Some(sample_ballot::<P>(choice))).unwrap();
        assert_solves(&circuit);
    }
}

#[test]
fn test_choice_equal_to_num_choices_rejected() {
    // commitment honestly computed, so only the range check can fail
    let circuit = VoteCommitCircuit::<P>::new(5, Some(sample_ballot::<P>(5))).unwrap();
    assert_unsatisfied(
        &circuit,
        "ballot/choice_valid/choice_below_num_choices/less_than_holds",
    );
}

#[test]
fn test_choice_beyond_bit_width_rejected() {
    let circuit = VoteCommitCircuit::<P>::new(5, Some(sample_ballot::<P>(8))).unwrap();
    assert_unsatisfied(&circuit, "ballot/choice_valid/choice_range/recompose");
}

#[test]
fn test_single_choice_ballot() {
    assert_solves(&VoteCommitCircuit::<P>::new(1, Some(sample_ballot::<P>(0))).unwrap());
    assert_unsatisfied(
        &VoteCommitCircuit::<P>::new(1, Some(sample_ballot::<P>(1))).unwrap(),
        "less_than_holds",
    );
}

#[test]
fn test_zero_choices_rejected() {
    assert!(matches!(
        VoteCommitCircuit::<P>::new(0, None),
        Err(GadgetError::Configuration(_))
    ));
    assert!(matches!(
        VoteRevealCircuit::<P>::new(0, Some(sample_ballot::<P>(0))),
        Err(GadgetError::Configuration(_))
    ));
}

// ---------------------------------------------------------------------------
// Reveal and nullifiers
// ---------------------------------------------------------------------------

#[test]
fn test_reveal_publishes_nullifier() {
    let ballot = sample_ballot::<P>(2);
    let circuit = VoteRevealCircuit::<P>::new(3, Some(ballot.clone())).unwrap();
    let witness = assert_solves(&circuit);

    let expected = voting::nullifier::<P>(ballot.identity, ballot.ballot_id).unwrap();
    assert_eq!(witness.get("nullifier_hash"), Some(expected));
    assert_eq!(witness.get("commitment"), Some(ballot.commitment));
    assert_eq!(witness.public.len(), circuit.public_signals().len());
}

#[test]
fn test_nullifier_is_deterministic_per_identity_and_ballot() {
    let reveal = |choice: u64, identity: u64, salt: u64, ballot_id: u64| {
        let ballot = ballot_with::<P>(choice, f(identity), f(salt), f(ballot_id));
        let circuit = VoteRevealCircuit::<P>::new(3, Some(ballot)).unwrap();
        assert_solves(&circuit).get("nullifier_hash").unwrap()
    };

    let first = reveal(2, 12345, 67890, 1);
    // a second vote by the same identity, even with a fresh salt and choice
    let second = reveal(0, 12345, 11111, 1);
    let other_voter = reveal(2, 54321, 67890, 1);
    let other_ballot = reveal(2, 12345, 67890, 2);

    assert_eq!(first, second);
    assert_ne!(first, other_voter);
    assert_ne!(first, other_ballot);
}

#[test]
fn test_registry_rejects_second_reveal() {
    let mut registry = NullifierRegistry::new();

    for (choice, salt) in [(2u64, 67890u64), (1, 424242)] {
        let ballot = ballot_with::<P>(choice, f(12345), f(salt), f(1));
        let witness =
            assert_solves(&VoteRevealCircuit::<P>::new(3, Some(ballot)).unwrap());
        let ballot_id = witness.get("ballot_id").unwrap();
        let nullifier_hash = witness.get("nullifier_hash").unwrap();

        if choice == 2 {
            registry.record(ballot_id, nullifier_hash).unwrap();
        } else {
            assert_error_contains(
                registry.record(ballot_id, nullifier_hash),
                "Duplicate nullifier",
                "second reveal by the same identity",
            );
        }
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_reveal_rejects_wrong_commitment() {
    let mut ballot = sample_ballot::<P>(1);
    ballot.commitment = voting::commitment::<P>(2, ballot.identity, ballot.salt, ballot.ballot_id)
        .unwrap();
    let circuit = VoteRevealCircuit::<P>::new(3, Some(ballot)).unwrap();
    assert_unsatisfied(&circuit, "ballot/commitment_matches/equal");
}

// ---------------------------------------------------------------------------
// Allowlist reveal
// ---------------------------------------------------------------------------

fn allowlist() -> MerkleTree<P> {
    MerkleTree::from_leaves(2, &[f(12345), f(222), f(333)]).unwrap()
}

#[test]
fn test_allowlisted_identity_can_reveal() {
    let tree = allowlist();
    let ballot = sample_ballot::<P>(2);
    let witness = AllowlistWitness {
        ballot: ballot.clone(),
        identity_path: PathWitness::from_proof(&tree.proof(0).unwrap()),
        allowlist_root: tree.root(),
    };
    let circuit = AllowlistRevealCircuit::<P>::new(3, 2, Some(witness)).unwrap();
    let solved = assert_solves(&circuit);
    assert_eq!(solved.get("allowlist_root"), Some(tree.root()));
    assert_eq!(
        solved.get("nullifier_hash"),
        Some(voting::nullifier::<P>(ballot.identity, ballot.ballot_id).unwrap())
    );
}

#[test]
fn test_unlisted_identity_cannot_reveal() {
    let tree = allowlist();
    let ballot = ballot_with::<P>(2, f(999), f(67890), f(1));
    let witness = AllowlistWitness {
        ballot,
        identity_path: PathWitness::from_proof(&tree.proof(0).unwrap()),
        allowlist_root: tree.root(),
    };
    let circuit = AllowlistRevealCircuit::<P>::new(3, 2, Some(witness)).unwrap();
    assert_unsatisfied(&circuit, "allowlist_root_matches/equal");
}

#[test]
fn test_allowlist_path_depth_checked() {
    let tree = allowlist();
    let witness = AllowlistWitness {
        ballot: sample_ballot::<P>(2),
        identity_path: PathWitness::from_proof(&tree.proof(0).unwrap()),
        allowlist_root: tree.root(),
    };
    assert!(matches!(
        AllowlistRevealCircuit::<P>::new(3, 3, Some(witness)),
        Err(GadgetError::StructuralMismatch { expected: 3, got: 2, .. })
    ));
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

fn tally_counts(num_choices: usize, votes: &[u64]) -> Vec<FieldElement> {
    let circuit = TallyCircuit::new(
        num_choices,
        votes.len(),
        Some(TallyWitness::from_choices(votes)),
    )
    .unwrap();
    assert_solves(&circuit).public_values()
}

#[test]
fn test_tally_counts_votes() {
    assert_eq!(tally_counts(3, &[0, 1, 2, 0, 1]), vec![f(2), f(2), f(1)]);
    assert_eq!(tally_counts(3, &[0, 0, 0, 0, 0]), vec![f(5), f(0), f(0)]);
    println!("✓ Tally counts match expected per-choice totals");
}

#[test]
fn test_tally_agrees_with_native_count() {
    let votes = [3u64, 1, 1, 0, 3, 3, 2];
    let native = voting::tally(&votes, 4).unwrap();
    let expected: Vec<FieldElement> = native.into_iter().map(FieldElement::from).collect();
    assert_eq!(tally_counts(4, &votes), expected);
}

#[test]
fn test_tally_rejects_out_of_range_vote() {
    let circuit = TallyCircuit::new(3, 5, Some(TallyWitness::from_choices(&[0, 1, 2, 3, 1]))).unwrap();
    assert_unsatisfied(&circuit, "vote_3/one_of_n/exactly_one");
    assert!(voting::tally(&[0, 1, 2, 3, 1], 3).is_err());
}

#[test]
fn test_tally_public_signal_names() {
    let circuit = TallyCircuit::new(3, 2, None).unwrap();
    assert_eq!(circuit.public_signals(), vec!["count_0", "count_1", "count_2"]);
}
