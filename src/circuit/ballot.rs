//! Commit-reveal voting circuits and the tally.
//!
//! Public signal layouts:
//!
//! | circuit                 | public signals                                                   |
//! |-------------------------|------------------------------------------------------------------|
//! | `VoteCommitCircuit`     | `ballot_id, num_choices, commitment`                             |
//! | `VoteRevealCircuit`     | `ballot_id, num_choices, commitment, nullifier_hash`             |
//! | `AllowlistRevealCircuit`| `allowlist_root, ballot_id, num_choices, commitment, nullifier_hash` |
//! | `TallyCircuit`          | `count_0 .. count_{c-1}`                                         |

use std::marker::PhantomData;

use nova_snark::frontend::{gadgets::num::AllocatedNum, ConstraintSystem, SynthesisError};

#[cfg(debug_assertions)]
use tracing::debug;

use super::gadgets::hash::CompressionGadget;
use super::gadgets::merkle::{alloc_path, merkle_root};
use super::gadgets::voting::{constrain_choice, nullifier, one_of_n, tally_counts, vote_commitment};
use super::system::{declare_signal, enforce_constant, enforce_equal, expose_output, SignalKind};
use super::witness::{check_len, AllowlistWitness, BallotWitness, TallyWitness};
use super::GadgetCircuit;
use crate::config;
use crate::error::Result;
use crate::FieldElement;

const COMMIT_SIGNALS: [&str; 3] = ["ballot_id", "num_choices", "commitment"];

/// Signals shared by every ballot circuit once the commitment is checked.
struct CheckedBallot {
    identity: AllocatedNum<FieldElement>,
    ballot_id: AllocatedNum<FieldElement>,
    num_choices: AllocatedNum<FieldElement>,
    commitment: AllocatedNum<FieldElement>,
}

/// Allocates a ballot, range-checks its choice and binds it to the public
/// commitment.
fn synthesize_commit<H, CS>(
    mut cs: CS,
    num_choices: usize,
    w: Option<&BallotWitness>,
) -> std::result::Result<CheckedBallot, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    let ballot_id = declare_signal(
        cs.namespace(|| "ballot_id"),
        SignalKind::PublicInput,
        w.map(|w| w.ballot_id),
    )?;
    // Known to both sides even in setup mode.
    let num_choices_value = FieldElement::from(num_choices as u64);
    let num_choices_signal = declare_signal(
        cs.namespace(|| "num_choices"),
        SignalKind::PublicInput,
        Some(num_choices_value),
    )?;
    enforce_constant(
        cs.namespace(|| "num_choices_fixed"),
        &num_choices_signal,
        num_choices_value,
    );
    let commitment = declare_signal(
        cs.namespace(|| "commitment"),
        SignalKind::PublicInput,
        w.map(|w| w.commitment),
    )?;

    let choice = declare_signal(cs.namespace(|| "choice"), SignalKind::PrivateInput, w.map(|w| w.choice))?;
    let identity = declare_signal(
        cs.namespace(|| "identity"),
        SignalKind::PrivateInput,
        w.map(|w| w.identity),
    )?;
    let salt = declare_signal(cs.namespace(|| "salt"), SignalKind::PrivateInput, w.map(|w| w.salt))?;

    constrain_choice(
        cs.namespace(|| "choice_valid"),
        &choice,
        &num_choices_signal,
        num_choices,
    )?;
    let computed = vote_commitment::<H, _>(
        cs.namespace(|| "recompute"),
        &choice,
        &identity,
        &salt,
        &ballot_id,
    )?;
    enforce_equal(cs.namespace(|| "commitment_matches"), &computed, &commitment);

    Ok(CheckedBallot {
        identity,
        ballot_id,
        num_choices: num_choices_signal,
        commitment,
    })
}

macro_rules! ballot_constructor {
    ($circuit:ident) => {
        impl<H: CompressionGadget> $circuit<H> {
            pub fn new(num_choices: usize, witness: Option<BallotWitness>) -> Result<Self> {
                config::validate_num_choices(num_choices)?;
                Ok(Self {
                    num_choices,
                    witness,
                    _hash: PhantomData,
                })
            }

            pub fn num_choices(&self) -> usize {
                self.num_choices
            }
        }
    };
}

/// Proves a public commitment hides a valid choice for this ballot.
#[derive(Clone, Debug)]
pub struct VoteCommitCircuit<H: CompressionGadget> {
    num_choices: usize,
    witness: Option<BallotWitness>,
    _hash: PhantomData<H>,
}

ballot_constructor!(VoteCommitCircuit);

impl<H: CompressionGadget> GadgetCircuit for VoteCommitCircuit<H> {
    fn name(&self) -> &'static str {
        "vote_commit"
    }

    fn public_signals(&self) -> Vec<String> {
        COMMIT_SIGNALS.iter().map(|s| s.to_string()).collect()
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let ballot = synthesize_commit::<H, _>(
            cs.namespace(|| "ballot"),
            self.num_choices,
            self.witness.as_ref(),
        )?;
        Ok(vec![ballot.ballot_id, ballot.num_choices, ballot.commitment])
    }
}

/// Opens a commitment and publishes the ballot's nullifier.
#[derive(Clone, Debug)]
pub struct VoteRevealCircuit<H: CompressionGadget> {
    num_choices: usize,
    witness: Option<BallotWitness>,
    _hash: PhantomData<H>,
}

ballot_constructor!(VoteRevealCircuit);

impl<H: CompressionGadget> GadgetCircuit for VoteRevealCircuit<H> {
    fn name(&self) -> &'static str {
        "vote_reveal"
    }

    fn public_signals(&self) -> Vec<String> {
        COMMIT_SIGNALS
            .iter()
            .chain(["nullifier_hash"].iter())
            .map(|s| s.to_string())
            .collect()
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let ballot = synthesize_commit::<H, _>(
            cs.namespace(|| "ballot"),
            self.num_choices,
            self.witness.as_ref(),
        )?;
        let nullifier_hash = nullifier::<H, _>(
            cs.namespace(|| "derive_nullifier"),
            &ballot.identity,
            &ballot.ballot_id,
        )?;
        expose_output(cs.namespace(|| "nullifier_hash"), &nullifier_hash)?;
        Ok(vec![
            ballot.ballot_id,
            ballot.num_choices,
            ballot.commitment,
            nullifier_hash,
        ])
    }
}

/// A reveal whose identity must also be a leaf of a public allowlist tree.
#[derive(Clone, Debug)]
pub struct AllowlistRevealCircuit<H: CompressionGadget> {
    num_choices: usize,
    depth: usize,
    witness: Option<AllowlistWitness>,
    _hash: PhantomData<H>,
}

impl<H: CompressionGadget> AllowlistRevealCircuit<H> {
    pub fn new(num_choices: usize, depth: usize, witness: Option<AllowlistWitness>) -> Result<Self> {
        config::validate_num_choices(num_choices)?;
        config::validate_depth(depth)?;
        if let Some(w) = &witness {
            w.identity_path.check_depth(depth)?;
        }
        Ok(Self {
            num_choices,
            depth,
            witness,
            _hash: PhantomData,
        })
    }
}

impl<H: CompressionGadget> GadgetCircuit for AllowlistRevealCircuit<H> {
    fn name(&self) -> &'static str {
        "allowlist_reveal"
    }

    fn public_signals(&self) -> Vec<String> {
        ["allowlist_root"]
            .iter()
            .chain(COMMIT_SIGNALS.iter())
            .chain(["nullifier_hash"].iter())
            .map(|s| s.to_string())
            .collect()
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let w = self.witness.as_ref();
        #[cfg(debug_assertions)]
        debug!(
            num_choices = self.num_choices,
            depth = self.depth,
            hash = H::NAME,
            "AllowlistRevealCircuit::synthesize()"
        );
        let allowlist_root = declare_signal(
            cs.namespace(|| "allowlist_root"),
            SignalKind::PublicInput,
            w.map(|w| w.allowlist_root),
        )?;
        let ballot = synthesize_commit::<H, _>(
            cs.namespace(|| "ballot"),
            self.num_choices,
            w.map(|w| &w.ballot),
        )?;

        let path = alloc_path(
            cs.namespace(|| "identity_path"),
            self.depth,
            w.map(|w| &w.identity_path),
        )?;
        let computed = merkle_root::<H, _>(cs.namespace(|| "membership"), &ballot.identity, &path)?;
        enforce_equal(cs.namespace(|| "allowlist_root_matches"), &computed, &allowlist_root);

        let nullifier_hash = nullifier::<H, _>(
            cs.namespace(|| "derive_nullifier"),
            &ballot.identity,
            &ballot.ballot_id,
        )?;
        expose_output(cs.namespace(|| "nullifier_hash"), &nullifier_hash)?;
        Ok(vec![
            allowlist_root,
            ballot.ballot_id,
            ballot.num_choices,
            ballot.commitment,
            nullifier_hash,
        ])
    }
}

/// Counts private votes per choice and publishes the counts.
#[derive(Clone, Debug)]
pub struct TallyCircuit {
    num_choices: usize,
    num_votes: usize,
    witness: Option<TallyWitness>,
}

impl TallyCircuit {
    pub fn new(num_choices: usize, num_votes: usize, witness: Option<TallyWitness>) -> Result<Self> {
        config::validate_num_choices(num_choices)?;
        config::validate_num_votes(num_votes)?;
        if let Some(w) = &witness {
            check_len("votes", num_votes, w.votes.len())?;
        }
        Ok(Self {
            num_choices,
            num_votes,
            witness,
        })
    }
}

impl GadgetCircuit for TallyCircuit {
    fn name(&self) -> &'static str {
        "tally"
    }

    fn public_signals(&self) -> Vec<String> {
        (0..self.num_choices).map(|j| format!("count_{}", j)).collect()
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let votes = self.witness.as_ref().map(|w| w.votes.as_slice());

        #[cfg(debug_assertions)]
        {
            debug!("TallyCircuit::synthesize() entry:");
            debug!("  - num_choices: {}", self.num_choices);
            debug!("  - num_votes: {}", self.num_votes);
            debug!("  - witness supplied: {}", votes.is_some());
        }

        let mut indicators = Vec::with_capacity(self.num_votes);
        for i in 0..self.num_votes {
            let mut cs = cs.namespace(|| format!("vote_{}", i));
            let vote = declare_signal(
                cs.namespace(|| "value"),
                SignalKind::PrivateInput,
                votes.and_then(|v| v.get(i).copied()),
            )?;
            indicators.push(one_of_n(cs.namespace(|| "one_of_n"), &vote, self.num_choices)?);
        }

        let counts = tally_counts(cs.namespace(|| "counts"), &indicators, self.num_choices)?;
        for (j, count) in counts.iter().enumerate() {
            expose_output(cs.namespace(|| format!("count_{}", j)), count)?;
        }
        Ok(counts)
    }
}
