//! Off-circuit ballot helpers.
//!
//! Voters compute their commitment here before the commit phase; the
//! registry and the CLI compute nullifiers and expected tallies here. The
//! values agree with the circuits because both sides go through the same
//! [`CompressionGadget`].

use crate::circuit::gadgets::hash::CompressionGadget;
use crate::config;
use crate::error::{GadgetError, Result};
use crate::FieldElement;

/// `compress4(choice, identity, salt, ballot_id)`.
pub fn commitment<H: CompressionGadget>(
    choice: u64,
    identity: FieldElement,
    salt: FieldElement,
    ballot_id: FieldElement,
) -> Result<FieldElement> {
    H::hash(&[FieldElement::from(choice), identity, salt, ballot_id])
}

/// `compress2(identity, ballot_id)`.
pub fn nullifier<H: CompressionGadget>(
    identity: FieldElement,
    ballot_id: FieldElement,
) -> Result<FieldElement> {
    H::hash(&[identity, ballot_id])
}

/// Counts votes per choice.
pub fn tally(votes: &[u64], num_choices: usize) -> Result<Vec<u64>> {
    config::validate_num_choices(num_choices)?;
    config::validate_num_votes(votes.len())?;

    let mut counts = vec![0u64; num_choices];
    for vote in votes {
        let slot = usize::try_from(*vote)
            .ok()
            .and_then(|v| counts.get_mut(v))
            .ok_or_else(|| {
                GadgetError::InvalidInput(format!(
                    "vote {} outside [0, {})",
                    vote, num_choices
                ))
            })?;
        *slot += 1;
    }
    Ok(counts)
}
