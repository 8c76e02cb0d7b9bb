//! Off-circuit Poseidon compression shared by the native tree, the voting
//! helpers and the in-circuit gadget.
//!
//! Keeping a single set of cached constants here ensures that commitments
//! computed by a voter and the values constrained inside a circuit can never
//! diverge.

use generic_array::typenum::U2;
use nova_snark::frontend::gadgets::poseidon::{
    IOPattern, PoseidonConstants, Simplex, Sponge, SpongeAPI, SpongeOp, SpongeTrait, Strength,
};
use once_cell::sync::Lazy;

use crate::config;
use crate::error::{GadgetError, Result};
use crate::FieldElement;

/// Cached Poseidon constants (rate 2, standard strength) for performance
pub(crate) static POSEIDON_CONSTANTS: Lazy<PoseidonConstants<FieldElement, U2>> =
    Lazy::new(|| Sponge::<FieldElement, U2>::api_constants(Strength::Standard));

/// IO pattern for a `k`-input, 1-output sponge call.
///
/// The pattern is absorbed into the sponge's initial state, so calls with
/// different arities are domain-separated from one another.
pub(crate) fn io_pattern(arity: usize) -> IOPattern {
    IOPattern(vec![SpongeOp::Absorb(arity as u32), SpongeOp::Squeeze(1)])
}

/// Poseidon hash of `inputs.len()` field elements into one.
pub fn poseidon_hash(inputs: &[FieldElement]) -> Result<FieldElement> {
    config::validate_arity(inputs.len())?;

    let mut sponge = Sponge::<FieldElement, U2>::new_with_constants(&*POSEIDON_CONSTANTS, Simplex);
    let mut acc = ();
    sponge.start(io_pattern(inputs.len()), None, &mut acc);
    SpongeAPI::absorb(&mut sponge, inputs.len() as u32, inputs, &mut acc);
    let output = SpongeAPI::squeeze(&mut sponge, 1, &mut acc);
    sponge
        .finish(&mut acc)
        .map_err(|e| GadgetError::Synthesis(format!("Poseidon sponge finish failed: {:?}", e)))?;

    output
        .first()
        .copied()
        .ok_or_else(|| GadgetError::Synthesis("Poseidon sponge squeezed nothing".to_string()))
}
