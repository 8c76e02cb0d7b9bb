//! Off-circuit MiMC-7 compression.
//!
//! The permutation is `x <- (x + k + c_i)^7` for [`config::MIMC_ROUNDS`]
//! rounds followed by a final key addition. Several inputs are folded in
//! Miyaguchi-Preneel style: `r <- r + x + MiMC7_r(x)`, starting from `r = 0`.
//! Round constants are derived from SHA-256 so that anyone can regenerate
//! them; `c_0` is zero.

use ff::Field;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::config;
use crate::error::Result;
use crate::utils::bytes31_to_field_le;
use crate::FieldElement;

/// Cached MiMC round constants.
pub(crate) static MIMC_CONSTANTS: Lazy<Vec<FieldElement>> = Lazy::new(derive_round_constants);

fn derive_round_constants() -> Vec<FieldElement> {
    let mut constants = Vec::with_capacity(config::MIMC_ROUNDS);
    constants.push(FieldElement::ZERO);
    for i in 1..config::MIMC_ROUNDS {
        let digest = Sha256::new()
            .chain_update(config::MIMC_CONSTANTS_SEED)
            .chain_update((i as u64).to_le_bytes())
            .finalize();
        // 31 bytes always fit below the modulus
        let c = bytes31_to_field_le::<FieldElement>(&digest[..31]).unwrap_or(FieldElement::ZERO);
        constants.push(c);
    }
    constants
}

/// Round constants used by both the native and in-circuit permutation.
pub fn round_constants() -> &'static [FieldElement] {
    &MIMC_CONSTANTS
}

/// MiMC-7 keyed permutation of a single element.
pub fn mimc7(x: FieldElement, k: FieldElement) -> FieldElement {
    let mut state = x;
    for c in MIMC_CONSTANTS.iter() {
        let t = state + k + c;
        let t2 = t.square();
        let t4 = t2.square();
        state = t4 * t2 * t;
    }
    state + k
}

/// Multi-input MiMC compression.
pub fn mimc_hash(inputs: &[FieldElement]) -> Result<FieldElement> {
    config::validate_arity(inputs.len())?;
    Ok(inputs
        .iter()
        .fold(FieldElement::ZERO, |r, x| r + x + mimc7(*x, r)))
}
