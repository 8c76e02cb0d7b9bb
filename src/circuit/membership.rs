//! Merkle membership circuits: inclusion, exclusion, append and update.
//!
//! Each circuit fixes its tree depth at construction. A witness whose path
//! length disagrees with that depth is rejected before synthesis, and a
//! circuit built without a witness synthesizes the identical shape with
//! unassigned values.

use std::marker::PhantomData;

use nova_snark::frontend::{gadgets::num::AllocatedNum, ConstraintSystem, SynthesisError};

#[cfg(debug_assertions)]
use tracing::debug;

use super::gadgets::hash::CompressionGadget;
use super::gadgets::merkle::{
    alloc_path, alloc_siblings, append_root, exclusion_root, merkle_root, update_roots,
};
use super::system::{declare_signal, enforce_equal, SignalKind};
use super::witness::{check_len, AppendWitness, ExclusionWitness, InclusionWitness, UpdateWitness};
use super::GadgetCircuit;
use crate::config;
use crate::error::Result;
use crate::FieldElement;

/// Proves that a private leaf sits under a public root.
#[derive(Clone, Debug)]
pub struct InclusionCircuit<H: CompressionGadget> {
    depth: usize,
    witness: Option<InclusionWitness>,
    _hash: PhantomData<H>,
}

impl<H: CompressionGadget> InclusionCircuit<H> {
    pub fn new(depth: usize, witness: Option<InclusionWitness>) -> Result<Self> {
        config::validate_depth(depth)?;
        if let Some(w) = &witness {
            w.path.check_depth(depth)?;
        }
        Ok(Self {
            depth,
            witness,
            _hash: PhantomData,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<H: CompressionGadget> GadgetCircuit for InclusionCircuit<H> {
    fn name(&self) -> &'static str {
        "merkle_inclusion"
    }

    fn public_signals(&self) -> Vec<String> {
        vec!["root".to_string()]
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let w = self.witness.as_ref();
        let root = declare_signal(cs.namespace(|| "root"), SignalKind::PublicInput, w.map(|w| w.root))?;
        let leaf = declare_signal(cs.namespace(|| "leaf"), SignalKind::PrivateInput, w.map(|w| w.leaf))?;
        let path = alloc_path(cs.namespace(|| "path"), self.depth, w.map(|w| &w.path))?;

        let computed = merkle_root::<H, _>(cs.namespace(|| "inclusion"), &leaf, &path)?;
        enforce_equal(cs.namespace(|| "root_matches"), &computed, &root);
        Ok(vec![root])
    }
}

/// Proves that the slot at a private position under a public root is empty.
#[derive(Clone, Debug)]
pub struct ExclusionCircuit<H: CompressionGadget> {
    depth: usize,
    witness: Option<ExclusionWitness>,
    _hash: PhantomData<H>,
}

impl<H: CompressionGadget> ExclusionCircuit<H> {
    pub fn new(depth: usize, witness: Option<ExclusionWitness>) -> Result<Self> {
        config::validate_depth(depth)?;
        if let Some(w) = &witness {
            w.path.check_depth(depth)?;
        }
        Ok(Self {
            depth,
            witness,
            _hash: PhantomData,
        })
    }
}

impl<H: CompressionGadget> GadgetCircuit for ExclusionCircuit<H> {
    fn name(&self) -> &'static str {
        "merkle_exclusion"
    }

    fn public_signals(&self) -> Vec<String> {
        vec!["root".to_string()]
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let w = self.witness.as_ref();
        let root = declare_signal(cs.namespace(|| "root"), SignalKind::PublicInput, w.map(|w| w.root))?;
        let slot = declare_signal(cs.namespace(|| "slot"), SignalKind::PrivateInput, w.map(|w| w.slot))?;
        let path = alloc_path(cs.namespace(|| "path"), self.depth, w.map(|w| &w.path))?;

        let computed = exclusion_root::<H, _>(cs.namespace(|| "exclusion"), &slot, &path)?;
        enforce_equal(cs.namespace(|| "root_matches"), &computed, &root);
        Ok(vec![root])
    }
}

/// Proves that a private leaf sits at a public index under a public root.
#[derive(Clone, Debug)]
pub struct AppendCircuit<H: CompressionGadget> {
    depth: usize,
    witness: Option<AppendWitness>,
    _hash: PhantomData<H>,
}

impl<H: CompressionGadget> AppendCircuit<H> {
    pub fn new(depth: usize, witness: Option<AppendWitness>) -> Result<Self> {
        config::validate_depth(depth)?;
        if let Some(w) = &witness {
            check_len("path siblings", depth, w.siblings.len())?;
        }
        Ok(Self {
            depth,
            witness,
            _hash: PhantomData,
        })
    }
}

impl<H: CompressionGadget> GadgetCircuit for AppendCircuit<H> {
    fn name(&self) -> &'static str {
        "merkle_append"
    }

    fn public_signals(&self) -> Vec<String> {
        vec!["index".to_string(), "root".to_string()]
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let w = self.witness.as_ref();
        #[cfg(debug_assertions)]
        debug!(
            depth = self.depth,
            hash = H::NAME,
            has_witness = w.is_some(),
            "AppendCircuit::synthesize()"
        );
        let index = declare_signal(cs.namespace(|| "index"), SignalKind::PublicInput, w.map(|w| w.index))?;
        let root = declare_signal(cs.namespace(|| "root"), SignalKind::PublicInput, w.map(|w| w.root))?;
        let leaf = declare_signal(cs.namespace(|| "leaf"), SignalKind::PrivateInput, w.map(|w| w.leaf))?;
        let siblings = alloc_siblings(
            cs.namespace(|| "siblings"),
            self.depth,
            w.map(|w| w.siblings.as_slice()),
        )?;

        let computed = append_root::<H, _>(cs.namespace(|| "append"), &leaf, &index, &siblings)?;
        enforce_equal(cs.namespace(|| "root_matches"), &computed, &root);
        Ok(vec![index, root])
    }
}

/// Proves a single-leaf transition from a public old root to a public new
/// root without revealing the position or any other leaf.
#[derive(Clone, Debug)]
pub struct UpdateCircuit<H: CompressionGadget> {
    depth: usize,
    witness: Option<UpdateWitness>,
    _hash: PhantomData<H>,
}

impl<H: CompressionGadget> UpdateCircuit<H> {
    pub fn new(depth: usize, witness: Option<UpdateWitness>) -> Result<Self> {
        config::validate_depth(depth)?;
        if let Some(w) = &witness {
            w.path.check_depth(depth)?;
        }
        Ok(Self {
            depth,
            witness,
            _hash: PhantomData,
        })
    }
}

impl<H: CompressionGadget> GadgetCircuit for UpdateCircuit<H> {
    fn name(&self) -> &'static str {
        "merkle_update"
    }

    fn public_signals(&self) -> Vec<String> {
        vec!["old_root".to_string(), "new_root".to_string()]
    }

    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
        let w = self.witness.as_ref();
        #[cfg(debug_assertions)]
        debug!(
            depth = self.depth,
            hash = H::NAME,
            has_witness = w.is_some(),
            "UpdateCircuit::synthesize()"
        );
        let old_root = declare_signal(
            cs.namespace(|| "old_root"),
            SignalKind::PublicInput,
            w.map(|w| w.old_root),
        )?;
        let new_root = declare_signal(
            cs.namespace(|| "new_root"),
            SignalKind::PublicInput,
            w.map(|w| w.new_root),
        )?;
        let old_leaf = declare_signal(
            cs.namespace(|| "old_leaf"),
            SignalKind::PrivateInput,
            w.map(|w| w.old_leaf),
        )?;
        let new_leaf = declare_signal(
            cs.namespace(|| "new_leaf"),
            SignalKind::PrivateInput,
            w.map(|w| w.new_leaf),
        )?;
        let path = alloc_path(cs.namespace(|| "path"), self.depth, w.map(|w| &w.path))?;

        let (old_computed, new_computed) =
            update_roots::<H, _>(cs.namespace(|| "update"), &old_leaf, &new_leaf, &path)?;
        enforce_equal(cs.namespace(|| "old_root_matches"), &old_computed, &old_root);
        enforce_equal(cs.namespace(|| "new_root_matches"), &new_computed, &new_root);
        Ok(vec![old_root, new_root])
    }
}
