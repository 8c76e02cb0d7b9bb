//! Merkle path gadgets.
//!
//! Every variant is the same fold: `acc_0 = compress1(leaf)`, then for each
//! level `acc' = compress2(left, right)` where the direction bit decides
//! whether the accumulator sits on the left (0) or right (1). The variants
//! differ only in where the leaf and the direction bits come from.

use nova_snark::frontend::{gadgets::num::AllocatedNum, ConstraintSystem, SynthesisError};

use super::bits::{alloc_bit, to_bits};
use super::hash::CompressionGadget;
use super::select::order_pair;
use crate::circuit::system::{declare_signal, enforce_constant, SignalKind};
use crate::circuit::witness::PathWitness;
use crate::config;
use crate::error::GadgetError;
use crate::FieldElement;

/// An allocated authentication path with boolean-constrained directions.
#[derive(Clone, Debug)]
pub struct AllocatedPath {
    pub siblings: Vec<AllocatedNum<FieldElement>>,
    pub directions: Vec<AllocatedNum<FieldElement>>,
}

impl AllocatedPath {
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// Allocates `depth` private siblings.
pub fn alloc_siblings<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    depth: usize,
    siblings: Option<&[FieldElement]>,
) -> Result<Vec<AllocatedNum<FieldElement>>, SynthesisError> {
    (0..depth)
        .map(|i| {
            declare_signal(
                cs.namespace(|| format!("sibling_{}", i)),
                SignalKind::PrivateInput,
                siblings.and_then(|s| s.get(i).copied()),
            )
        })
        .collect()
}

/// Allocates a private path of exactly `depth` levels.
///
/// With no witness (setup mode) every value is unassigned but the shape is
/// identical.
pub fn alloc_path<CS: ConstraintSystem<FieldElement>>(
    mut cs: CS,
    depth: usize,
    witness: Option<&PathWitness>,
) -> Result<AllocatedPath, SynthesisError> {
    let siblings = alloc_siblings(
        cs.namespace(|| "siblings"),
        depth,
        witness.map(|w| w.siblings.as_slice()),
    )?;
    let directions = (0..depth)
        .map(|i| {
            alloc_bit(
                cs.namespace(|| format!("direction_{}", i)),
                witness.and_then(|w| w.directions.get(i).copied()),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AllocatedPath {
        siblings,
        directions,
    })
}

/// One level of the fold.
pub fn fold_step<H, CS>(
    mut cs: CS,
    acc: &AllocatedNum<FieldElement>,
    sibling: &AllocatedNum<FieldElement>,
    direction: &AllocatedNum<FieldElement>,
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    let (left, right) = order_pair(cs.namespace(|| "order"), direction, acc, sibling)?;
    H::hash_gadget(cs.namespace(|| "node"), &[left, right])
}

/// Folds an already-hashed leaf up the path.
pub fn fold_path<H, CS>(
    mut cs: CS,
    start: &AllocatedNum<FieldElement>,
    siblings: &[AllocatedNum<FieldElement>],
    directions: &[AllocatedNum<FieldElement>],
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    if siblings.len() != directions.len() {
        return Err(GadgetError::StructuralMismatch {
            what: "path directions".to_string(),
            expected: siblings.len(),
            got: directions.len(),
        }
        .into_synthesis_error());
    }
    let mut acc = start.clone();
    for (i, (sibling, direction)) in siblings.iter().zip(directions).enumerate() {
        acc = fold_step::<H, _>(cs.namespace(|| format!("level_{}", i)), &acc, sibling, direction)?;
    }
    Ok(acc)
}

/// Root of the tree holding `leaf` at the position described by `path`.
pub fn merkle_root<H, CS>(
    mut cs: CS,
    leaf: &AllocatedNum<FieldElement>,
    path: &AllocatedPath,
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    let leaf_hash = H::hash_gadget(cs.namespace(|| "leaf_hash"), std::slice::from_ref(leaf))?;
    fold_path::<H, _>(
        cs.namespace(|| "fold"),
        &leaf_hash,
        &path.siblings,
        &path.directions,
    )
}

/// Root of a tree whose slot at `path` is empty.
///
/// `slot` is constrained to the empty sentinel, so a prover cannot pass off
/// an occupied position as vacant.
pub fn exclusion_root<H, CS>(
    mut cs: CS,
    slot: &AllocatedNum<FieldElement>,
    path: &AllocatedPath,
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    enforce_constant(
        cs.namespace(|| "slot_is_empty"),
        slot,
        FieldElement::from(config::EMPTY_LEAF),
    );
    merkle_root::<H, _>(cs.namespace(|| "root"), slot, path)
}

/// Root after placing `leaf` at `index`; directions are the low `depth` bits
/// of `index`, so an index at or beyond `2^depth` is unsatisfiable.
pub fn append_root<H, CS>(
    mut cs: CS,
    leaf: &AllocatedNum<FieldElement>,
    index: &AllocatedNum<FieldElement>,
    siblings: &[AllocatedNum<FieldElement>],
) -> Result<AllocatedNum<FieldElement>, SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    let directions = to_bits(cs.namespace(|| "index_bits"), index, siblings.len())?;
    let leaf_hash = H::hash_gadget(cs.namespace(|| "leaf_hash"), std::slice::from_ref(leaf))?;
    fold_path::<H, _>(
        cs.namespace(|| "fold"),
        &leaf_hash,
        siblings,
        directions.bits(),
    )
}

/// Roots before and after replacing `old_leaf` with `new_leaf` along one
/// shared path.
pub fn update_roots<H, CS>(
    mut cs: CS,
    old_leaf: &AllocatedNum<FieldElement>,
    new_leaf: &AllocatedNum<FieldElement>,
    path: &AllocatedPath,
) -> Result<(AllocatedNum<FieldElement>, AllocatedNum<FieldElement>), SynthesisError>
where
    H: CompressionGadget,
    CS: ConstraintSystem<FieldElement>,
{
    let old_root = merkle_root::<H, _>(cs.namespace(|| "old"), old_leaf, path)?;
    let new_root = merkle_root::<H, _>(cs.namespace(|| "new"), new_leaf, path)?;
    Ok((old_root, new_root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::gadgets::hash::PoseidonCompression;
    use crate::merkle::MerkleTree;
    use nova_snark::frontend::util_cs::test_cs::TestConstraintSystem;

    #[test]
    fn test_gadget_root_matches_native_tree() {
        let leaves: Vec<_> = (1..=4u64).map(FieldElement::from).collect();
        let tree = MerkleTree::<PoseidonCompression>::from_leaves(2, &leaves).unwrap();
        let proof = tree.proof(3).unwrap();

        let mut cs = TestConstraintSystem::<FieldElement>::new();
        let leaf = declare_signal(cs.namespace(|| "leaf"), SignalKind::PrivateInput, Some(proof.leaf)).unwrap();
        let path = alloc_path(
            cs.namespace(|| "path"),
            2,
            Some(&PathWitness::from_proof(&proof)),
        )
        .unwrap();
        let root = merkle_root::<PoseidonCompression, _>(cs.namespace(|| "root"), &leaf, &path).unwrap();

        assert!(cs.is_satisfied());
        assert_eq!(root.get_value(), Some(tree.root()));
    }

    #[test]
    fn test_direction_two_is_rejected() {
        let mut cs = TestConstraintSystem::<FieldElement>::new();
        let witness = PathWitness::new(
            vec![FieldElement::from(5u64)],
            vec![FieldElement::from(2u64)],
        );
        let _ = alloc_path(cs.namespace(|| "path"), 1, Some(&witness)).unwrap();
        assert!(!cs.is_satisfied());
        assert_eq!(
            cs.which_is_unsatisfied(),
            Some("path/direction_0/bit_is_boolean/boolean")
        );
    }
}
