//! Native fixed-depth Merkle tree.
//!
//! The tree mirrors the in-circuit fold exactly: a leaf enters as
//! `compress1(leaf)`, each internal node is `compress2(left, right)`, and
//! unoccupied slots hold the empty sentinel [`config::EMPTY_LEAF`]. Empty
//! subtree hashes are precomputed per level so that a sparse tree of depth 32
//! is as cheap to hold as the leaves actually written.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::circuit::gadgets::hash::CompressionGadget;
use crate::config;
use crate::error::{GadgetError, Result};
use crate::utils::{index_to_path_bits, path_bits_to_index};
use crate::FieldElement;

/// An authentication path for one leaf slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// The raw (unhashed) leaf value at the slot.
    pub leaf: FieldElement,
    /// Sibling at each level, leaf level first.
    pub siblings: Vec<FieldElement>,
    /// `true` means the current node is on the right (so the sibling is on the left).
    pub path_indices: Vec<bool>,
}

impl MerkleProof {
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// The slot index encoded by the direction bits.
    pub fn index(&self) -> usize {
        path_bits_to_index(&self.path_indices)
    }
}

/// Folds a leaf up an authentication path.
pub fn compute_root<H: CompressionGadget>(
    leaf: FieldElement,
    siblings: &[FieldElement],
    path_indices: &[bool],
) -> Result<FieldElement> {
    if siblings.len() != path_indices.len() {
        return Err(GadgetError::StructuralMismatch {
            what: "path directions".to_string(),
            expected: siblings.len(),
            got: path_indices.len(),
        });
    }

    let mut current = H::hash(&[leaf])?;
    for (sibling, is_right) in siblings.iter().zip(path_indices) {
        current = if *is_right {
            H::hash(&[*sibling, current])?
        } else {
            H::hash(&[current, *sibling])?
        };
    }
    Ok(current)
}

/// Verifies a proof against `root` off-circuit.
pub fn verify_merkle_proof<H: CompressionGadget>(
    root: FieldElement,
    proof: &MerkleProof,
) -> Result<bool> {
    Ok(compute_root::<H>(proof.leaf, &proof.siblings, &proof.path_indices)? == root)
}

/// Hash of an all-empty subtree at every level, leaf level first.
pub fn empty_subtree_hashes<H: CompressionGadget>(depth: usize) -> Result<Vec<FieldElement>> {
    let mut zeros = Vec::with_capacity(depth + 1);
    let mut current = H::hash(&[FieldElement::from(config::EMPTY_LEAF)])?;
    zeros.push(current);
    for _ in 0..depth {
        current = H::hash(&[current, current])?;
        zeros.push(current);
    }
    Ok(zeros)
}

fn leaf_capacity(depth: usize) -> usize {
    u32::try_from(depth)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .unwrap_or(usize::MAX)
}

/// A sparse, append-friendly Merkle tree of fixed depth.
///
/// Layers are stored from the hashed leaves (layer 0) to the root
/// (layer `depth`). A layer only holds entries up to the rightmost written
/// position; anything beyond is the empty-subtree hash for that level.
#[derive(Debug, Clone)]
pub struct MerkleTree<H: CompressionGadget> {
    depth: usize,
    leaves: Vec<FieldElement>,
    layers: Vec<Vec<FieldElement>>,
    zeros: Vec<FieldElement>,
    _hash: PhantomData<H>,
}

impl<H: CompressionGadget> MerkleTree<H> {
    /// Creates an empty tree.
    pub fn new(depth: usize) -> Result<Self> {
        config::validate_depth(depth)?;
        Ok(Self {
            depth,
            leaves: Vec::new(),
            layers: vec![Vec::new(); depth + 1],
            zeros: empty_subtree_hashes::<H>(depth)?,
            _hash: PhantomData,
        })
    }

    /// Creates a tree holding `leaves` in slots `0..leaves.len()`.
    pub fn from_leaves(depth: usize, leaves: &[FieldElement]) -> Result<Self> {
        let mut tree = Self::new(depth)?;
        for leaf in leaves {
            tree.append(*leaf)?;
        }
        Ok(tree)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaf slots, saturating at `usize::MAX` where `2^depth`
    /// does not fit the platform word.
    pub fn capacity(&self) -> usize {
        leaf_capacity(self.depth)
    }

    /// Index of the next slot `append` will fill.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn root(&self) -> FieldElement {
        self.node(self.depth, 0)
    }

    /// Raw value at `index`; unwritten slots read as the empty sentinel.
    pub fn leaf(&self, index: usize) -> Result<FieldElement> {
        self.check_index(index)?;
        Ok(self
            .leaves
            .get(index)
            .copied()
            .unwrap_or(FieldElement::from(config::EMPTY_LEAF)))
    }

    /// Writes `leaf` into the next free slot and returns its index.
    pub fn append(&mut self, leaf: FieldElement) -> Result<usize> {
        let index = self.leaves.len();
        if index >= self.capacity() {
            return Err(GadgetError::TreeFull {
                capacity: self.capacity(),
            });
        }
        self.write(index, leaf)?;
        Ok(index)
    }

    /// Overwrites the slot at `index` and returns the previous value.
    ///
    /// Writing past the current length fills the gap with empty leaves.
    pub fn update(&mut self, index: usize, leaf: FieldElement) -> Result<FieldElement> {
        let old = self.leaf(index)?;
        self.write(index, leaf)?;
        Ok(old)
    }

    /// Authentication path for the slot at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof> {
        let leaf = self.leaf(index)?;
        let path_indices = index_to_path_bits(index, self.depth);
        let siblings = (0..self.depth)
            .map(|level| self.node(level, (index >> level) ^ 1))
            .collect();

        Ok(MerkleProof {
            leaf,
            siblings,
            path_indices,
        })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.capacity() {
            return Err(GadgetError::IndexOutOfBounds {
                index,
                length: self.capacity(),
            });
        }
        Ok(())
    }

    fn node(&self, level: usize, index: usize) -> FieldElement {
        self.layers[level]
            .get(index)
            .copied()
            .unwrap_or(self.zeros[level])
    }

    fn write(&mut self, index: usize, leaf: FieldElement) -> Result<()> {
        self.check_index(index)?;
        if index >= self.leaves.len() {
            self.leaves
                .resize(index + 1, FieldElement::from(config::EMPTY_LEAF));
        }
        self.leaves[index] = leaf;

        let mut hash = H::hash(&[leaf])?;
        let mut current = index;
        for level in 0..=self.depth {
            let layer = &mut self.layers[level];
            if layer.len() <= current {
                layer.resize(current + 1, self.zeros[level]);
            }
            layer[current] = hash;

            if level == self.depth {
                break;
            }
            let sibling = self.node(level, current ^ 1);
            hash = if current & 1 == 1 {
                H::hash(&[sibling, hash])?
            } else {
                H::hash(&[hash, sibling])?
            };
            current >>= 1;
        }
        Ok(())
    }
}

impl<H: CompressionGadget> PartialEq for MerkleTree<H> {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth && self.root() == other.root()
    }
}
