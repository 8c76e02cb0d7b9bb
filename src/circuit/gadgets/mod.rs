//! Reusable gadgets.
//!
//! Each gadget takes the constraint-system handle explicitly and allocates
//! under a caller-supplied namespace.

pub mod bits;
pub mod compare;
pub mod hash;
pub mod merkle;
pub mod select;
pub mod voting;

pub use bits::{alloc_bit, from_bits, strict_range, to_bits, BitVector};
pub use compare::{assert_less_than, in_range, is_equal, is_equal_constant, is_zero, less_than};
pub use hash::{CompressionGadget, MimcCompression, PoseidonCompression};
pub use merkle::{
    alloc_path, append_root, exclusion_root, fold_path, merkle_root, update_roots, AllocatedPath,
};
pub use select::conditional_select;
pub use voting::{constrain_choice, is_one_of, nullifier, one_of_n, vote_commitment};
