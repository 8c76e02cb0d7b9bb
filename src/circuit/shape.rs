//! Shape extraction for circuit uniformity checks.
//!
//! A proving toolchain compiles a circuit once, from a synthesis without
//! witness values, and then proves many instances against that compilation.
//! [`circuit_shape`] runs such a value-free synthesis and fingerprints it, so
//! tests can check that setup mode and every witness produce the same
//! constraint system.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use nova_snark::frontend::{ConstraintSystem, Index, LinearCombination, SynthesisError, Variable};

use super::GadgetCircuit;
use crate::error::Result;
use crate::FieldElement;

/// Counts and a structural hash of a synthesized circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CircuitShape {
    pub num_constraints: usize,
    /// Includes the constant-one input.
    pub num_inputs: usize,
    pub num_aux: usize,
    /// Hash of the namespace and constraint annotation sequence
    pub structure_hash: u64,
}

/// A constraint system that records structure and never evaluates values.
pub struct ShapeCS {
    shape: CircuitShape,
    hasher: DefaultHasher,
}

impl ShapeCS {
    pub fn new() -> Self {
        Self {
            shape: CircuitShape {
                num_inputs: 1,
                ..CircuitShape::default()
            },
            hasher: DefaultHasher::new(),
        }
    }

    /// Finalizes the structure hash.
    pub fn finish(mut self) -> CircuitShape {
        self.shape.structure_hash = self.hasher.finish();
        self.shape
    }
}

impl Default for ShapeCS {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintSystem<FieldElement> for ShapeCS {
    type Root = Self;

    fn alloc<FN, A, AR>(&mut self, annotation: A, _f: FN) -> std::result::Result<Variable, SynthesisError>
    where
        FN: FnOnce() -> std::result::Result<FieldElement, SynthesisError>,
        A: FnOnce() -> AR,
        AR: Into<String>,
    {
        ("aux:".to_string() + &annotation().into()).hash(&mut self.hasher);
        let index = self.shape.num_aux;
        self.shape.num_aux += 1;
        Ok(Variable::new_unchecked(Index::Aux(index)))
    }

    fn alloc_input<FN, A, AR>(
        &mut self,
        annotation: A,
        _f: FN,
    ) -> std::result::Result<Variable, SynthesisError>
    where
        FN: FnOnce() -> std::result::Result<FieldElement, SynthesisError>,
        A: FnOnce() -> AR,
        AR: Into<String>,
    {
        ("input:".to_string() + &annotation().into()).hash(&mut self.hasher);
        let index = self.shape.num_inputs;
        self.shape.num_inputs += 1;
        Ok(Variable::new_unchecked(Index::Input(index)))
    }

    fn enforce<A, AR, LA, LB, LC>(&mut self, annotation: A, _a: LA, _b: LB, _c: LC)
    where
        A: FnOnce() -> AR,
        AR: Into<String>,
        LA: FnOnce(LinearCombination<FieldElement>) -> LinearCombination<FieldElement>,
        LB: FnOnce(LinearCombination<FieldElement>) -> LinearCombination<FieldElement>,
        LC: FnOnce(LinearCombination<FieldElement>) -> LinearCombination<FieldElement>,
    {
        ("enforce:".to_string() + &annotation().into()).hash(&mut self.hasher);
        self.shape.num_constraints += 1;
    }

    fn push_namespace<NR, N>(&mut self, name_fn: N)
    where
        NR: Into<String>,
        N: FnOnce() -> NR,
    {
        ("push:".to_string() + &name_fn().into()).hash(&mut self.hasher);
    }

    fn pop_namespace(&mut self) {
        "pop".hash(&mut self.hasher);
    }

    fn get_root(&mut self) -> &mut Self::Root {
        self
    }
}

/// Synthesizes `circuit` without evaluating any witness value.
pub fn circuit_shape<C: GadgetCircuit>(circuit: &C) -> Result<CircuitShape> {
    let mut cs = ShapeCS::new();
    circuit.synthesize(&mut cs)?;
    Ok(cs.finish())
}
