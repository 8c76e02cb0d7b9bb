//! Circuit definitions and witness solving.
//!
//! - `system`: signal and constraint primitives
//! - `gadgets/`: bit, comparison, hash, Merkle and ballot gadgets
//! - `witness`: prover-side witness data
//! - `membership`: Merkle inclusion, exclusion, append and update circuits
//! - `ballot`: commit, reveal, allowlist reveal and tally circuits
//! - `shape`: value-free synthesis for uniformity checks
//!
//! Every circuit implements [`GadgetCircuit`]. [`solve`] runs one against a
//! fresh in-memory constraint system and either returns the public signal
//! values or names the first violated constraint. [`CompiledCircuit`] hands
//! the same synthesis to an external proving toolchain.

pub mod ballot;
pub mod gadgets;
pub mod membership;
pub mod shape;
pub mod system;
pub mod witness;

pub use ballot::{AllowlistRevealCircuit, TallyCircuit, VoteCommitCircuit, VoteRevealCircuit};
pub use membership::{AppendCircuit, ExclusionCircuit, InclusionCircuit, UpdateCircuit};
pub use shape::{circuit_shape, CircuitShape};
pub use witness::{
    AllowlistWitness, AppendWitness, BallotWitness, ExclusionWitness, InclusionWitness,
    PathWitness, TallyWitness, UpdateWitness,
};

use nova_snark::frontend::{
    gadgets::num::AllocatedNum,
    util_cs::{test_cs::TestConstraintSystem, witness_cs::WitnessCS},
    Circuit, ConstraintSystem, SynthesisError,
};
use tracing::{debug, debug_span, warn};

use crate::error::{GadgetError, Result};
use crate::FieldElement;

/// A circuit with a fixed shape and an ordered list of public signals.
pub trait GadgetCircuit {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    /// Names of the public signals, in the order `synthesize` returns them.
    fn public_signals(&self) -> Vec<String>;

    /// Declares all signals and constraints into `cs`, returning the public
    /// signals.
    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        &self,
        cs: &mut CS,
    ) -> std::result::Result<Vec<AllocatedNum<FieldElement>>, SynthesisError>;
}

/// A satisfying assignment: every instance and auxiliary variable, plus the
/// named public signals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness {
    pub circuit: &'static str,
    /// Public signal names and values, in declaration order.
    pub public: Vec<(String, FieldElement)>,
    /// Instance variables, starting with the constant ONE.
    pub input_assignment: Vec<FieldElement>,
    /// Auxiliary (private) variables in allocation order.
    pub aux_assignment: Vec<FieldElement>,
    pub num_constraints: usize,
}

impl Witness {
    /// Value of the named public signal.
    pub fn get(&self, name: &str) -> Option<FieldElement> {
        self.public
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Public values in order.
    pub fn public_values(&self) -> Vec<FieldElement> {
        self.public.iter().map(|(_, v)| *v).collect()
    }

    pub fn num_inputs(&self) -> usize {
        self.input_assignment.len()
    }

    pub fn num_aux(&self) -> usize {
        self.aux_assignment.len()
    }
}

/// Synthesizes `circuit` with its witness and checks every constraint.
///
/// Returns the full assignment only if all constraints hold; otherwise
/// reports the path of the first violated constraint.
pub fn solve<C: GadgetCircuit>(circuit: &C) -> Result<Witness> {
    let span = debug_span!("solve", circuit = circuit.name());
    let _enter = span.enter();

    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let outputs = circuit.synthesize(&mut cs)?;

    debug!(num_constraints = cs.num_constraints(), "Synthesized circuit");

    if !cs.is_satisfied() {
        let constraint = cs
            .which_is_unsatisfied()
            .unwrap_or("<unknown>")
            .to_string();
        warn!(circuit = circuit.name(), %constraint, "Witness does not satisfy circuit");
        return Err(GadgetError::UnsatisfiableWitness { constraint });
    }

    let names = circuit.public_signals();
    if names.len() != outputs.len() {
        return Err(GadgetError::StructuralMismatch {
            what: format!("{} public signals", circuit.name()),
            expected: names.len(),
            got: outputs.len(),
        });
    }

    let public = names
        .into_iter()
        .zip(outputs.iter())
        .map(|(name, num)| {
            num.get_value()
                .map(|v| (name.clone(), v))
                .ok_or_else(|| GadgetError::Synthesis(format!("public signal `{}` unassigned", name)))
        })
        .collect::<Result<Vec<_>>>()?;

    // second pass records the raw assignment vectors
    let mut assignment = WitnessCS::<FieldElement>::new();
    circuit.synthesize(&mut assignment)?;
    debug!(
        num_inputs = assignment.input_assignment().len(),
        num_aux = assignment.aux_assignment().len(),
        "Recorded assignment"
    );

    Ok(Witness {
        circuit: circuit.name(),
        public,
        input_assignment: assignment.input_assignment().to_vec(),
        aux_assignment: assignment.aux_assignment().to_vec(),
        num_constraints: cs.num_constraints(),
    })
}

/// Adapts a [`GadgetCircuit`] to the frontend's [`Circuit`] trait so that a
/// proving-system toolchain can consume it.
#[derive(Clone, Debug)]
pub struct CompiledCircuit<C: GadgetCircuit>(pub C);

impl<C: GadgetCircuit> Circuit<FieldElement> for CompiledCircuit<C> {
    fn synthesize<CS: ConstraintSystem<FieldElement>>(
        self,
        cs: &mut CS,
    ) -> std::result::Result<(), SynthesisError> {
        self.0.synthesize(cs).map(|_| ())
    }
}
