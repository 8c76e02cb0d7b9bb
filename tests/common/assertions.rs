//! High-level assertion helpers for common test patterns.
//!
//! These encapsulate the two outcomes a circuit test cares about: the
//! witness solves, or it is rejected at a specific constraint.

#![allow(dead_code)]

use zkvote_gadgets::{solve, GadgetCircuit, GadgetError, Witness};

/// Asserts that the circuit's witness satisfies every constraint.
pub fn assert_solves<C: GadgetCircuit>(circuit: &C) -> Witness {
    match solve(circuit) {
        Ok(witness) => witness,
        Err(e) => panic!("{} should have solved, but failed: {}", circuit.name(), e),
    }
}

/// Asserts that solving fails with an unsatisfied constraint whose path
/// contains `expected_constraint`.
pub fn assert_unsatisfied<C: GadgetCircuit>(circuit: &C, expected_constraint: &str) {
    match solve(circuit) {
        Ok(_) => panic!(
            "SECURITY VIOLATION: {} accepted a witness that should be rejected",
            circuit.name()
        ),
        Err(GadgetError::UnsatisfiableWitness { constraint }) => {
            assert!(
                constraint.contains(expected_constraint),
                "Expected violated constraint to contain '{}', but got: {}",
                expected_constraint,
                constraint
            );
        }
        Err(other) => panic!("Expected an unsatisfiable witness, got: {}", other),
    }
}

/// Asserts that a result is an error whose message contains `expected`.
pub fn assert_error_contains<T, E: std::fmt::Display>(
    result: Result<T, E>,
    expected: &str,
    context: &str,
) {
    match result {
        Ok(_) => panic!("{}: expected an error containing '{}'", context, expected),
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "{}: expected error to contain '{}', but got: {}",
                context,
                expected,
                msg
            );
        }
    }
}
