//! Error types for the zkvote gadget library

use std::io;

use nova_snark::frontend::SynthesisError;

/// Error types for the zkvote gadget library
#[derive(Debug, thiserror::Error)]
pub enum GadgetError {
    /// Some constraint evaluates false under the supplied inputs
    #[error("Unsatisfiable witness: constraint `{constraint}` does not hold")]
    UnsatisfiableWitness { constraint: String },

    /// Path length, array width, or arity disagrees with the gadget's fixed shape
    #[error("Structural mismatch: {what} has length {got}, expected {expected}")]
    StructuralMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    /// Unsupported arity or degenerate parameter supplied at instantiation time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Constraint synthesis failed for a reason other than an unsatisfied constraint
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Index out of bounds
    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// Append attempted on a tree with no free leaf slot
    #[error("Merkle tree full: capacity {capacity} leaves")]
    TreeFull { capacity: usize },

    /// A nullifier was already recorded for this ballot
    #[error("Duplicate nullifier for ballot {ballot_id}: double vote rejected")]
    DuplicateNullifier { ballot_id: String },

    /// Invalid input parameters (generic fallback)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    IO(String),
}

impl GadgetError {
    /// Carries a caller error out of a gadget, where only `SynthesisError`
    /// can be returned. `From<SynthesisError>` recovers the original variant.
    pub fn into_synthesis_error(self) -> SynthesisError {
        SynthesisError::IoError(io::Error::new(io::ErrorKind::InvalidInput, self))
    }
}

impl From<SynthesisError> for GadgetError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Unsatisfiable => GadgetError::UnsatisfiableWitness {
                constraint: "synthesis".to_string(),
            },
            SynthesisError::IoError(e) => {
                let msg = e.to_string();
                match e.into_inner().map(|inner| inner.downcast::<GadgetError>()) {
                    Some(Ok(gadget_err)) => *gadget_err,
                    _ => GadgetError::IO(msg),
                }
            }
            other => GadgetError::Synthesis(other.to_string()),
        }
    }
}

/// Convenience Result type for gadget operations
pub type Result<T> = std::result::Result<T, GadgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_survive_synthesis() {
        let err = GadgetError::Configuration("arity 0".to_string()).into_synthesis_error();
        assert!(matches!(GadgetError::from(err), GadgetError::Configuration(m) if m == "arity 0"));

        let err = GadgetError::StructuralMismatch {
            what: "path directions".to_string(),
            expected: 2,
            got: 1,
        }
        .into_synthesis_error();
        assert!(matches!(
            GadgetError::from(err),
            GadgetError::StructuralMismatch { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn test_unsatisfiable_stays_unsatisfiable() {
        assert!(matches!(
            GadgetError::from(SynthesisError::Unsatisfiable),
            GadgetError::UnsatisfiableWitness { .. }
        ));
        let plain_io = SynthesisError::IoError(io::Error::other("disk"));
        assert!(matches!(GadgetError::from(plain_io), GadgetError::IO(_)));
    }
}
