//! Unified error types for the biogas pipeline
//!
//! Structural and configuration problems (bad category mappings, invalid
//! hierarchy queries, solver anomalies) are fatal and surface as a
//! [`BiogasError`]. Sparse data is never an error: a region that cannot be
//! resolved is dropped from the stage output and only logged.
//!
//! # Example
//!
//! ```ignore
//! use biogas_core::{BiogasError, BiogasResult};
//!
//! fn run(params: &ParameterSet) -> BiogasResult<()> {
//!     let inventory = substrates(&excretion, &residues, params, Basis::VolatileSolids)?;
//!     maximize_production_table(&inventory, params)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all pipeline operations.
#[derive(Error, Debug)]
pub enum BiogasError {
    /// A category required by a mapping is absent from the input statistics
    #[error("source column '{0}' is missing in data")]
    MissingSourceColumn(String),

    /// Two source categories map onto the same aggregated output
    #[error("target column '{0}' is defined twice")]
    DuplicateTargetColumn(String),

    /// Hierarchy query for a level that is not strictly above/below the code
    #[error("cannot query level {requested} relative to '{code}' at level {own}")]
    InvalidLevelQuery {
        code: String,
        own: usize,
        requested: usize,
    },

    /// Region code not present in the hierarchy
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// LP solver returned something other than solved/infeasible
    #[error("unexpected solver status: {0}")]
    SolverUnexpectedStatus(String),

    /// LP solver stopped at its iteration limit
    #[error("solver iteration limit reached: {0}")]
    SolverIterationLimit(String),

    /// Basis argument outside {volatile-solids, dry-matter}
    #[error("basis must be 'volatile-solids' (VS) or 'dry-matter' (DM), got '{0}'")]
    InvalidBasisArgument(String),

    /// A coefficient table does not cover the authoritative substrate index
    #[error("table '{table}' has no entry for {key}")]
    MisalignedIndex { table: String, key: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl BiogasError {
    /// Whether re-running with relaxed solver settings could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BiogasError::SolverIterationLimit(_))
    }
}

/// Convenience type alias for Results using BiogasError.
pub type BiogasResult<T> = Result<T, BiogasError>;

impl From<serde_json::Error> for BiogasError {
    fn from(err: serde_json::Error) -> Self {
        BiogasError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BiogasError::MissingSourceColumn("A2300F".into());
        assert_eq!(err.to_string(), "source column 'A2300F' is missing in data");

        let err = BiogasError::InvalidLevelQuery {
            code: "SE1".into(),
            own: 1,
            requested: 1,
        };
        assert!(err.to_string().contains("SE1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BiogasError = io_err.into();
        assert!(matches!(err, BiogasError::Io(_)));
    }

    #[test]
    fn test_only_iteration_limit_is_retryable() {
        assert!(BiogasError::SolverIterationLimit("max iterations".into()).is_retryable());
        assert!(!BiogasError::SolverUnexpectedStatus("unbounded".into()).is_retryable());
    }
}
