use std::fmt::Display;

/// Errors raised while constructing or applying an evaluator operation.
///
/// All of these are definition errors: they are reported by the operation
/// that detects them before any row is evaluated. A well-formed report never
/// produces one.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    UnknownColumn { name: String, candidates: Vec<String> },
    UnknownAggregate(String),
    DuplicateColumn(String),
    AggregateArgMismatch { name: String, expected: String },
    UnknownReport(String),
    Other(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::UnknownColumn { name, candidates } => {
                write!(f, "unknown column '{}' (have: {})", name, candidates.join(", "))
            }
            EngineError::UnknownAggregate(name) => write!(f, "unknown aggregate '{}'", name),
            EngineError::DuplicateColumn(name) => write!(f, "duplicate output column '{}'", name),
            EngineError::AggregateArgMismatch { name, expected } => {
                write!(f, "aggregate '{}' expects {}", name, expected)
            }
            EngineError::UnknownReport(name) => write!(f, "unknown report '{}'", name),
            EngineError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
