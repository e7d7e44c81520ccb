use crate::engine::{EngineError, Value};

/// The per-group state.
/// The evaluator will:
///   1) fetch the call's argument per row as a `Value`
///   2) call `update(&mut self, &args)` (empty slice for COUNT(*))
///   3) after all rows in the group, call `finalize()`
///
/// DISTINCT is handled by the evaluator (wrapping the accumulator with a
/// value set) so `update` can just implement the non-distinct semantics.
pub trait Accumulator: Send {
    /// Update the running state with this row's argument.
    fn update(&mut self, args: &[Value]) -> Result<(), EngineError>;

    /// Produce the final result.
    fn finalize(&self) -> Value;
}
