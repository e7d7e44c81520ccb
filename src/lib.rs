pub mod engine;
pub use engine::{AggCall, Cmp, EngineError, Frame, Predicate, Row, SortKey, Value, WindowSpec};

pub mod store;
pub use store::{IngestConfig, LoadOutcome, RecordStore, StagingBatch};

pub mod reports;
pub use reports::{Report, ReportRegistry};
