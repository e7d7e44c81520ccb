use crate::engine::aggregates::{Accumulator, AggregateImpl};
use crate::engine::{EngineError, Value};

pub struct SumImpl;

impl AggregateImpl for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(SumAcc::Empty)
    }
}

// Track the concrete numeric kind seen first.
enum SumAcc {
    Empty,
    Int(i128),
    Float(f64),
}

impl Accumulator for SumAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), EngineError> {
        let [v] = args else {
            return Err(EngineError::AggregateArgMismatch {
                name: "SUM".into(),
                expected: "SUM(expr)".into(),
            });
        };
        match (&mut *self, v) {
            (_, Value::Null) => {}
            (SumAcc::Empty, Value::Int(i)) => *self = SumAcc::Int(*i as i128),
            (SumAcc::Empty, Value::Float(f)) => *self = SumAcc::Float(f.into_inner()),
            (SumAcc::Int(acc), Value::Int(i)) => *acc += *i as i128,
            (SumAcc::Int(_), Value::Float(_)) => {
                return Err(EngineError::Other(
                    "SUM received float for INT aggregation".into(),
                ));
            }
            (SumAcc::Float(acc), Value::Int(i)) => *acc += *i as f64,
            (SumAcc::Float(acc), Value::Float(f)) => *acc += f.into_inner(),
            (_, other) => {
                return Err(EngineError::Other(format!("SUM got non numeric arg: {:?}", other)));
            }
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        match self {
            SumAcc::Empty => Value::Null, // SQL SUM over all NULLs -> NULL
            // totals outside i64 range -> NULL
            SumAcc::Int(i) => i64::try_from(*i).map(Value::Int).unwrap_or(Value::Null),
            SumAcc::Float(f) => Value::float(*f),
        }
    }
}
