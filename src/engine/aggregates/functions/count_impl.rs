use crate::engine::aggregates::{Accumulator, AggregateImpl};
use crate::engine::{EngineError, Value};

pub struct CountImpl;

impl AggregateImpl for CountImpl {
    fn name(&self) -> &'static str { "count" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountAcc { cnt: 0 })
    }
}

struct CountAcc {
    cnt: i64,
}

impl Accumulator for CountAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), EngineError> {
        match args {
            // COUNT(*): the evaluator passes an empty slice.
            [] => self.cnt += 1,
            // COUNT(expr): increment if expr != NULL
            [v] => {
                if !v.is_null() {
                    self.cnt += 1;
                }
            }
            _ => {
                return Err(EngineError::AggregateArgMismatch {
                    name: "COUNT".into(),
                    expected: "COUNT(*|expr)".into(),
                })
            }
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        Value::Int(self.cnt)
    }
}
