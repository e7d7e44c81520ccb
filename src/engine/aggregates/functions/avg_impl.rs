use crate::engine::aggregates::{Accumulator, AggregateImpl};
use crate::engine::{EngineError, Value};

pub struct AvgImpl;

impl AggregateImpl for AvgImpl {
    fn name(&self) -> &'static str { "avg" }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(AvgAcc { sum: 0.0, cnt: 0 })
    }
}

struct AvgAcc {
    sum: f64,
    cnt: i64,
}

impl Accumulator for AvgAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), EngineError> {
        let [v] = args else {
            return Err(EngineError::AggregateArgMismatch {
                name: "AVG".into(),
                expected: "AVG(expr)".into(),
            });
        };
        match v {
            Value::Null => {}
            Value::Int(i) => {
                self.sum += *i as f64;
                self.cnt += 1;
            }
            Value::Float(f) => {
                self.sum += f.into_inner();
                self.cnt += 1;
            }
            _ => return Err(EngineError::Other("AVG got non numeric arg".into())),
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        if self.cnt == 0 {
            Value::Null
        } else {
            Value::float(self.sum / (self.cnt as f64))
        }
    }
}
