use crate::engine::aggregates::{Accumulator, AggregateImpl};
use crate::engine::{EngineError, Value};

pub struct MinImpl;
pub struct MaxImpl;

impl AggregateImpl for MinImpl {
    fn name(&self) -> &'static str { "min" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(ExtremaAcc::new_min()) }
}

impl AggregateImpl for MaxImpl {
    fn name(&self) -> &'static str { "max" }
    fn create_accumulator(&self) -> Box<dyn Accumulator> { Box::new(ExtremaAcc::new_max()) }
}

enum Mode {
    Min,
    Max,
}

struct ExtremaAcc {
    mode: Mode,
    current: Option<Value>,
}

impl ExtremaAcc {
    fn new_min() -> Self { Self { mode: Mode::Min, current: None } }
    fn new_max() -> Self { Self { mode: Mode::Max, current: None } }

    /// Whether `b` should replace `a` under `mode`. Strict about types:
    /// columns are homogeneous once ingested, so a mix is a definition bug.
    fn better(mode: &Mode, a: &Value, b: &Value) -> Result<bool, EngineError> {
        use Value::*;
        let ord = match (a, b) {
            (Null, _) | (_, Null) => return Ok(false), // nulls skipped by caller
            (Int(x), Int(y)) => x.cmp(y),
            (Float(x), Float(y)) => x.cmp(y),
            (Str(x), Str(y)) => x.cmp(y),
            (Date(x), Date(y)) => x.cmp(y),
            _ => return Err(EngineError::Other("MIN/MAX mixed types".into())),
        };
        Ok(match mode {
            Mode::Min => ord.is_gt(),
            Mode::Max => ord.is_lt(),
        })
    }
}

impl Accumulator for ExtremaAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), EngineError> {
        let [v] = args else {
            return Err(EngineError::AggregateArgMismatch {
                name: "MIN/MAX".into(),
                expected: "MIN/MAX(expr)".into(),
            });
        };
        if v.is_null() {
            return Ok(());
        }
        match &mut self.current {
            None => self.current = Some(v.clone()),
            Some(cur) => {
                if Self::better(&self.mode, cur, v)? {
                    *cur = v.clone();
                }
            }
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        self.current.clone().unwrap_or(Value::Null)
    }
}
