use std::collections::HashSet;

use indexmap::IndexMap;

use crate::engine::aggregates::{Accumulator, AggregateRegistry};
use crate::engine::{EngineError, Frame, Predicate, Row, Value};

/// One aggregate call inside a `group_by`: function, input column (None for
/// COUNT(*)), DISTINCT flag, and the output column name.
#[derive(Debug, Clone, PartialEq)]
pub struct AggCall {
    pub func: String,
    pub arg: Option<String>,
    pub distinct: bool,
    pub output: String,
}

impl AggCall {
    fn call(func: &str, arg: Option<&str>, distinct: bool, output: &str) -> AggCall {
        AggCall {
            func: func.to_string(),
            arg: arg.map(str::to_string),
            distinct,
            output: output.to_string(),
        }
    }

    pub fn count_star(output: &str) -> AggCall {
        Self::call("count", None, false, output)
    }

    pub fn count(column: &str, output: &str) -> AggCall {
        Self::call("count", Some(column), false, output)
    }

    pub fn count_distinct(column: &str, output: &str) -> AggCall {
        Self::call("count", Some(column), true, output)
    }

    pub fn sum(column: &str, output: &str) -> AggCall {
        Self::call("sum", Some(column), false, output)
    }

    pub fn avg(column: &str, output: &str) -> AggCall {
        Self::call("avg", Some(column), false, output)
    }

    pub fn min(column: &str, output: &str) -> AggCall {
        Self::call("min", Some(column), false, output)
    }

    pub fn max(column: &str, output: &str) -> AggCall {
        Self::call("max", Some(column), false, output)
    }
}

struct GroupState {
    key: Vec<Value>,
    accs: Vec<Box<dyn Accumulator>>,
    // one value set per DISTINCT call, None otherwise
    seen: Vec<Option<HashSet<Value>>>,
}

impl Frame {
    /// Group rows by the key columns and fold each aggregate call over the
    /// group. Output rows carry the key columns (same names) followed by one
    /// column per call, groups in first-seen row order. An empty input
    /// produces zero groups.
    pub fn group_by(self, keys: &[&str], calls: &[AggCall]) -> Result<Frame, EngineError> {
        self.check_columns(keys)?;
        let registry = AggregateRegistry::global();

        let mut impls = Vec::with_capacity(calls.len());
        let mut out_cols: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        for call in calls {
            let imp = registry
                .get(&call.func)
                .ok_or_else(|| EngineError::UnknownAggregate(call.func.clone()))?;
            match &call.arg {
                Some(col) => self.check_columns(&[col.as_str()])?,
                None => {
                    if call.distinct || !call.func.eq_ignore_ascii_case("count") {
                        return Err(EngineError::AggregateArgMismatch {
                            name: call.func.clone(),
                            expected: format!("{}(column)", call.func.to_ascii_uppercase()),
                        });
                    }
                }
            }
            if out_cols.iter().any(|c| c == &call.output) {
                return Err(EngineError::DuplicateColumn(call.output.clone()));
            }
            out_cols.push(call.output.clone());
            impls.push(imp);
        }

        let mut groups: IndexMap<Vec<Value>, GroupState> = IndexMap::new();
        for row in self.rows() {
            let key: Vec<Value> = keys.iter().map(|k| row.value(k)).collect();

            let entry = groups.entry(key.clone()).or_insert_with(|| GroupState {
                key,
                accs: impls.iter().map(|imp| imp.create_accumulator()).collect(),
                seen: calls
                    .iter()
                    .map(|c| if c.distinct { Some(HashSet::new()) } else { None })
                    .collect(),
            });

            for (i, call) in calls.iter().enumerate() {
                // COUNT(*): empty slice, counted unconditionally.
                let args: Vec<Value> = match &call.arg {
                    None => vec![],
                    Some(col) => vec![row.value(col)],
                };
                if let Some(set) = &mut entry.seen[i] {
                    if !set.insert(args[0].clone()) {
                        continue;
                    }
                }
                entry.accs[i].update(&args)?;
            }
        }

        let rows = groups
            .into_values()
            .map(|state| {
                let mut row = Row::new();
                for (name, v) in keys.iter().copied().zip(state.key) {
                    row.insert(name, v);
                }
                for (call, acc) in calls.iter().zip(state.accs.iter()) {
                    row.insert(&call.output, acc.finalize());
                }
                row
            })
            .collect();

        Ok(Frame::from_parts(out_cols, rows))
    }

    /// Post-aggregation filter over the grouped frame.
    pub fn having(self, pred: &Predicate) -> Result<Frame, EngineError> {
        self.filter(pred)
    }
}
