use indexmap::IndexMap;

use crate::engine::aggregates::{AggregateImpl, AvgImpl, SumImpl};
use crate::engine::{EngineError, Frame, Row, SortKey, Value};

/// Window function applied per partition, in `order_by` order.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowFunc {
    /// 1-based position.
    RowNumber,
    /// Competition ranking: ties share a rank, the next distinct value
    /// skips past them.
    Rank,
    /// `(rank - 1) / (rows - 1)`, 0.0 for a single-row partition.
    PercentRank,
    /// The named column from the previous row, null at partition start.
    Lag { of: String },
    /// Running sum of the named column up to and including the current row.
    CumSum { of: String },
    /// Average of the named column over the current row and up to
    /// `preceding` prior rows; shorter near the partition start.
    MovingAvg { of: String, preceding: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub partition_by: Vec<String>,
    pub order_by: Vec<SortKey>,
    pub func: WindowFunc,
    pub output: String,
}

impl WindowSpec {
    fn spec(partition: &[&str], order: &[SortKey], func: WindowFunc, output: &str) -> WindowSpec {
        WindowSpec {
            partition_by: partition.iter().map(|c| c.to_string()).collect(),
            order_by: order.to_vec(),
            func,
            output: output.to_string(),
        }
    }

    pub fn row_number(partition: &[&str], order: &[SortKey], output: &str) -> WindowSpec {
        Self::spec(partition, order, WindowFunc::RowNumber, output)
    }

    pub fn rank(partition: &[&str], order: &[SortKey], output: &str) -> WindowSpec {
        Self::spec(partition, order, WindowFunc::Rank, output)
    }

    pub fn percent_rank(partition: &[&str], order: &[SortKey], output: &str) -> WindowSpec {
        Self::spec(partition, order, WindowFunc::PercentRank, output)
    }

    pub fn lag(partition: &[&str], order: &[SortKey], of: &str, output: &str) -> WindowSpec {
        Self::spec(partition, order, WindowFunc::Lag { of: of.to_string() }, output)
    }

    pub fn cum_sum(partition: &[&str], order: &[SortKey], of: &str, output: &str) -> WindowSpec {
        Self::spec(partition, order, WindowFunc::CumSum { of: of.to_string() }, output)
    }

    pub fn moving_avg(
        partition: &[&str],
        order: &[SortKey],
        of: &str,
        preceding: usize,
        output: &str,
    ) -> WindowSpec {
        Self::spec(partition, order, WindowFunc::MovingAvg { of: of.to_string(), preceding }, output)
    }

    fn input_column(&self) -> Option<&str> {
        match &self.func {
            WindowFunc::Lag { of }
            | WindowFunc::CumSum { of }
            | WindowFunc::MovingAvg { of, .. } => Some(of),
            _ => None,
        }
    }
}

impl Frame {
    /// Append the window function's value as a new column. Output rows come
    /// out partition by partition (partitions in first-seen order), each
    /// partition sorted by the window's `order_by`.
    pub fn window(self, spec: &WindowSpec) -> Result<Frame, EngineError> {
        let mut needed: Vec<&str> = spec.partition_by.iter().map(String::as_str).collect();
        needed.extend(spec.order_by.iter().map(|k| k.column.as_str()));
        needed.extend(spec.input_column());
        self.check_columns(&needed)?;
        if self.columns().iter().any(|c| c == &spec.output) {
            return Err(EngineError::DuplicateColumn(spec.output.clone()));
        }

        let mut columns = self.columns().to_vec();
        columns.push(spec.output.clone());

        let mut partitions: IndexMap<Vec<Value>, Vec<Row>> = IndexMap::new();
        for row in self.into_rows() {
            let key: Vec<Value> =
                spec.partition_by.iter().map(|c| row.value(c)).collect();
            partitions.entry(key).or_default().push(row);
        }

        let mut out = Vec::new();
        for (_, mut rows) in partitions {
            rows.sort_by(|a, b| {
                for k in &spec.order_by {
                    let ord =
                        Value::cmp_for_sort(&a.value(&k.column), &b.value(&k.column), k.ascending);
                    if !ord.is_eq() {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
            let values = eval_partition(&rows, spec)?;
            for (mut row, v) in rows.into_iter().zip(values) {
                row.insert(&spec.output, v);
                out.push(row);
            }
        }

        Ok(Frame::from_parts(columns, out))
    }
}

fn order_key(row: &Row, order_by: &[SortKey]) -> Vec<Value> {
    order_by.iter().map(|k| row.value(&k.column)).collect()
}

fn eval_partition(rows: &[Row], spec: &WindowSpec) -> Result<Vec<Value>, EngineError> {
    let n = rows.len();
    let mut out = Vec::with_capacity(n);
    match &spec.func {
        WindowFunc::RowNumber => {
            for i in 0..n {
                out.push(Value::int(i as i64 + 1));
            }
        }
        WindowFunc::Rank | WindowFunc::PercentRank => {
            let mut rank = 1i64;
            let mut prev: Option<Vec<Value>> = None;
            for (i, row) in rows.iter().enumerate() {
                let key = order_key(row, &spec.order_by);
                if prev.as_ref() != Some(&key) {
                    rank = i as i64 + 1;
                }
                prev = Some(key);
                match spec.func {
                    WindowFunc::Rank => out.push(Value::int(rank)),
                    _ => {
                        // PERCENT_RANK; single-row partitions pin to 0.0
                        let pr = if n == 1 {
                            0.0
                        } else {
                            (rank - 1) as f64 / (n - 1) as f64
                        };
                        out.push(Value::float(pr));
                    }
                }
            }
        }
        WindowFunc::Lag { of } => {
            for i in 0..n {
                if i == 0 {
                    out.push(Value::Null);
                } else {
                    out.push(rows[i - 1].value(of));
                }
            }
        }
        WindowFunc::CumSum { of } => {
            let mut acc = SumImpl.create_accumulator();
            for row in rows {
                acc.update(&[row.value(of)])?;
                out.push(acc.finalize());
            }
        }
        WindowFunc::MovingAvg { of, preceding } => {
            for i in 0..n {
                let start = i.saturating_sub(*preceding);
                let mut acc = AvgImpl.create_accumulator();
                for row in &rows[start..=i] {
                    acc.update(&[row.value(of)])?;
                }
                out.push(acc.finalize());
            }
        }
    }
    Ok(out)
}
