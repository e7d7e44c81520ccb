use crate::engine::{EngineError, Predicate, Row, Value};

/// Sort key for an output ordering or a window ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub column: String,
    pub ascending: bool,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> SortKey {
        SortKey { column: column.into(), ascending: true }
    }

    pub fn desc(column: impl Into<String>) -> SortKey {
        SortKey { column: column.into(), ascending: false }
    }
}

/// A bag of rows with a known column set.
///
/// Every evaluator operation validates the column names it was given against
/// `columns` before touching any row, so a misdefined report fails loudly
/// even on an empty input. Scans qualify columns as `table.column`, which
/// keeps N-way joins collision-free; the final `select` renames to the
/// report's output columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Frame {
    /// Build a frame from a typed scan: `columns` are unqualified names,
    /// each row is one `Value` per column. Keys become `table.column`.
    pub fn scan(table: &str, columns: &[&str], rows: impl IntoIterator<Item = Vec<Value>>) -> Frame {
        let qualified: Vec<String> =
            columns.iter().map(|c| format!("{}.{}", table, c)).collect();
        let rows = rows
            .into_iter()
            .map(|vals| {
                qualified
                    .iter()
                    .cloned()
                    .zip(vals)
                    .collect::<Row>()
            })
            .collect();
        Frame { columns: qualified, rows }
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Frame {
        Frame { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Definition-time check: every name must be a known column.
    pub(crate) fn check_columns(&self, names: &[&str]) -> Result<(), EngineError> {
        for name in names {
            if !self.columns.iter().any(|c| c == name) {
                return Err(EngineError::UnknownColumn {
                    name: (*name).to_string(),
                    candidates: self.columns.clone(),
                });
            }
        }
        Ok(())
    }

    /// Keep rows satisfying the predicate. Rows where the comparison touches
    /// null drop out, mirroring SQL WHERE.
    pub fn filter(mut self, pred: &Predicate) -> Result<Frame, EngineError> {
        self.check_columns(&pred.columns())?;
        self.rows.retain(|r| pred.matches(r));
        Ok(self)
    }

    /// Stable sort by the given keys, NULLS LAST in either direction.
    pub fn sort_by(mut self, keys: &[SortKey]) -> Result<Frame, EngineError> {
        let names: Vec<&str> = keys.iter().map(|k| k.column.as_str()).collect();
        self.check_columns(&names)?;
        self.rows.sort_by(|a, b| {
            for k in keys {
                let ord = Value::cmp_for_sort(&a.value(&k.column), &b.value(&k.column), k.ascending);
                if !ord.is_eq() {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
        Ok(self)
    }

    /// First `n` rows.
    pub fn take(mut self, n: usize) -> Frame {
        self.rows.truncate(n);
        self
    }

    /// Projection with rename: `(source, alias)` pairs, in output order.
    pub fn select(self, cols: &[(&str, &str)]) -> Result<Frame, EngineError> {
        let sources: Vec<&str> = cols.iter().map(|(s, _)| *s).collect();
        self.check_columns(&sources)?;
        let mut out_cols: Vec<String> = Vec::with_capacity(cols.len());
        for (_, alias) in cols {
            if out_cols.iter().any(|c| c == alias) {
                return Err(EngineError::DuplicateColumn((*alias).to_string()));
            }
            out_cols.push((*alias).to_string());
        }
        let rows = self
            .rows
            .into_iter()
            .map(|r| {
                cols.iter()
                    .map(|(src, alias)| (alias.to_string(), r.value(src)))
                    .collect::<Row>()
            })
            .collect();
        Ok(Frame { columns: out_cols, rows })
    }

    /// Append a derived column computed per row. Derived metrics (net
    /// revenue, profit, ratios) are built this way once and reused.
    pub fn with_column(
        mut self,
        name: &str,
        f: impl Fn(&Row) -> Value,
    ) -> Result<Frame, EngineError> {
        if self.columns.iter().any(|c| c == name) {
            return Err(EngineError::DuplicateColumn(name.to_string()));
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            let v = f(row);
            row.insert(name, v);
        }
        Ok(self)
    }

    /// Render all rows for the external driver boundary.
    pub fn to_json(&self) -> Vec<serde_json::Value> {
        self.rows.iter().map(Row::to_json).collect()
    }
}
