use std::collections::HashMap;

use crate::engine::{EngineError, Frame, Value};

impl Frame {
    /// Inner equi-join. `on` pairs a left column with a right column; rows
    /// match when every pair compares equal. Rows with a null key never
    /// match. Output carries the left row's columns followed by the right
    /// row's, in left-row order then right insertion order, so a given
    /// store always joins the same way.
    pub fn inner_join(self, right: &Frame, on: &[(&str, &str)]) -> Result<Frame, EngineError> {
        let left_keys: Vec<&str> = on.iter().map(|(l, _)| *l).collect();
        let right_keys: Vec<&str> = on.iter().map(|(_, r)| *r).collect();
        self.check_columns(&left_keys)?;
        right.check_columns(&right_keys)?;

        let mut columns = self.columns().to_vec();
        for col in right.columns() {
            if columns.contains(col) {
                return Err(EngineError::DuplicateColumn(col.clone()));
            }
            columns.push(col.clone());
        }

        // Build side: key tuple -> right row indices, insertion order kept
        // inside each bucket.
        let mut index: HashMap<Vec<Value>, Vec<usize>> = HashMap::new();
        'right: for (i, row) in right.rows().iter().enumerate() {
            let mut key = Vec::with_capacity(right_keys.len());
            for k in &right_keys {
                let v = row.value(k);
                if v.is_null() {
                    continue 'right;
                }
                key.push(v);
            }
            index.entry(key).or_default().push(i);
        }

        let mut rows = Vec::new();
        'left: for lrow in self.into_rows() {
            let mut key = Vec::with_capacity(left_keys.len());
            for k in &left_keys {
                let v = lrow.value(k);
                if v.is_null() {
                    continue 'left;
                }
                key.push(v);
            }
            if let Some(matches) = index.get(&key) {
                for &ri in matches {
                    let mut out = lrow.clone();
                    for (col, val) in right.rows()[ri].iter() {
                        out.insert(col, val.clone());
                    }
                    rows.push(out);
                }
            }
        }

        Ok(Frame::from_parts(columns, rows))
    }
}
