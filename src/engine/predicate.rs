use std::fmt;

use crate::engine::{Row, Value};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cmp::Eq => write!(f, "="),
            Cmp::NotEq => write!(f, "<>"),
            Cmp::Lt => write!(f, "<"),
            Cmp::LtEq => write!(f, "<="),
            Cmp::Gt => write!(f, ">"),
            Cmp::GtEq => write!(f, ">="),
        }
    }
}

impl fmt::Debug for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cmp({})", self)
    }
}

/// Right-hand side of a comparison: another column or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Col(String),
    Lit(Value),
}

/// A single comparison over named row fields, used for WHERE-style filters
/// and HAVING. SQL null semantics: a comparison touching null is never
/// satisfied. Conjunction is expressed by chaining `filter` calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub left: String,
    pub op: Cmp,
    pub right: Operand,
}

impl Predicate {
    /// `column <op> literal`
    pub fn col_lit(left: impl Into<String>, op: Cmp, lit: Value) -> Predicate {
        Predicate { left: left.into(), op, right: Operand::Lit(lit) }
    }

    /// `column <op> column`
    pub fn col_col(left: impl Into<String>, op: Cmp, right: impl Into<String>) -> Predicate {
        Predicate { left: left.into(), op, right: Operand::Col(right.into()) }
    }

    /// Columns this predicate reads, for ahead-of-evaluation validation.
    pub fn columns(&self) -> Vec<&str> {
        match &self.right {
            Operand::Col(c) => vec![self.left.as_str(), c.as_str()],
            Operand::Lit(_) => vec![self.left.as_str()],
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        let left = row.value(&self.left);
        let right = match &self.right {
            Operand::Col(c) => row.value(c),
            Operand::Lit(v) => v.clone(),
        };
        Self::cmp_values(&left, self.op, &right)
    }

    fn cmp_values(l: &Value, op: Cmp, r: &Value) -> bool {
        use std::cmp::Ordering::*;
        if l.is_null() || r.is_null() {
            return false; // unknown, never satisfied
        }
        // numeric kinds compare numerically; otherwise same-type only
        let ord = match (l, r) {
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                let x = l.as_f64().unwrap_or(0.0);
                let y = r.as_f64().unwrap_or(0.0);
                match x.partial_cmp(&y) {
                    Some(o) => o,
                    None => return false,
                }
            }
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            _ => return matches!(op, Cmp::NotEq), // mismatched types only differ
        };
        match op {
            Cmp::Eq => ord == Equal,
            Cmp::NotEq => ord != Equal,
            Cmp::Lt => ord == Less,
            Cmp::LtEq => ord != Greater,
            Cmp::Gt => ord == Greater,
            Cmp::GtEq => ord != Less,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(pairs: &[(&str, Value)]) -> Row {
        Row::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())))
    }

    #[test]
    fn col_lit_compares_numerically_across_kinds() {
        let r = row(&[("qty", Value::int(3))]);
        assert!(Predicate::col_lit("qty", Cmp::Gt, Value::float(2.5)).matches(&r));
        assert!(Predicate::col_lit("qty", Cmp::Eq, Value::float(3.0)).matches(&r));
        assert!(!Predicate::col_lit("qty", Cmp::Lt, Value::int(3)).matches(&r));
    }

    #[test]
    fn null_never_satisfies() {
        let r = row(&[("profit", Value::Null)]);
        for op in [Cmp::Eq, Cmp::NotEq, Cmp::Lt, Cmp::LtEq, Cmp::Gt, Cmp::GtEq] {
            assert!(!Predicate::col_lit("profit", op, Value::float(0.0)).matches(&r));
        }
    }

    #[test]
    fn col_col_compares_two_fields() {
        let r = row(&[("discount", Value::float(5.0)), ("gross", Value::float(20.0))]);
        assert!(Predicate::col_col("discount", Cmp::Lt, "gross").matches(&r));
        assert!(!Predicate::col_col("gross", Cmp::Lt, "discount").matches(&r));
    }

    #[test]
    fn dates_and_strings_compare_within_kind() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let r = row(&[("month", Value::date(feb)), ("channel", Value::str("web"))]);
        assert!(Predicate::col_lit("month", Cmp::Gt, Value::date(jan)).matches(&r));
        assert!(Predicate::col_lit("channel", Cmp::Eq, Value::str("web")).matches(&r));
        // mismatched kinds: equal is false, not-equal is true
        assert!(!Predicate::col_lit("channel", Cmp::Eq, Value::int(1)).matches(&r));
        assert!(Predicate::col_lit("channel", Cmp::NotEq, Value::int(1)).matches(&r));
    }
}
