use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use ordered_float::NotNan;

/// A single cell value flowing through the engine.
///
/// Floats are wrapped in `NotNan` so `Value` is `Eq + Hash + Ord` and value
/// tuples can key group and join maps directly. `float()` maps NaN to
/// `Null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Null,
    Int(i64),
    Float(NotNan<f64>),
    Str(String),
    Date(NaiveDate),
}

impl Value {
    pub fn int(i: i64) -> Value {
        Value::Int(i)
    }

    pub fn float(f: f64) -> Value {
        NotNan::new(f).map(Value::Float).unwrap_or(Value::Null)
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn date(d: NaiveDate) -> Value {
        Value::Date(d)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: ints widen to f64, everything non-numeric is None.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.into_inner()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// `num / den` with the null-on-zero-denominator contract: any ratio with
    /// a null or zero denominator (or a non-numeric operand) is `Null`,
    /// never a fault.
    pub fn ratio(num: &Value, den: &Value) -> Value {
        match (num.as_f64(), den.as_f64()) {
            (Some(n), Some(d)) if d != 0.0 => Value::float(n / d),
            _ => Value::Null,
        }
    }

    /// Sort comparator with NULLS LAST in both directions and numeric
    /// cross-kind comparison (Int vs Float compares numerically).
    pub fn cmp_for_sort(a: &Value, b: &Value, ascending: bool) -> Ordering {
        use Ordering::*;
        use Value::*;
        match (a, b) {
            (Null, Null) => Equal,
            (Null, _) => Greater, // null after non-null
            (_, Null) => Less,
            (Int(x), Int(y)) => Self::directed(x.cmp(y), ascending),
            (Int(_), Float(_)) | (Float(_), Int(_)) | (Float(_), Float(_)) => {
                let x = a.as_f64().unwrap_or(0.0);
                let y = b.as_f64().unwrap_or(0.0);
                Self::directed(x.partial_cmp(&y).unwrap_or(Equal), ascending)
            }
            (Str(x), Str(y)) => Self::directed(x.cmp(y), ascending),
            (Date(x), Date(y)) => Self::directed(x.cmp(y), ascending),
            // cross-type fallback: compare type tags to keep a total order
            (lhs, rhs) => Self::directed(Self::type_rank(lhs).cmp(&Self::type_rank(rhs)), ascending),
        }
    }

    fn directed(ord: Ordering, ascending: bool) -> Ordering {
        if ascending { ord } else { ord.reverse() }
    }

    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Int(_) | Value::Float(_) => 1,
            Value::Str(_) => 2,
            Value::Date(_) => 3,
        }
    }

    /// Render for the external driver boundary. Dates become ISO strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(f.into_inner())
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x.into_inner()),
            Value::Str(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    // ---------- constructors & accessors ----------

    #[test]
    fn float_constructor_maps_nan_to_null() {
        assert_eq!(Value::float(f64::NAN), Value::Null);
        assert_eq!(Value::float(1.5), Value::Float(NotNan::new(1.5).unwrap()));
    }

    #[test]
    fn numeric_view_widens_ints() {
        assert_eq!(Value::int(3).as_f64(), Some(3.0));
        assert_eq!(Value::float(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::str("x").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
    }

    // ---------- ratio ----------

    #[test]
    fn ratio_divides_numerics() {
        assert_eq!(Value::ratio(&Value::float(9.0), &Value::int(3)), Value::float(3.0));
    }

    #[test]
    fn ratio_is_null_on_zero_or_null_denominator() {
        assert_eq!(Value::ratio(&Value::float(1.0), &Value::float(0.0)), Value::Null);
        assert_eq!(Value::ratio(&Value::float(1.0), &Value::Null), Value::Null);
        assert_eq!(Value::ratio(&Value::Null, &Value::float(2.0)), Value::Null);
        assert_eq!(Value::ratio(&Value::str("a"), &Value::float(2.0)), Value::Null);
    }

    // ---------- sort comparator ----------

    #[test]
    fn sort_nulls_last_in_both_directions() {
        let n = Value::Null;
        let z = Value::int(0);
        assert_eq!(Value::cmp_for_sort(&z, &n, true), Less);
        assert_eq!(Value::cmp_for_sort(&n, &z, true), Greater);
        assert_eq!(Value::cmp_for_sort(&z, &n, false), Less);
        assert_eq!(Value::cmp_for_sort(&n, &z, false), Greater);
        assert_eq!(Value::cmp_for_sort(&n, &n, true), Equal);
    }

    #[test]
    fn sort_compares_int_and_float_numerically() {
        assert_eq!(Value::cmp_for_sort(&Value::int(2), &Value::float(2.5), true), Less);
        assert_eq!(Value::cmp_for_sort(&Value::float(3.5), &Value::int(3), true), Greater);
        assert_eq!(Value::cmp_for_sort(&Value::int(2), &Value::float(2.0), true), Equal);
    }

    #[test]
    fn sort_respects_direction_for_strings_and_dates() {
        let a = Value::str("Alice");
        let b = Value::str("Bob");
        assert_eq!(Value::cmp_for_sort(&a, &b, true), Less);
        assert_eq!(Value::cmp_for_sort(&a, &b, false), Greater);

        let jan = Value::date(d(2024, 1, 31));
        let feb = Value::date(d(2024, 2, 1));
        assert_eq!(Value::cmp_for_sort(&jan, &feb, true), Less);
        assert_eq!(Value::cmp_for_sort(&jan, &feb, false), Greater);
    }

    // ---------- json boundary ----------

    #[test]
    fn to_json_renders_dates_as_iso_strings() {
        assert_eq!(Value::date(d(2024, 3, 1)).to_json(), serde_json::json!("2024-03-01"));
        assert_eq!(Value::int(7).to_json(), serde_json::json!(7));
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn value_tuples_are_usable_as_map_keys() {
        use std::collections::HashMap;
        let mut m: HashMap<Vec<Value>, i32> = HashMap::new();
        m.insert(vec![Value::str("DE"), Value::date(d(2024, 1, 1))], 1);
        assert_eq!(m.get(&vec![Value::str("DE"), Value::date(d(2024, 1, 1))]), Some(&1));
        assert_eq!(m.get(&vec![Value::str("FR"), Value::date(d(2024, 1, 1))]), None);
    }
}
