use std::{collections::HashMap, sync::Arc};

use once_cell::sync::Lazy;

use crate::engine::aggregates::{AggregateImpl, AvgImpl, CountImpl, MaxImpl, MinImpl, SumImpl};

static GLOBAL: Lazy<AggregateRegistry> = Lazy::new(AggregateRegistry::default_aggregate_registry);

/// Case-insensitive registry of aggregates.
#[derive(Default)]
pub struct AggregateRegistry {
    by_name: HashMap<String, Arc<dyn AggregateImpl>>,
}

impl AggregateRegistry {
    pub fn new() -> Self {
        Self { by_name: HashMap::new() }
    }

    /// The registry the evaluator resolves against.
    pub fn global() -> &'static AggregateRegistry {
        &GLOBAL
    }

    pub fn register<I: AggregateImpl + 'static>(&mut self, impl_: I) {
        self.by_name.insert(impl_.name().to_string(), Arc::new(impl_));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AggregateImpl>> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn default_aggregate_registry() -> Self {
        let mut registry = Self::new();
        registry.register(CountImpl);
        registry.register(SumImpl);
        registry.register(AvgImpl);
        registry.register(MinImpl);
        registry.register(MaxImpl);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Value;

    #[test]
    fn registry_contains_all_and_lookup_is_case_insensitive() {
        let r = AggregateRegistry::default_aggregate_registry();
        assert_eq!(r.list(), vec!["avg", "count", "max", "min", "sum"]);

        // case-insensitive
        assert!(r.get("COUNT").is_some());
        assert!(r.get("sUm").is_some());
        assert!(r.get("Avg").is_some());
        assert!(r.get("median").is_none());
    }

    #[test]
    fn accumulators_basic_semantics() {
        let r = AggregateRegistry::global();

        // COUNT: *, NULL, non-null
        let mut acc_c = r.get("count").unwrap().create_accumulator();
        acc_c.update(&[]).unwrap(); // *
        acc_c.update(&[Value::Null]).unwrap(); // count(expr) with NULL
        acc_c.update(&[Value::int(1)]).unwrap(); // count(expr) with non-null
        assert_eq!(acc_c.finalize(), Value::int(2));

        // SUM int: nulls ignored
        let mut acc_s = r.get("sum").unwrap().create_accumulator();
        acc_s.update(&[Value::Null]).unwrap();
        acc_s.update(&[Value::int(2)]).unwrap();
        acc_s.update(&[Value::int(3)]).unwrap();
        assert_eq!(acc_s.finalize(), Value::int(5));

        // AVG float
        let mut acc_a = r.get("avg").unwrap().create_accumulator();
        acc_a.update(&[Value::float(1.5)]).unwrap();
        acc_a.update(&[Value::Null]).unwrap();
        acc_a.update(&[Value::float(2.5)]).unwrap();
        assert_eq!(acc_a.finalize(), Value::float(2.0));

        // MIN / MAX string
        let mut acc_min = r.get("min").unwrap().create_accumulator();
        for s in ["pear", "apple", "plum"] {
            acc_min.update(&[Value::str(s)]).unwrap();
        }
        assert_eq!(acc_min.finalize(), Value::str("apple"));

        let mut acc_max = r.get("max").unwrap().create_accumulator();
        for s in ["pear", "apple", "plum"] {
            acc_max.update(&[Value::str(s)]).unwrap();
        }
        assert_eq!(acc_max.finalize(), Value::str("plum"));
    }

    // ---- SUM ----

    #[test]
    fn sum_int_and_float_and_nulls() {
        let mut a = SumImpl.create_accumulator();
        a.update(&[Value::Null]).unwrap();
        a.update(&[Value::int(2)]).unwrap();
        a.update(&[Value::int(3)]).unwrap();
        assert_eq!(a.finalize(), Value::int(5));

        let mut b = SumImpl.create_accumulator();
        b.update(&[Value::float(1.5)]).unwrap();
        b.update(&[Value::float(2.25)]).unwrap();
        assert_eq!(b.finalize(), Value::float(3.75));
    }

    #[test]
    fn sum_over_only_nulls_is_null() {
        let mut a = SumImpl.create_accumulator();
        a.update(&[Value::Null]).unwrap();
        a.update(&[Value::Null]).unwrap();
        assert_eq!(a.finalize(), Value::Null);
    }

    #[test]
    fn sum_mix_float_into_int_errors_strict() {
        let mut s = SumImpl.create_accumulator();
        s.update(&[Value::int(1)]).unwrap();
        let err = s.update(&[Value::float(1.0)]).unwrap_err();
        let msg = format!("{err}").to_lowercase();
        assert!(msg.contains("sum received float"));
    }

    #[test]
    fn sum_past_i64_range_is_null() {
        let mut a = SumImpl.create_accumulator();
        a.update(&[Value::int(i64::MAX)]).unwrap();
        a.update(&[Value::int(1)]).unwrap();
        assert_eq!(a.finalize(), Value::Null);
    }

    // ---- AVG ----

    #[test]
    fn avg_ignores_null_and_returns_float() {
        let mut a = AvgImpl.create_accumulator();
        a.update(&[Value::Null]).unwrap();
        a.update(&[Value::int(2)]).unwrap();
        a.update(&[Value::int(3)]).unwrap();
        // (2 + 3) / 2 = 2.5
        assert_eq!(a.finalize(), Value::float(2.5));
    }

    #[test]
    fn avg_over_only_nulls_is_null() {
        let mut a = AvgImpl.create_accumulator();
        a.update(&[Value::Null]).unwrap();
        assert_eq!(a.finalize(), Value::Null);
    }

    // ---- MIN / MAX ----

    #[test]
    fn min_max_numeric_and_date() {
        let mut min_i = MinImpl.create_accumulator();
        for v in [Value::int(5), Value::int(2), Value::int(9)] {
            min_i.update(&[v]).unwrap();
        }
        assert_eq!(min_i.finalize(), Value::int(2));

        let mut max_d = MaxImpl.create_accumulator();
        for d in ["2024-03-01", "2024-01-15", "2024-02-20"] {
            let date = d.parse().unwrap();
            max_d.update(&[Value::Date(date)]).unwrap();
        }
        assert_eq!(max_d.finalize(), Value::Date("2024-03-01".parse().unwrap()));
    }

    #[test]
    fn min_max_empty_group_is_null() {
        assert_eq!(MinImpl.create_accumulator().finalize(), Value::Null);
        assert_eq!(MaxImpl.create_accumulator().finalize(), Value::Null);
    }
}
