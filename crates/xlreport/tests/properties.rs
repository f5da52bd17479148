use proptest::prelude::*;
use serde_json::{json, Value};
use xlreport::conditional::clean_numeric_formulae;
use xlreport::ReportConfig;

/// Values `clean_numeric_formulae` must always drop
fn junk_entry() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[g-z]{1,6}".prop_map(Value::String),
        " {0,3}".prop_map(Value::String),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        Just(json!(["1"])),
    ]
}

/// A finite number, optionally rendered as text, with optional junk before it
fn numeric_entry() -> impl Strategy<Value = (f64, bool, Option<Value>)> {
    (-1.0e9f64..1.0e9, any::<bool>(), prop::option::of(junk_entry()))
}

proptest! {
    #[test]
    fn column_width_is_clamped(len in 0usize..10_000) {
        let config = ReportConfig::default();
        let width = config.column_width(len);
        prop_assert!(width <= config.max_column_width);
        prop_assert!(width >= config.column_padding.min(config.max_column_width));
        if (len as f64) + config.column_padding <= config.max_column_width {
            prop_assert_eq!(width, len as f64 + config.column_padding);
        } else {
            prop_assert_eq!(width, config.max_column_width);
        }
    }

    #[test]
    fn column_width_is_monotonic(a in 0usize..200, b in 0usize..200) {
        let config = ReportConfig::default();
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(config.column_width(short) <= config.column_width(long));
    }

    #[test]
    fn numbers_survive_cleaning_in_order(entries in prop::collection::vec(numeric_entry(), 0..8)) {
        let mut formulae = Vec::new();
        let mut numbers = Vec::new();
        for (n, as_text, junk) in entries {
            formulae.extend(junk);
            formulae.push(if as_text { json!(n.to_string()) } else { json!(n) });
            numbers.push(n);
        }
        prop_assert_eq!(clean_numeric_formulae(&formulae), numbers);
    }

    #[test]
    fn junk_alone_leaves_nothing(entries in prop::collection::vec(junk_entry(), 0..8)) {
        prop_assert!(clean_numeric_formulae(&entries).is_empty());
    }
}

#[test]
fn text_that_spells_special_floats_is_dropped() {
    let entries = [json!("NaN"), json!("inf"), json!("-infinity"), json!("7")];
    assert_eq!(clean_numeric_formulae(&entries), vec![7.0]);
}
