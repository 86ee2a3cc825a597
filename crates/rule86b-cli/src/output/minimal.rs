use serde_json::Value;

use super::display_value;

/// Key answer fields, most decisive first.
const PRIORITY_KEYS: [&str; 4] = [
    "final_applicability",
    "months_applicable",
    "min_additional_cash_required",
    "required_cash_amount",
];

/// Print just the key answer value from the output, e.g. `APPLICABLE`.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return display_value(val);
                }
            }
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, display_value(val));
        }
    }
    display_value(result_obj)
}
