use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_value;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value.as_object() {
        Some(envelope) => match envelope.get("result") {
            Some(Value::Object(result)) => print_result(result, envelope),
            _ => println!("{}", field_table(envelope)),
        },
        None => println!("{}", display_value(value)),
    }
}

fn field_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        // Printed as their own table
        if key == "months" {
            continue;
        }
        builder.push_record([key.as_str(), &display_value(val)]);
    }
    Table::from(builder)
}

fn rows_table(rows: &[Value]) -> Option<Table> {
    let Some(Value::Object(first)) = rows.first() else {
        return None;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    Some(Table::from(builder))
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    println!("{}", field_table(result));

    if let Some(Value::Array(months)) = result.get("months") {
        if let Some(table) = rows_table(months) {
            println!("\n{}", table);
        }
    }

    // Remarks: every triggered exception, then the reason
    if let Some(Value::Array(exceptions)) = result.get("exceptions") {
        if !exceptions.is_empty() {
            println!("\nExceptions:");
            for e in exceptions {
                println!("  - {}", display_value(e));
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", display_value(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
