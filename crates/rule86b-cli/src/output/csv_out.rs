use serde_json::{Map, Value};
use std::io;

use super::display_value;

/// Write output as CSV to stdout.
///
/// A fiscal-year result prints one row per month; anything else prints a
/// two-column `field,value` listing of the result object.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match map.get("months") {
            Some(Value::Array(months)) => write_rows(wtr, months),
            _ => write_fields(wtr, map),
        },
        Value::Array(arr) => write_rows(wtr, arr),
        _ => {
            let _ = wtr.write_record([display_value(result)]);
        }
    }
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &display_value(val)]);
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([display_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(display_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
