pub mod file;
pub mod prompt;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a JSON document from `--input <file>`, else from piped stdin.
/// `Ok(None)` means neither was supplied.
pub fn load_json<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
