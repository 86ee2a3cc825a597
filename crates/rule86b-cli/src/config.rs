use std::env;
use std::path::PathBuf;

/// Defaults for report branding and logging, read from the environment
/// (and a `.env` file when present). Command-line flags override them.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub brand: String,
    pub logo_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: String,
}

impl CliConfig {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        CliConfig {
            brand: env::var("R86B_BRAND").unwrap_or_else(|_| "Rule 86B Desk".to_string()),
            logo_path: env::var("R86B_LOGO")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logo.png")),
            output_dir: env::var("R86B_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            log_level: env::var("R86B_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        }
    }
}
