//! View configuration file
//!
//! ```json
//! {
//!   "perPage": 0,
//!   "pageNumber": 1,
//!   "sortKey": null,
//!   "sortDirection": "ascending",
//!   "logLevel": "info"
//! }
//! ```
//!
//! Every field is optional. Command line flags override file values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::args::ViewArgs;
use super::errors::{CliError, CliResult};
use crate::index::SortDirection;
use crate::observability::Severity;
use crate::view::{PageState, SortState};

/// Initial viewing parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    /// 0 disables pagination
    #[serde(default)]
    pub per_page: usize,

    #[serde(default = "default_page_number")]
    pub page_number: usize,

    /// Unset means the first field of the loaded schema
    #[serde(default)]
    pub sort_key: Option<String>,

    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_number() -> usize {
    1
}
fn default_sort_direction() -> String {
    "ascending".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            per_page: 0,
            page_number: default_page_number(),
            sort_key: None,
            sort_direction: default_sort_direction(),
            log_level: default_log_level(),
        }
    }
}

impl ViewConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: ViewConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// File (or defaults) with command line overrides applied
    pub fn resolve(args: &ViewArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(per_page) = args.per_page {
            config.per_page = per_page;
        }
        if let Some(page) = args.page {
            config.page_number = page;
        }
        if let Some(sort) = &args.sort {
            config.sort_key = Some(sort.clone());
        }
        if let Some(direction) = &args.direction {
            config.sort_direction = direction.clone();
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.page_number == 0 {
            return Err(CliError::config_error("pageNumber must be >= 1"));
        }
        self.direction()?;
        self.severity()?;
        Ok(())
    }

    pub fn direction(&self) -> CliResult<SortDirection> {
        self.sort_direction
            .parse()
            .map_err(|e: crate::index::IndexError| CliError::config_error(e.to_string()))
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(CliError::config_error)
    }

    pub fn sort_state(&self) -> CliResult<SortState> {
        Ok(SortState {
            key: self.sort_key.clone(),
            direction: self.direction()?,
        })
    }

    pub fn page_state(&self) -> CliResult<PageState> {
        PageState::new(self.per_page, self.page_number)
            .map_err(|e| CliError::config_error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let file = config_file("{}");
        let config = ViewConfig::load(file.path()).unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.sort_state().unwrap(), SortState::default());
        assert_eq!(config.page_state().unwrap(), PageState::default());
    }

    #[test]
    fn test_full_file() {
        let file = config_file(
            r#"{"perPage": 10, "pageNumber": 2, "sortKey": "age", "sortDirection": "descending", "logLevel": "warn"}"#,
        );
        let config = ViewConfig::load(file.path()).unwrap();
        assert_eq!(
            config.sort_state().unwrap(),
            SortState::new("age", SortDirection::Descending)
        );
        assert_eq!(config.page_state().unwrap().per_page(), 10);
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for body in [
            r#"{"pageNumber": 0}"#,
            r#"{"sortDirection": "up"}"#,
            r#"{"logLevel": "loud"}"#,
            r#"{"perPage": -1}"#,
            "not json",
        ] {
            let err = ViewConfig::load(config_file(body).path()).unwrap_err();
            assert_eq!(err.code_str(), "XV_CLI_CONFIG_ERROR", "body: {}", body);
        }
    }

    #[test]
    fn test_flags_override_file() {
        let file = config_file(r#"{"perPage": 10, "sortKey": "age"}"#);
        let args = ViewArgs {
            config: Some(file.path().to_path_buf()),
            per_page: Some(3),
            direction: Some("descending".into()),
            ..ViewArgs::default()
        };

        let config = ViewConfig::resolve(&args).unwrap();
        assert_eq!(config.per_page, 3);
        assert_eq!(config.sort_key.as_deref(), Some("age"));
        assert_eq!(config.sort_direction, "descending");
    }

    #[test]
    fn test_missing_file() {
        let err = ViewConfig::load(Path::new("/nonexistent/view.json")).unwrap_err();
        assert_eq!(err.code_str(), "XV_CLI_CONFIG_ERROR");
    }
}
