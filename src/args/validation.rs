use super::types::CleanArgs;
use std::{fs, path::PathBuf};

impl CleanArgs {
    /// # Errors
    ///
    /// Will return `Err` if a numeric option is zero or the base url is not http(s)
    pub fn validate(&self) -> Result<(), String> {
        if self.sync.top_n == 0 {
            return Err("top_n must be at least 1".to_string());
        }
        if self.sync.fanout == 0 {
            return Err("fanout must be at least 1".to_string());
        }
        if self.sync.max_cycles == Some(0) {
            return Err("max_cycles must be at least 1 when set".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout_secs must be at least 1".to_string());
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            ));
        }
        Ok(())
    }
}

/// # Errors
///
/// Will return `Err` if the file is not readable
pub fn check_readable_file(file: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(file);
    if !path.is_file() || fs::metadata(&path).is_err() {
        return Err(format!("The config file '{file}' is not readable."));
    }
    Ok(path)
}
