use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Reads configuration values, collecting every missing required variable so
/// startup can report them all at once instead of one per restart.
pub struct EnvReader<F = fn(&str) -> Option<String>> {
    lookup: F,
    missing: Vec<String>,
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl EnvReader {
    pub fn new() -> Self {
        Self::with_lookup(process_env)
    }
}

impl Default for EnvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_lookup(lookup: F) -> Self {
        Self {
            lookup,
            missing: Vec::new(),
        }
    }

    /// Trimmed value, `None` when unset or blank.
    pub fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Records the name as missing and returns an empty string when absent.
    /// Call [`EnvReader::finish`] before using the values.
    pub fn required(&mut self, name: &str) -> String {
        match self.optional(name) {
            Some(value) => value,
            None => {
                self.missing.push(name.to_string());
                String::new()
            }
        }
    }

    pub fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    pub fn parse_or<T>(&self, name: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
            None => Ok(default),
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "Missing required environment variables: {}",
                self.missing.join(", ")
            ))
        }
    }
}
