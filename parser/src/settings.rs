//! Parser and unparser configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! case_sensitive: false
//! ignore_unknown_arguments: true
//! enable_separator: true
//! allow_multi_instance: false
//! decimal_separator: ","
//! non_fatal_errors:
//!   - unknown_option
//!   - repeated_option
//! ```

use std::collections::HashSet;
use std::io::BufReader;
use std::path::Path;

use command_bind_core::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings controlling one binding pass.
///
/// # Examples
///
/// ```
/// use command_bind_core::ErrorKind;
/// use command_bind_parser::ParserSettings;
///
/// let settings = ParserSettings::default()
///     .with_case_sensitive(false)
///     .with_non_fatal(ErrorKind::UnknownOption);
/// assert!(!settings.case_sensitive);
/// assert!(settings.is_non_fatal(ErrorKind::UnknownOption));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Compare option names case-sensitively.
    pub case_sensitive: bool,
    /// Drop unknown option names instead of reporting them.
    pub ignore_unknown_arguments: bool,
    /// Treat a bare `--` as the end of options.
    pub enable_separator: bool,
    /// Let non-sequence options repeat; the last occurrence wins.
    pub allow_multi_instance: bool,
    /// Decimal separator accepted when converting floats.
    pub decimal_separator: char,
    /// Error kinds reported as warnings instead of failing the pass.
    pub non_fatal_errors: HashSet<ErrorKind>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            ignore_unknown_arguments: false,
            enable_separator: true,
            allow_multi_instance: false,
            decimal_separator: '.',
            non_fatal_errors: HashSet::new(),
        }
    }
}

impl ParserSettings {
    /// Loads settings from a YAML file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file cannot be read, or
    /// [`SettingsError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let settings = serde_yaml::from_reader(reader)?;
        Ok(settings)
    }

    /// Parses settings from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_ignore_unknown_arguments(mut self, ignore: bool) -> Self {
        self.ignore_unknown_arguments = ignore;
        self
    }

    pub fn with_enable_separator(mut self, enable: bool) -> Self {
        self.enable_separator = enable;
        self
    }

    pub fn with_allow_multi_instance(mut self, allow: bool) -> Self {
        self.allow_multi_instance = allow;
        self
    }

    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Adds an error kind to report as a warning.
    pub fn with_non_fatal(mut self, kind: ErrorKind) -> Self {
        self.non_fatal_errors.insert(kind);
        self
    }

    pub fn is_non_fatal(&self, kind: ErrorKind) -> bool {
        self.non_fatal_errors.contains(&kind)
    }
}

/// Settings controlling how an instance is formatted back into arguments.
///
/// # Examples
///
/// ```
/// use command_bind_parser::UnparserSettings;
///
/// let settings = UnparserSettings::with_group_switches_only();
/// assert!(settings.group_switches);
/// assert!(settings.emit_separator);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnparserSettings {
    /// Use short names where available.
    pub prefer_short_name: bool,
    /// Bundle short switches into one `-abc` token.
    pub group_switches: bool,
    /// Write `--name=value` instead of `--name value`.
    pub use_equal_token: bool,
    /// Write `--` before positional values.
    pub emit_separator: bool,
}

impl Default for UnparserSettings {
    fn default() -> Self {
        Self {
            prefer_short_name: false,
            group_switches: false,
            use_equal_token: false,
            emit_separator: true,
        }
    }
}

impl UnparserSettings {
    pub fn with_group_switches_only() -> Self {
        Self {
            group_switches: true,
            ..Self::default()
        }
    }

    pub fn with_use_equal_token_only() -> Self {
        Self {
            use_equal_token: true,
            ..Self::default()
        }
    }
}
