//! Runner configuration, loaded from YAML.
//!
//! ```yaml
//! empty_parameters: allow   # fail | allow; omitted means "per discovery mode"
//! color: auto               # auto | always | never
//! log_filter: warn          # tracing EnvFilter directive
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::Discovery;

const DEFAULT_LOG_FILTER: &str = "warn";

/// What a suite does when discovery yields zero parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyParameterPolicy {
    /// Report a single `No parameters found` failure.
    Fail,
    /// Run zero children and report nothing.
    Allow,
}

impl EmptyParameterPolicy {
    /// Eager suites fail on an empty parameter list, deferred suites allow it.
    pub fn default_for(discovery: Discovery) -> Self {
        match discovery {
            Discovery::Eager => EmptyParameterPolicy::Fail,
            Discovery::Deferred => EmptyParameterPolicy::Allow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolves `auto` against whether stdout is a terminal.
    pub fn use_colors(&self) -> bool {
        match self {
            ColorMode::Auto => atty::is(atty::Stream::Stdout),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Overrides the per-mode default for every suite that does not set its own policy.
    pub empty_parameters: Option<EmptyParameterPolicy>,
    pub color: ColorMode,
    pub log_filter: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            empty_parameters: None,
            color: ColorMode::Auto,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", path.display())]
    #[diagnostic(code(paramsuite::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    #[diagnostic(
        code(paramsuite::config::parse),
        help("known keys are empty_parameters, color, and log_filter")
    )]
    Parse(#[from] serde_yaml::Error),
}

impl RunnerConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Policy for a suite: the template's own choice, then this config, then the mode default.
    pub fn empty_policy(
        &self,
        template_policy: Option<EmptyParameterPolicy>,
        discovery: Discovery,
    ) -> EmptyParameterPolicy {
        template_policy
            .or(self.empty_parameters)
            .unwrap_or_else(|| EmptyParameterPolicy::default_for(discovery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_default() {
        assert_eq!(RunnerConfig::from_yaml_str("").unwrap(), RunnerConfig::default());
        assert_eq!(RunnerConfig::default().log_filter, "warn");
    }

    #[test]
    fn parses_all_keys() {
        let config = RunnerConfig::from_yaml_str(
            "empty_parameters: allow\ncolor: never\nlog_filter: paramsuite=debug\n",
        )
        .unwrap();
        assert_eq!(config.empty_parameters, Some(EmptyParameterPolicy::Allow));
        assert_eq!(config.color, ColorMode::Never);
        assert!(!config.color.use_colors());
        assert_eq!(config.log_filter, "paramsuite=debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RunnerConfig::from_yaml_str("colour: never\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn policy_precedence() {
        let config = RunnerConfig::default();
        assert_eq!(
            config.empty_policy(None, Discovery::Eager),
            EmptyParameterPolicy::Fail
        );
        assert_eq!(
            config.empty_policy(None, Discovery::Deferred),
            EmptyParameterPolicy::Allow
        );

        let config = RunnerConfig {
            empty_parameters: Some(EmptyParameterPolicy::Fail),
            ..RunnerConfig::default()
        };
        assert_eq!(
            config.empty_policy(None, Discovery::Deferred),
            EmptyParameterPolicy::Fail
        );
        assert_eq!(
            config.empty_policy(Some(EmptyParameterPolicy::Allow), Discovery::Deferred),
            EmptyParameterPolicy::Allow
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RunnerConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
