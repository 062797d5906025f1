//! CLI argument definitions using clap

use crate::config::{CliConfig, ColorChoice, Verbosity};
use clap::{Parser, ValueEnum};
use routecheck::{SuiteConfig, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_MODELS};
use std::time::Duration;

/// Routecheck: smoke tests for OpenAI-compatible chat-completion routers
///
/// Runs five checks against the router: basic completion, streaming, model
/// mapping, multiple system messages and rejection of `n > 1`.
#[derive(Parser, Debug)]
#[command(name = "routecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the router's OpenAI-compatible API
    #[arg(long, env = "ROUTECHECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "ROUTECHECK_API_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub api_key: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 600)]
    pub timeout: u64,

    /// Model identifier for the mapping sweep (repeatable)
    #[arg(long = "model", value_name = "ID")]
    pub models: Vec<String>,

    /// Skip the health probe before the suite
    #[arg(long)]
    pub skip_health_check: bool,

    /// Exit non-zero when any case fails
    #[arg(long)]
    pub strict: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (failures and summary only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,
}

impl Cli {
    /// Suite settings from the parsed flags. Validation happens in the runner.
    #[must_use]
    pub fn suite_config(&self) -> SuiteConfig {
        let config = SuiteConfig::new()
            .with_base_url(self.base_url.clone())
            .with_api_key(self.api_key.clone())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_health_check(!self.skip_health_check);
        if self.models.is_empty() {
            config.with_models(DEFAULT_MODELS)
        } else {
            config.with_models(self.models.iter().cloned())
        }
    }

    /// Presentation settings from the parsed flags
    #[must_use]
    pub fn cli_config(&self) -> CliConfig {
        CliConfig::new()
            .with_verbosity(Verbosity::from_flags(self.quiet, self.verbose))
            .with_color(self.color.into())
            .with_strict(self.strict)
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
