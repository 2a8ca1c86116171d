//! The matcher context.
//!
//! An [`Assay`] owns the configuration and the JSON matcher engine (and with
//! it the decoded-body cache). Most suites use the process-wide context
//! through [`expect`](crate::expect); suites that need their own cache or
//! report settings build one with [`Assay::from_config`].

use crate::expect::Expectation;
use assay_config::{AssayConfig, ConfigLoader};
use assay_core::HttpResponse;
use assay_json::{CacheConfig, CacheScope, JsonMatchers};
use assay_telemetry::LogConfig;
use std::sync::OnceLock;

/// File read by [`Assay::global`] when present in the working directory.
pub const CONFIG_FILE: &str = "assay.toml";

/// Prefix of environment overrides read by [`Assay::global`].
pub const ENV_PREFIX: &str = "ASSAY";

static GLOBAL: OnceLock<Assay> = OnceLock::new();

/// Matcher context: configuration plus the JSON engine.
#[derive(Debug)]
pub struct Assay {
    config: AssayConfig,
    json: JsonMatchers,
}

impl Default for Assay {
    fn default() -> Self {
        Self::from_config(AssayConfig::default())
    }
}

impl Assay {
    /// Creates a context with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from a loaded configuration.
    ///
    /// Installs a logging subscriber when `logging.enabled` is set and none
    /// is installed yet.
    pub fn from_config(config: AssayConfig) -> Self {
        if config.logging.enabled {
            if let Err(e) = assay_telemetry::init_logging(&LogConfig::from(&config.logging)) {
                tracing::debug!(error = %e, "logging subscriber not installed");
            }
        }

        let json = JsonMatchers::with_config(CacheConfig::from(&config.cache));
        Self { config, json }
    }

    /// The process-wide context.
    ///
    /// Built on first use from `assay.toml` (if present) and `ASSAY__*`
    /// environment overrides. Falls back to defaults when the configuration
    /// does not load.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Self::from_config(load_global_config()))
    }

    /// The configuration this context was built with.
    pub fn config(&self) -> &AssayConfig {
        &self.config
    }

    /// The JSON matcher engine.
    pub fn json(&self) -> &JsonMatchers {
        &self.json
    }

    /// Drops every cached body, including those of tests running in
    /// parallel on this context.
    pub fn reset(&self) {
        self.json.cache().reset();
    }

    /// Returns a guard that, when it goes out of scope, drops the bodies
    /// this thread decoded while it was held.
    ///
    /// ```
    /// use assay::{Assay, TestResponse};
    /// use http::StatusCode;
    /// use serde_json::json;
    ///
    /// let assay = Assay::new();
    /// {
    ///     let _scope = assay.scope();
    ///     let response = TestResponse::json(StatusCode::OK, &json!({"id": 1}));
    ///     assay.expect(&response).to_have_json_path("id");
    ///     assert_eq!(assay.json().cache().len(), 1);
    /// }
    /// assert!(assay.json().cache().is_empty());
    /// ```
    pub fn scope(&self) -> CacheScope<'_> {
        self.json.cache().scope()
    }

    /// Starts an expectation about `response`.
    pub fn expect<'a, R>(&'a self, response: &'a R) -> Expectation<'a, R>
    where
        R: HttpResponse + ?Sized,
    {
        Expectation::new(self, response)
    }
}

fn load_global_config() -> AssayConfig {
    let loaded = ConfigLoader::new()
        .with_optional_file(CONFIG_FILE)
        .and_then(|loader| loader.with_env_prefix(ENV_PREFIX).load());

    match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "invalid assay configuration, using defaults");
            AssayConfig::default()
        }
    }
}
