use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::ParameterSet;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub experiments: Vec<ExperimentDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Parameter sets served by a static experiment collaborator
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExperimentDefinition {
    /// Collaborator name, stamped on exposure events
    pub name: String,
    /// Served when no experiment name is requested
    #[serde(default)]
    pub params: ParameterSet,
    /// Served per requested experiment name
    #[serde(default)]
    pub named: BTreeMap<String, ParameterSet>,
}

impl ExperimentDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParameterSet::new(),
            named: BTreeMap::new(),
        }
    }

    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.params = params;
        self
    }

    pub fn with_named(mut self, experiment_name: impl Into<String>, params: ParameterSet) -> Self {
        self.named.insert(experiment_name.into(), params);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            experiments: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// Load from an explicit file, still honoring environment overrides
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    pub fn experiment(&self, name: &str) -> Option<&ExperimentDefinition> {
        self.experiments.iter().find(|definition| definition.name == name)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }
}
