use std::collections::HashMap;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Settings read from `DEPTREE_*` environment variables. Command line flags take precedence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DepTreeConfig {
    pub include_all_build_files: bool,
    pub include_included_builds: bool,
    pub curation_audit_mode: bool,
    pub jobs: Option<usize>,
}

impl DepTreeConfig {
    pub fn load() -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(None)?;

        Ok(Self {
            include_all_build_files: raw_config.include_all_build_files,
            include_included_builds: raw_config.include_included_builds,
            curation_audit_mode: raw_config.curation_audit_mode,
            jobs: raw_config.jobs,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    include_all_build_files: bool,
    #[serde(default)]
    include_included_builds: bool,
    #[serde(default)]
    curation_audit_mode: bool,
    jobs: Option<usize>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("DEPTREE")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
