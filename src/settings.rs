use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{HarvestError, Result};
use crate::record::SourceDescriptor;

const SETTINGS_FILE: &str = "harvest";
const ENV_PREFIX: &str = "HARVEST";

/// Driver configuration: `harvest.toml` (optional) overlaid with
/// `HARVEST_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache_path: PathBuf,
    pub output_path: PathBuf,
    pub timeout_secs: u64,
    pub sources: Vec<SourceDescriptor>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cache_path: PathBuf::from("data/prompts.json"),
            output_path: PathBuf::from("data/new_prompts.json"),
            timeout_secs: 30,
            sources: builtin_sources(),
        }
    }
}

fn builtin_sources() -> Vec<SourceDescriptor> {
    vec![SourceDescriptor {
        name: "awesome-gpt4o-images".into(),
        location: "https://raw.githubusercontent.com/jamez-bondos/awesome-gpt4o-images/main/README.md"
            .into(),
        attribution: "jamez-bondos".into(),
        mode: "generate".into(),
        category: "image".into(),
        sub_category: "gpt-4o".into(),
    }]
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(SETTINGS_FILE)
    }

    pub fn load_from(file: &str) -> Result<Self> {
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.sources.is_empty() {
            settings.sources = builtin_sources();
        }
        Ok(settings)
    }

    /// Named source, or the first configured one.
    pub fn source(&self, name: Option<&str>) -> Result<&SourceDescriptor> {
        match name {
            Some(name) => self
                .sources
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| HarvestError::UnknownSource(name.to_string())),
            None => self
                .sources
                .first()
                .ok_or_else(|| HarvestError::UnknownSource("<none configured>".into())),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ── Tests ──
