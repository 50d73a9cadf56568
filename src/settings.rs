use anyhow::{anyhow, Context};
use config::{Config, ConfigError, Environment, File};
use ethers::prelude::{Http, Provider};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapters::ProviderRegistry;
use crate::chains::Chain;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Chain name -> RPC endpoint URL.
    #[serde(default)]
    pub rpc_providers: HashMap<String, String>,
    /// Registry source file the build keeps in sync.
    #[serde(default = "default_registry_path")]
    pub registry_path: String,
    /// Root directory metadata artifacts are written under.
    #[serde(default = "default_output_root")]
    pub output_root: String,
}

fn default_registry_path() -> String {
    "src/metadataFiles.ts".to_string()
}

fn default_output_root() -> String {
    ".".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_providers: HashMap::new(),
            registry_path: default_registry_path(),
            output_root: default_output_root(),
        }
    }
}

impl Settings {
    /// Loads `config/default.toml` (optional), then `config/local.toml`
    /// (optional), then `METADATA__`-prefixed environment overrides.
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("METADATA").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Instantiates one HTTP provider per configured chain.
    pub fn provider_registry(&self) -> anyhow::Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for (chain_name, url) in &self.rpc_providers {
            let chain: Chain = chain_name
                .parse()
                .map_err(|e: String| anyhow!("rpc_providers: {e}"))?;
            let provider = Provider::<Http>::try_from(url.as_str())
                .with_context(|| format!("invalid RPC url for {chain}: {url}"))?;
            registry.insert(chain, Arc::new(provider));
        }
        Ok(registry)
    }
}
