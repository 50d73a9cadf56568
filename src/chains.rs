//! # Chain Symbol Table
//!
//! Closed enumeration of the EVM chains the SDK knows about. Generated
//! registry entries reference chains by symbolic key (`Chain.Ethereum`), never
//! by numeric id, so renumbering never invalidates existing entries. The
//! name↔value mapping is a bijection and is relied on by the key builder and
//! the source transformer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported EVM chains, with their canonical chain ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
    Ethereum,
    Optimism,
    Bsc,
    Polygon,
    Fantom,
    Base,
    Arbitrum,
    Avalanche,
    Linea,
}

impl Chain {
    /// All chains, in registration order. The build orchestrator iterates this
    /// order, so it must stay stable across releases.
    pub const ALL: [Chain; 9] = [
        Chain::Ethereum,
        Chain::Optimism,
        Chain::Bsc,
        Chain::Polygon,
        Chain::Fantom,
        Chain::Base,
        Chain::Arbitrum,
        Chain::Avalanche,
        Chain::Linea,
    ];

    /// Numeric EVM chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Optimism => 10,
            Chain::Bsc => 56,
            Chain::Polygon => 137,
            Chain::Fantom => 250,
            Chain::Base => 8453,
            Chain::Arbitrum => 42161,
            Chain::Avalanche => 43114,
            Chain::Linea => 59144,
        }
    }

    /// Lowercase chain name used in artifact file names
    /// (`ethereum.protocol-token.json`).
    pub fn name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Optimism => "optimism",
            Chain::Bsc => "bsc",
            Chain::Polygon => "polygon",
            Chain::Fantom => "fantom",
            Chain::Base => "base",
            Chain::Arbitrum => "arbitrum",
            Chain::Avalanche => "avalanche",
            Chain::Linea => "linea",
        }
    }

    /// Symbolic key used in generated source (`Chain.Ethereum`) and in
    /// generated import identifiers.
    pub fn key(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Optimism => "Optimism",
            Chain::Bsc => "Bsc",
            Chain::Polygon => "Polygon",
            Chain::Fantom => "Fantom",
            Chain::Base => "Base",
            Chain::Arbitrum => "Arbitrum",
            Chain::Avalanche => "Avalanche",
            Chain::Linea => "Linea",
        }
    }

    /// Reverse lookup by symbolic key, used when parsing `Chain.X` references
    /// out of the registry source file.
    pub fn from_key(key: &str) -> Option<Chain> {
        Chain::ALL.iter().copied().find(|c| c.key() == key)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown chain: {s}"))
    }
}
