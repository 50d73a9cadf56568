//! # Protocol Symbol Table
//!
//! Closed enumeration of supported protocols. Each protocol has a kebab-case
//! id (used in artifact paths and CLI filters) and a PascalCase symbolic key
//! (used in generated source and import identifiers). Both mappings are
//! bijections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    AaveV2,
    AaveV3,
    CompoundV2,
    UniswapV3,
    Stargate,
}

impl Protocol {
    /// All protocols, in registration order. The build orchestrator iterates
    /// this order, so it must stay stable across releases.
    pub const ALL: [Protocol; 5] = [
        Protocol::AaveV2,
        Protocol::AaveV3,
        Protocol::CompoundV2,
        Protocol::UniswapV3,
        Protocol::Stargate,
    ];

    /// Kebab-case protocol id used in artifact paths (`adapters/aave-v2/...`).
    pub fn id(&self) -> &'static str {
        match self {
            Protocol::AaveV2 => "aave-v2",
            Protocol::AaveV3 => "aave-v3",
            Protocol::CompoundV2 => "compound-v2",
            Protocol::UniswapV3 => "uniswap-v3",
            Protocol::Stargate => "stargate",
        }
    }

    /// Symbolic key used in generated source (`Protocol.AaveV2`) and in
    /// generated import identifiers.
    pub fn key(&self) -> &'static str {
        match self {
            Protocol::AaveV2 => "AaveV2",
            Protocol::AaveV3 => "AaveV3",
            Protocol::CompoundV2 => "CompoundV2",
            Protocol::UniswapV3 => "UniswapV3",
            Protocol::Stargate => "Stargate",
        }
    }

    /// Reverse lookup by symbolic key, used when parsing `Protocol.X`
    /// references out of the registry source file.
    pub fn from_key(key: &str) -> Option<Protocol> {
        Protocol::ALL.iter().copied().find(|p| p.key() == key)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| format!("unknown protocol: {s}"))
    }
}
