//! Protocol-specific metadata adapters and their registration table.
//!
//! `supported_adapters` builds the full adapter list in the fixed enumeration
//! order the build pipeline relies on: protocol registration order, then chain
//! registration order, then product order. The orchestrator applies
//! protocol/chain filters on top of this list; the list itself never changes
//! shape between runs.

pub mod aave_v2;
pub mod compound_v2;
pub mod uniswap_v3;

use crate::adapter::{ProtocolAdapter, TokenMetadata};
use crate::chains::Chain;
use crate::contracts::Erc20;
use crate::errors::MetadataBuildError;
use crate::protocols::Protocol;
use anyhow::Context;
use ethers::prelude::*;
use ethers::utils::to_checksum;
use std::collections::HashMap;
use std::sync::Arc;

use aave_v2::{AaveV2Product, AaveV2ProductAdapter, AAVE_V2_DATA_PROVIDERS};
use compound_v2::{CompoundV2SupplyAdapter, COMPOUND_V2_COMPTROLLER};
use uniswap_v3::{UniswapV3PoolAdapter, UNISWAP_V3_CHAINS};

/// Configured RPC providers, one per chain. A registered (protocol, chain)
/// pair whose chain has no provider is a fatal configuration error.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Chain, Arc<Provider<Http>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain: Chain, provider: Arc<Provider<Http>>) {
        self.providers.insert(chain, provider);
    }

    pub fn get(&self, chain: Chain) -> Result<Arc<Provider<Http>>, MetadataBuildError> {
        self.providers
            .get(&chain)
            .cloned()
            .ok_or(MetadataBuildError::ProviderMissing(chain))
    }
}

/// Builds every registered adapter, in enumeration order.
pub fn supported_adapters(
    providers: &ProviderRegistry,
) -> Result<Vec<Arc<dyn ProtocolAdapter>>, MetadataBuildError> {
    let mut adapters: Vec<Arc<dyn ProtocolAdapter>> = Vec::new();

    for protocol in Protocol::ALL {
        match protocol {
            Protocol::AaveV2 => {
                for (&chain, &data_provider) in AAVE_V2_DATA_PROVIDERS.iter() {
                    let provider = providers.get(chain)?;
                    for product in AaveV2Product::ALL {
                        adapters.push(Arc::new(AaveV2ProductAdapter::new(
                            product,
                            chain,
                            data_provider,
                            Arc::clone(&provider),
                        )));
                    }
                }
            }
            Protocol::CompoundV2 => {
                let provider = providers.get(Chain::Ethereum)?;
                adapters.push(Arc::new(CompoundV2SupplyAdapter::new(
                    Chain::Ethereum,
                    *COMPOUND_V2_COMPTROLLER,
                    provider,
                )));
            }
            Protocol::UniswapV3 => {
                for chain in UNISWAP_V3_CHAINS {
                    adapters.push(Arc::new(UniswapV3PoolAdapter::new(chain)));
                }
            }
            // No snapshot-able metadata products registered yet.
            Protocol::AaveV3 | Protocol::Stargate => {}
        }
    }

    Ok(adapters)
}

/// Reads name/symbol/decimals of one ERC-20 and returns its metadata with the
/// address in checksum form.
pub(crate) async fn fetch_token_metadata<M: Middleware + 'static>(
    provider: &Arc<M>,
    address: Address,
) -> anyhow::Result<TokenMetadata> {
    let erc20 = Erc20::new(address, Arc::clone(provider));
    let name = erc20
        .name()
        .call()
        .await
        .with_context(|| format!("name() failed for token {address:?}"))?;
    let symbol = erc20
        .symbol()
        .call()
        .await
        .with_context(|| format!("symbol() failed for token {address:?}"))?;
    let decimals = erc20
        .decimals()
        .call()
        .await
        .with_context(|| format!("decimals() failed for token {address:?}"))?;

    Ok(TokenMetadata {
        address: to_checksum(&address, None),
        name,
        symbol,
        decimals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_provider_is_reported_per_chain() {
        let registry = ProviderRegistry::new();
        let err = registry.get(Chain::Polygon).unwrap_err();
        assert!(matches!(err, MetadataBuildError::ProviderMissing(Chain::Polygon)));
    }

    #[test]
    fn adapter_enumeration_is_stable() {
        let mut registry = ProviderRegistry::new();
        let provider = Arc::new(Provider::<Http>::try_from("http://localhost:8545").unwrap());
        for chain in Chain::ALL {
            registry.insert(chain, Arc::clone(&provider));
        }

        let first: Vec<String> = supported_adapters(&registry)
            .unwrap()
            .iter()
            .map(|a| a.metadata_key().identifier())
            .collect();
        let second: Vec<String> = supported_adapters(&registry)
            .unwrap()
            .iter()
            .map(|a| a.metadata_key().identifier())
            .collect();

        assert_eq!(first, second);
        // Aave V2 adapters come first, in protocol registration order.
        assert!(first[0].starts_with("AaveV2"));
    }
}
