use anyhow::Context;
use async_trait::async_trait;
use ethers::prelude::*;
use indexmap::IndexMap;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::adapter::{ProtocolAdapter, ProtocolTokenMetadata};
use crate::adapters::fetch_token_metadata;
use crate::chains::Chain;
use crate::contracts::IProtocolDataProvider;
use crate::errors::MetadataBuildError;
use crate::protocols::Protocol;

/// Aave V2 protocol data provider deployments, in chain registration order.
pub static AAVE_V2_DATA_PROVIDERS: Lazy<IndexMap<Chain, Address>> = Lazy::new(|| {
    IndexMap::from([
        (
            Chain::Ethereum,
            "0x057835Ad21a177dbdd3090bB1CAE03EaCF78Fc6d".parse().unwrap(),
        ),
        (
            Chain::Polygon,
            "0x7551b5D2763519d4e37e8B81929D336De671d46d".parse().unwrap(),
        ),
        (
            Chain::Avalanche,
            "0x65285E9dfab318f57051ab2b139ccCf232945451".parse().unwrap(),
        ),
    ])
});

/// The three position token families Aave V2 mints per reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AaveV2Product {
    AToken,
    StableDebtToken,
    VariableDebtToken,
}

impl AaveV2Product {
    pub const ALL: [AaveV2Product; 3] = [
        AaveV2Product::AToken,
        AaveV2Product::StableDebtToken,
        AaveV2Product::VariableDebtToken,
    ];

    pub fn product_id(&self) -> &'static str {
        match self {
            AaveV2Product::AToken => "a-token",
            AaveV2Product::StableDebtToken => "stable-debt-token",
            AaveV2Product::VariableDebtToken => "variable-debt-token",
        }
    }

    /// Versioned file key; bumped when the payload shape changes.
    pub fn file_key(&self) -> &'static str {
        match self {
            AaveV2Product::AToken => "a-token-v2",
            AaveV2Product::StableDebtToken => "stable-debt-token-v2",
            AaveV2Product::VariableDebtToken => "variable-debt-token-v2",
        }
    }
}

/// Reads one Aave V2 position-token family from the protocol data provider.
#[derive(Clone)]
pub struct AaveV2ProductAdapter {
    product: AaveV2Product,
    chain: Chain,
    data_provider: Address,
    provider: Arc<Provider<Http>>,
}

impl AaveV2ProductAdapter {
    pub fn new(
        product: AaveV2Product,
        chain: Chain,
        data_provider: Address,
        provider: Arc<Provider<Http>>,
    ) -> Self {
        Self {
            product,
            chain,
            data_provider,
            provider,
        }
    }
}

#[async_trait]
impl ProtocolAdapter for AaveV2ProductAdapter {
    fn protocol_id(&self) -> Protocol {
        Protocol::AaveV2
    }

    fn product_id(&self) -> &str {
        self.product.product_id()
    }

    fn chain_id(&self) -> Chain {
        self.chain
    }

    fn file_key(&self) -> &str {
        self.product.file_key()
    }

    async fn get_protocol_tokens(&self) -> Result<Vec<ProtocolTokenMetadata>, MetadataBuildError> {
        let data_provider =
            IProtocolDataProvider::new(self.data_provider, Arc::clone(&self.provider));

        let reserves = data_provider
            .get_all_reserves_tokens()
            .call()
            .await
            .with_context(|| {
                format!(
                    "getAllReservesTokens() failed on {} data provider {:?}",
                    self.chain, self.data_provider
                )
            })?;
        info!(
            "Listing {} Aave V2 reserves on {} for product {}",
            reserves.len(),
            self.chain,
            self.product.product_id()
        );

        let mut tokens = Vec::with_capacity(reserves.len());
        for reserve in reserves {
            let (a_token, stable_debt, variable_debt) = data_provider
                .get_reserve_tokens_addresses(reserve.token_address)
                .call()
                .await
                .with_context(|| {
                    format!(
                        "getReserveTokensAddresses({:?}) failed on {}",
                        reserve.token_address, self.chain
                    )
                })?;

            let protocol_token = match self.product {
                AaveV2Product::AToken => a_token,
                AaveV2Product::StableDebtToken => stable_debt,
                AaveV2Product::VariableDebtToken => variable_debt,
            };
            if protocol_token == Address::zero() {
                debug!(
                    "Reserve {} has no {} token, skipping",
                    reserve.symbol,
                    self.product.product_id()
                );
                continue;
            }

            tokens.push(ProtocolTokenMetadata {
                token: fetch_token_metadata(&self.provider, protocol_token).await?,
                underlying_tokens: vec![fetch_token_metadata(&self.provider, reserve.token_address).await?],
            });
        }

        Ok(tokens)
    }
}
