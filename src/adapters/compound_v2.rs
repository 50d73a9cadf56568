use anyhow::Context;
use async_trait::async_trait;
use ethers::prelude::*;
use log::{debug, info};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::adapter::{ProtocolAdapter, ProtocolTokenMetadata, TokenMetadata};
use crate::adapters::fetch_token_metadata;
use crate::chains::Chain;
use crate::contracts::{CToken, IComptroller};
use crate::errors::MetadataBuildError;
use crate::protocols::Protocol;

/// Compound V2 Comptroller on mainnet.
pub static COMPOUND_V2_COMPTROLLER: Lazy<Address> =
    Lazy::new(|| "0x3d9819210A31b4961b30EF54bE2aeD79B9c9Cd3B".parse().unwrap());

/// Sentinel address markets like cETH use for the native asset.
const NATIVE_ETH: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Reads the Compound V2 supply-market token list from the Comptroller.
#[derive(Clone)]
pub struct CompoundV2SupplyAdapter {
    chain: Chain,
    comptroller: Address,
    provider: Arc<Provider<Http>>,
}

impl CompoundV2SupplyAdapter {
    pub fn new(chain: Chain, comptroller: Address, provider: Arc<Provider<Http>>) -> Self {
        Self {
            chain,
            comptroller,
            provider,
        }
    }
}

#[async_trait]
impl ProtocolAdapter for CompoundV2SupplyAdapter {
    fn protocol_id(&self) -> Protocol {
        Protocol::CompoundV2
    }

    fn product_id(&self) -> &str {
        "supply-market"
    }

    fn chain_id(&self) -> Chain {
        self.chain
    }

    async fn get_protocol_tokens(&self) -> Result<Vec<ProtocolTokenMetadata>, MetadataBuildError> {
        let comptroller = IComptroller::new(self.comptroller, Arc::clone(&self.provider));
        let markets: Vec<Address> = comptroller
            .get_all_markets()
            .call()
            .await
            .with_context(|| format!("getAllMarkets() failed on {:?}", self.comptroller))?;
        info!("Listing {} Compound V2 markets on {}", markets.len(), self.chain);

        let mut tokens = Vec::with_capacity(markets.len());
        for market in markets {
            let c_token = fetch_token_metadata(&self.provider, market).await?;

            // cETH has no underlying() getter; the native asset is reported
            // with the conventional sentinel address.
            let underlying = match CToken::new(market, Arc::clone(&self.provider))
                .underlying()
                .call()
                .await
            {
                Ok(asset) => fetch_token_metadata(&self.provider, asset).await?,
                Err(_) => {
                    debug!("Market {market:?} has no underlying(), assuming native ETH");
                    TokenMetadata {
                        address: NATIVE_ETH.to_string(),
                        name: "Ether".to_string(),
                        symbol: "ETH".to_string(),
                        decimals: 18,
                    }
                }
            };

            tokens.push(ProtocolTokenMetadata {
                token: c_token,
                underlying_tokens: vec![underlying],
            });
        }

        Ok(tokens)
    }
}
