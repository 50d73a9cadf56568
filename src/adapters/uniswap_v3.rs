use async_trait::async_trait;

use crate::adapter::ProtocolAdapter;
use crate::chains::Chain;
use crate::protocols::Protocol;

/// Chains Uniswap V3 is registered on.
pub const UNISWAP_V3_CHAINS: [Chain; 5] = [
    Chain::Ethereum,
    Chain::Optimism,
    Chain::Polygon,
    Chain::Base,
    Chain::Arbitrum,
];

/// Uniswap V3 pools are discovered at runtime from factory events; there is no
/// static token set to snapshot. The adapter stays registered so position
/// reads work, but it declares the metadata capability not implemented and the
/// build pipeline skips it.
#[derive(Debug, Clone, Copy)]
pub struct UniswapV3PoolAdapter {
    chain: Chain,
}

impl UniswapV3PoolAdapter {
    pub fn new(chain: Chain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProtocolAdapter for UniswapV3PoolAdapter {
    fn protocol_id(&self) -> Protocol {
        Protocol::UniswapV3
    }

    fn product_id(&self) -> &str {
        "pool"
    }

    fn chain_id(&self) -> Chain {
        self.chain
    }
}
