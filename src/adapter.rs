//! # Protocol Adapter Trait
//!
//! This module defines the core abstraction for reading one protocol's
//! position metadata. Each supported protocol implements [`ProtocolAdapter`]
//! for every product it exposes on every chain it is deployed on; the build
//! orchestrator drives the registered adapters without knowing anything
//! protocol-specific.
//!
//! ## Capabilities
//!
//! An adapter contributes metadata through one of two capabilities:
//!
//! - `get_protocol_tokens()`: the common case, listing the protocol's tokens
//!   with their underlyings. The default `build_metadata()` wraps the result
//!   into a [`MetadataArtifact`] keyed by the adapter's identity.
//! - `build_metadata()`: overridden directly when the payload has a custom
//!   shape.
//!
//! Adapters with nothing to snapshot (protocols whose token set is dynamic)
//! return [`MetadataBuildError::NotImplemented`]; the orchestrator treats that
//! as "nothing to register" and moves on.

use crate::chains::Chain;
use crate::errors::MetadataBuildError;
use crate::key_builder::MetadataKey;
use crate::protocols::Protocol;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File key used by adapters that do not version their metadata files.
pub const DEFAULT_FILE_KEY: &str = "protocol-token";

/// Static metadata of one ERC-20 token, addresses in EIP-55 checksum form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// One protocol token together with the tokens underlying the position it
/// represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolTokenMetadata {
    #[serde(flatten)]
    pub token: TokenMetadata,
    #[serde(rename = "underlyingTokens")]
    pub underlying_tokens: Vec<TokenMetadata>,
}

/// One metadata snapshot ready to be persisted and registered.
#[derive(Debug, Clone)]
pub struct MetadataArtifact {
    pub key: MetadataKey,
    pub payload: Value,
}

/// The main trait for all protocol adapters.
///
/// Implementations must be `Send + Sync`; the orchestrator holds them behind
/// `Arc<dyn ProtocolAdapter>` and invokes them strictly sequentially.
#[async_trait]
pub trait ProtocolAdapter: Send + Sync {
    /// Protocol this adapter reads.
    fn protocol_id(&self) -> Protocol;

    /// Kebab-case product id, one adapter per product (`a-token`,
    /// `stable-debt-token`, ...).
    fn product_id(&self) -> &str;

    /// Chain this adapter instance is bound to.
    fn chain_id(&self) -> Chain;

    /// File key of the produced artifact. Override to version the metadata
    /// file when the payload shape changes.
    fn file_key(&self) -> &str {
        DEFAULT_FILE_KEY
    }

    /// Lists the protocol's tokens with their underlyings. The default
    /// declares the capability not implemented.
    async fn get_protocol_tokens(&self) -> Result<Vec<ProtocolTokenMetadata>, MetadataBuildError> {
        Err(MetadataBuildError::NotImplemented)
    }

    /// Produces the metadata snapshot for this adapter. The default wraps
    /// `get_protocol_tokens()`; adapters with a custom payload shape override
    /// this instead.
    async fn build_metadata(&self) -> Result<MetadataArtifact, MetadataBuildError> {
        let tokens = self.get_protocol_tokens().await?;
        Ok(MetadataArtifact {
            key: self.metadata_key(),
            payload: serde_json::to_value(tokens)?,
        })
    }

    /// Key identifying this adapter's artifact.
    fn metadata_key(&self) -> MetadataKey {
        MetadataKey::new(
            self.protocol_id(),
            self.product_id(),
            self.chain_id(),
            self.file_key(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unimplemented;

    #[async_trait]
    impl ProtocolAdapter for Unimplemented {
        fn protocol_id(&self) -> Protocol {
            Protocol::UniswapV3
        }
        fn product_id(&self) -> &str {
            "pool"
        }
        fn chain_id(&self) -> Chain {
            Chain::Ethereum
        }
    }

    #[tokio::test]
    async fn default_capability_is_not_implemented() {
        let err = Unimplemented.build_metadata().await.unwrap_err();
        assert!(matches!(err, MetadataBuildError::NotImplemented));
    }

    #[test]
    fn protocol_token_metadata_serializes_flat() {
        let token = ProtocolTokenMetadata {
            token: TokenMetadata {
                address: "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".into(),
                name: "Wrapped Ether".into(),
                symbol: "WETH".into(),
                decimals: 18,
            },
            underlying_tokens: vec![],
        };
        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(value["address"], "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        assert_eq!(value["underlyingTokens"], serde_json::json!([]));
    }
}
