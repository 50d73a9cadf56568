//! # Metadata Key Builder
//!
//! A [`MetadataKey`] uniquely identifies one metadata artifact as
//! (protocol, product, chain, file key). From it we derive two things, both as
//! pure functions of the key:
//!
//! - the artifact's relative path:
//!   `adapters/<protocolId>/products/<productId>/metadata/<chainName>.<fileKey>.json`
//! - the generated import identifier:
//!   `<ProtocolKey><PascalProductId><ChainKey><PascalFileKey>`
//!
//! Both derivations are byte-stable across runs and machines. That stability
//! is what makes the source transformer's duplicate detection reliable: an
//! artifact is "already registered" exactly when an import binds the same
//! identifier.

use crate::chains::Chain;
use crate::protocols::Protocol;
use std::path::PathBuf;

/// Identifies one metadata artifact. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataKey {
    pub protocol_id: Protocol,
    pub product_id: String,
    pub chain_id: Chain,
    pub file_key: String,
}

impl MetadataKey {
    pub fn new(
        protocol_id: Protocol,
        product_id: impl Into<String>,
        chain_id: Chain,
        file_key: impl Into<String>,
    ) -> Self {
        Self {
            protocol_id,
            product_id: product_id.into(),
            chain_id,
            file_key: file_key.into(),
        }
    }

    /// Relative path of the artifact file, rooted at the build output
    /// directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from("adapters")
            .join(self.protocol_id.id())
            .join("products")
            .join(&self.product_id)
            .join("metadata")
            .join(format!("{}.{}.json", self.chain_id.name(), self.file_key))
    }

    /// Path as written in the generated import statement, relative to the
    /// registry source file. Always forward slashes, independent of the host
    /// platform.
    pub fn import_path(&self) -> String {
        format!(
            "./adapters/{}/products/{}/metadata/{}.{}.json",
            self.protocol_id.id(),
            self.product_id,
            self.chain_id.name(),
            self.file_key,
        )
    }

    /// Generated import identifier bound to this artifact in the registry
    /// source file. Unique per key: protocol and chain keys are bijective and
    /// the pascal-cased product/file segments preserve their word boundaries.
    pub fn identifier(&self) -> String {
        format!(
            "{}{}{}{}",
            self.protocol_id.key(),
            pascal_case(&self.product_id),
            self.chain_id.key(),
            pascal_case(&self.file_key),
        )
    }
}

/// Converts a kebab-case id to PascalCase: `stable-debt-token-v2` ->
/// `StableDebtTokenV2`. Non-alphanumeric characters act as word separators.
pub fn pascal_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = true;
    for ch in input.chars() {
        if !ch.is_ascii_alphanumeric() {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
