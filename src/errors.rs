//! Error taxonomy for the metadata build pipeline.
//!
//! Fatal variants guarantee that no partial artifact or registry mutation was
//! persisted for the failing unit of work; earlier units committed in the same
//! run stay committed.

use crate::chains::Chain;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataBuildError {
    /// No RPC provider configured for a chain an adapter is registered on.
    /// Fatal for the run.
    #[error("no RPC provider configured for chain {0}")]
    ProviderMissing(Chain),

    /// The adapter has no metadata to contribute. Recovered locally by the
    /// orchestrator: the adapter is skipped and the run continues.
    #[error("adapter does not implement metadata generation")]
    NotImplemented,

    /// The payload contains address-shaped strings that are not in canonical
    /// EIP-55 checksum form. Carries every offending raw value so the operator
    /// can fix them in one pass. Aborts the run before any write for the
    /// offending artifact.
    #[error("metadata payload contains non-checksummed addresses: {}", .0.join(", "))]
    ChecksumViolation(Vec<String>),

    /// The registry source file does not match the shape the transformer
    /// knows how to edit. Fatal, no partial write.
    #[error("Incorrectly typed MetadataFiles: {0}")]
    StructuralMismatch(String),

    /// The registry source file could not be parsed at all. Fatal.
    #[error("failed to parse registry source file: {0}")]
    ParseFailure(String),

    #[error("failed to serialize metadata payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Adapter-internal failures (RPC errors, ABI decode errors, ...).
    #[error(transparent)]
    Adapter(#[from] anyhow::Error),
}
