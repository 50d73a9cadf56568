//! # Build Orchestrator
//!
//! Drives a full metadata build: iterates the registered adapters in their
//! fixed enumeration order (protocol registration order, then chain, then
//! adapter), applies the caller's protocol/chain filters, invokes each
//! adapter's metadata capability, gates the result on the address checksum
//! validator, and persists it through the writer and the registry transformer.
//!
//! Control flow is strictly sequential: no two adapter invocations, artifact
//! writes, or registry edits overlap, and the transformer re-reads the
//! registry file from disk for every artifact, so each edit sees the previous
//! one. A fatal error stops the run immediately; artifacts committed before
//! the failure stay committed, later adapters are never attempted.

use crate::adapter::ProtocolAdapter;
use crate::chains::Chain;
use crate::checksum_validator::find_checksum_violations;
use crate::errors::MetadataBuildError;
use crate::file_writer::SourceFormatter;
use crate::metadata_writer::MetadataWriter;
use crate::protocols::Protocol;
use crate::source_transformer::SourceTransformer;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Optional protocol/chain selectors. `None` means no filter.
#[derive(Debug, Clone, Default)]
pub struct BuildFilters {
    pub protocols: Option<HashSet<Protocol>>,
    pub chains: Option<HashSet<Chain>>,
}

impl BuildFilters {
    /// No filtering: every registered adapter runs.
    pub fn all() -> Self {
        Self::default()
    }

    fn matches(&self, protocol: Protocol, chain: Chain) -> bool {
        self.protocols.as_ref().map_or(true, |p| p.contains(&protocol))
            && self.chains.as_ref().map_or(true, |c| c.contains(&chain))
    }
}

/// Counters for one build run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Artifacts written and registered.
    pub written: usize,
    /// Adapters that declared NotImplemented.
    pub skipped: usize,
    /// Adapters excluded by the filters.
    pub filtered: usize,
}

pub struct BuildOrchestrator {
    adapters: Vec<Arc<dyn ProtocolAdapter>>,
    writer: MetadataWriter,
    transformer: SourceTransformer,
}

impl BuildOrchestrator {
    pub fn new(
        adapters: Vec<Arc<dyn ProtocolAdapter>>,
        output_root: &Path,
        registry_path: &Path,
        formatter: Arc<dyn SourceFormatter>,
    ) -> Self {
        Self {
            adapters,
            writer: MetadataWriter::new(output_root, Arc::clone(&formatter)),
            transformer: SourceTransformer::new(registry_path, formatter),
        }
    }

    /// Runs the build over every adapter matching `filters`.
    pub async fn run(&self, filters: &BuildFilters) -> Result<BuildSummary, MetadataBuildError> {
        let mut summary = BuildSummary::default();

        for adapter in &self.adapters {
            let protocol = adapter.protocol_id();
            let chain = adapter.chain_id();
            if !filters.matches(protocol, chain) {
                summary.filtered += 1;
                continue;
            }

            let artifact = match adapter.build_metadata().await {
                Ok(artifact) => artifact,
                Err(MetadataBuildError::NotImplemented) => {
                    debug!(%protocol, %chain, product = adapter.product_id(), "no metadata to build, skipping");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!(%protocol, %chain, product = adapter.product_id(), error = %e, "adapter failed, aborting run");
                    return Err(e);
                }
            };

            let violations = find_checksum_violations(&artifact.payload);
            if !violations.is_empty() {
                for value in &violations {
                    error!(%protocol, %chain, value = %value, "address is not in checksum form");
                }
                return Err(MetadataBuildError::ChecksumViolation(violations));
            }

            let path = self.writer.write(&artifact.key, &artifact.payload)?;
            self.transformer.register_artifact(&artifact.key)?;
            info!(%protocol, %chain, artifact = %path.display(), "✅ metadata artifact built");
            summary.written += 1;
        }

        info!(
            written = summary.written,
            skipped = summary.skipped,
            filtered = summary.filtered,
            "metadata build complete"
        );
        Ok(summary)
    }
}
