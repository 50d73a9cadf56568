//! End-to-end tests of the metadata build pipeline: mock adapters, a real
//! registry source file in a temp dir, and the full orchestrator loop.

use async_trait::async_trait;
use defi_metadata_sdk::adapter::{MetadataArtifact, ProtocolAdapter};
use defi_metadata_sdk::file_writer::DefaultFormatter;
use defi_metadata_sdk::{
    BuildFilters, BuildOrchestrator, Chain, MetadataBuildError, Protocol,
};
use serde_json::json;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const BASE_REGISTRY: &str = "\
import { Protocol } from './protocols'
import { Chain } from './core/constants/chains'
import { metadataKey } from './core/utils/metadataKey'

export const MetadataFiles = new Map<string, unknown>([])
";

const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
const DAI_LOWERCASE: &str = "0x6b175474e89094c44da98b954eedeac495271d0f";

struct MockAdapter {
    protocol: Protocol,
    product: &'static str,
    chain: Chain,
    payload: serde_json::Value,
    calls: Arc<AtomicUsize>,
    failure: Option<&'static str>,
}

impl MockAdapter {
    fn new(protocol: Protocol, product: &'static str, chain: Chain) -> Self {
        Self {
            protocol,
            product,
            chain,
            payload: json!([{ "address": WETH, "symbol": "WETH" }]),
            calls: Arc::new(AtomicUsize::new(0)),
            failure: None,
        }
    }

    fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    fn failing(mut self, message: &'static str) -> Self {
        self.failure = Some(message);
        self
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ProtocolAdapter for MockAdapter {
    fn protocol_id(&self) -> Protocol {
        self.protocol
    }

    fn product_id(&self) -> &str {
        self.product
    }

    fn chain_id(&self) -> Chain {
        self.chain
    }

    async fn build_metadata(&self) -> Result<MetadataArtifact, MetadataBuildError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.failure {
            return Err(MetadataBuildError::Adapter(anyhow::anyhow!(message)));
        }
        Ok(MetadataArtifact {
            key: self.metadata_key(),
            payload: self.payload.clone(),
        })
    }
}

struct Harness {
    _dir: tempfile::TempDir,
    root: PathBuf,
    registry: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let registry = root.join("metadataFiles.ts");
        fs::write(&registry, BASE_REGISTRY).unwrap();
        Self {
            _dir: dir,
            root,
            registry,
        }
    }

    fn orchestrator(&self, adapters: Vec<Arc<dyn ProtocolAdapter>>) -> BuildOrchestrator {
        BuildOrchestrator::new(adapters, &self.root, &self.registry, Arc::new(DefaultFormatter))
    }

    fn registry_text(&self) -> String {
        fs::read_to_string(&self.registry).unwrap()
    }

    fn artifact_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

fn protocol_filter(protocols: &[Protocol]) -> BuildFilters {
    BuildFilters {
        protocols: Some(protocols.iter().copied().collect::<HashSet<_>>()),
        chains: None,
    }
}

fn read_tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    fn visit(dir: &Path, root: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                visit(&path, root, out);
            } else {
                out.push((
                    path.strip_prefix(root).unwrap().to_path_buf(),
                    fs::read(&path).unwrap(),
                ));
            }
        }
    }
    let mut out = Vec::new();
    visit(root, root, &mut out);
    out.sort();
    out
}

#[tokio::test]
async fn full_build_writes_artifacts_and_registry() {
    let harness = Harness::new();
    let orchestrator = harness.orchestrator(vec![
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum)),
        Arc::new(MockAdapter::new(Protocol::CompoundV2, "supply-market", Chain::Ethereum)),
    ]);

    let summary = orchestrator.run(&BuildFilters::all()).await.unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 0);

    assert!(harness
        .artifact_path("adapters/aave-v2/products/a-token/metadata/ethereum.protocol-token.json")
        .is_file());
    assert!(harness
        .artifact_path(
            "adapters/compound-v2/products/supply-market/metadata/ethereum.protocol-token.json"
        )
        .is_file());

    let registry = harness.registry_text();
    assert!(registry.contains("AaveV2ATokenEthereumProtocolToken"));
    assert!(registry.contains("CompoundV2SupplyMarketEthereumProtocolToken"));
    assert!(registry.contains("productId: 'supply-market',"));
}

#[tokio::test]
async fn running_the_build_twice_is_byte_identical() {
    let harness = Harness::new();
    let adapters: Vec<Arc<dyn ProtocolAdapter>> = vec![
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum)),
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Polygon)),
        Arc::new(MockAdapter::new(Protocol::CompoundV2, "supply-market", Chain::Ethereum)),
    ];
    let orchestrator = harness.orchestrator(adapters);

    orchestrator.run(&BuildFilters::all()).await.unwrap();
    let first = read_tree(&harness.root);
    orchestrator.run(&BuildFilters::all()).await.unwrap();
    let second = read_tree(&harness.root);

    assert_eq!(first, second);
}

#[tokio::test]
async fn registration_order_does_not_change_the_registry() {
    let build = |reversed: bool| async move {
        let harness = Harness::new();
        let mut adapters: Vec<Arc<dyn ProtocolAdapter>> = vec![
            Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum)),
            Arc::new(MockAdapter::new(Protocol::UniswapV3, "pool-snapshot", Chain::Arbitrum)),
            Arc::new(MockAdapter::new(Protocol::CompoundV2, "supply-market", Chain::Ethereum)),
        ];
        if reversed {
            adapters.reverse();
        }
        let orchestrator = harness.orchestrator(adapters);
        orchestrator.run(&BuildFilters::all()).await.unwrap();
        harness.registry_text()
    };

    assert_eq!(build(false).await, build(true).await);
}

#[tokio::test]
async fn checksum_violation_aborts_without_writing() {
    let harness = Harness::new();
    let bad = MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum).with_payload(json!([
        { "address": DAI_LOWERCASE, "symbol": "DAI" },
    ]));
    let never_reached = MockAdapter::new(Protocol::CompoundV2, "supply-market", Chain::Ethereum);
    let never_reached_calls = never_reached.call_counter();

    let orchestrator = harness.orchestrator(vec![Arc::new(bad), Arc::new(never_reached)]);
    let err = orchestrator.run(&BuildFilters::all()).await.unwrap_err();

    match err {
        MetadataBuildError::ChecksumViolation(values) => {
            assert_eq!(values, vec![DAI_LOWERCASE.to_string()]);
        }
        other => panic!("expected ChecksumViolation, got {other:?}"),
    }
    assert!(!harness
        .artifact_path("adapters/aave-v2/products/a-token/metadata/ethereum.protocol-token.json")
        .exists());
    assert_eq!(harness.registry_text(), BASE_REGISTRY);
    assert_eq!(never_reached_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn protocol_filter_limits_writes_across_all_chains() {
    let harness = Harness::new();
    let filtered_out = MockAdapter::new(Protocol::CompoundV2, "supply-market", Chain::Ethereum);
    let filtered_calls = filtered_out.call_counter();
    let orchestrator = harness.orchestrator(vec![
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum)),
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Polygon)),
        Arc::new(filtered_out),
    ]);

    let summary = orchestrator
        .run(&protocol_filter(&[Protocol::AaveV2]))
        .await
        .unwrap();
    assert_eq!(summary.written, 2);
    assert_eq!(summary.filtered, 1);

    assert_eq!(filtered_calls.load(Ordering::SeqCst), 0);
    let registry = harness.registry_text();
    assert!(!registry.contains("CompoundV2"));
    assert!(!harness.artifact_path("adapters/compound-v2").exists());
}

#[tokio::test]
async fn not_implemented_adapters_are_skipped() {
    struct NoMetadata;

    #[async_trait]
    impl ProtocolAdapter for NoMetadata {
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

    let harness = Harness::new();
    let orchestrator = harness.orchestrator(vec![
        Arc::new(NoMetadata),
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum)),
    ]);

    let summary = orchestrator.run(&BuildFilters::all()).await.unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.written, 1);
    assert!(!harness.registry_text().contains("UniswapV3"));
}

#[tokio::test]
async fn failure_mid_run_preserves_earlier_commits_and_stops() {
    let harness = Harness::new();
    let third = MockAdapter::new(Protocol::UniswapV3, "pool-snapshot", Chain::Ethereum)
        .failing("rpc exploded");
    let fourth = MockAdapter::new(Protocol::Stargate, "pool", Chain::Ethereum);
    let fourth_calls = fourth.call_counter();

    let orchestrator = harness.orchestrator(vec![
        Arc::new(MockAdapter::new(Protocol::AaveV2, "a-token", Chain::Ethereum)),
        Arc::new(MockAdapter::new(Protocol::CompoundV2, "supply-market", Chain::Ethereum)),
        Arc::new(third),
        Arc::new(fourth),
    ]);

    let err = orchestrator.run(&BuildFilters::all()).await.unwrap_err();
    assert!(matches!(err, MetadataBuildError::Adapter(_)));

    // Adapters 1-2 stay committed.
    let registry = harness.registry_text();
    assert!(registry.contains("AaveV2ATokenEthereumProtocolToken"));
    assert!(registry.contains("CompoundV2SupplyMarketEthereumProtocolToken"));
    assert!(harness
        .artifact_path("adapters/aave-v2/products/a-token/metadata/ethereum.protocol-token.json")
        .is_file());

    // Adapter 4 is never attempted.
    assert_eq!(fourth_calls.load(Ordering::SeqCst), 0);
    assert!(!registry.contains("Stargate"));
}

#[tokio::test]
async fn structural_damage_to_the_registry_is_fatal_and_non_destructive() {
    let harness = Harness::new();
    let broken = BASE_REGISTRY.replace("new Map<string, unknown>([])", "buildIndex()");
    fs::write(&harness.registry, &broken).unwrap();

    let orchestrator = harness.orchestrator(vec![Arc::new(MockAdapter::new(
        Protocol::AaveV2,
        "a-token",
        Chain::Ethereum,
    ))]);

    let err = orchestrator.run(&BuildFilters::all()).await.unwrap_err();
    assert!(matches!(err, MetadataBuildError::StructuralMismatch(_)));
    assert_eq!(harness.registry_text(), broken);
}
