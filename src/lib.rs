//! # DeFi Metadata SDK
//!
//! A Rust library for per-protocol DeFi position adapters, plus the developer
//! tooling that keeps the hand-maintained adapter registry and its cached
//! metadata artifacts consistent.
//!
//! ## Overview
//!
//! Each protocol adapter knows how to read one protocol's position-token
//! metadata from contract state. The build subsystem turns those reads into
//! durable artifacts:
//!
//! - **Adapters**: per-(protocol, product, chain) readers exposing a metadata
//!   capability
//! - **Build pipeline**: snapshots each adapter's metadata to a canonical JSON
//!   artifact
//! - **Registry synchronization**: idempotently rewrites the registry source
//!   file that imports and indexes every artifact, without corrupting the
//!   hand-written code around it
//!
//! ## Architecture
//!
//! ### Symbol Tables
//! `Protocol` and `Chain` are closed enumerations with stable symbolic keys;
//! generated registry entries reference them by name, never by literal value.
//!
//! ### Derivation Layer
//! `MetadataKey` derives an artifact path and an import identifier as pure,
//! byte-stable functions of (protocol, product, chain, fileKey).
//!
//! ### Build & Synchronization Layer
//! The orchestrator runs adapters sequentially, gates every payload on the
//! EIP-55 checksum validator, writes artifacts atomically, and patches the
//! registry source file through a statement-level document model with
//! deterministic entry ordering. Running the build twice yields byte-identical
//! output.

// Symbol Tables
/// Chain enumeration with stable symbolic keys
pub mod chains;
/// Protocol enumeration with stable symbolic keys
pub mod protocols;

// Core Types
/// Trait for protocol metadata adapters
pub mod adapter;
/// Metadata key and derived path/identifier construction
pub mod key_builder;

// Protocol Adapters
/// Protocol-specific adapters (Aave V2, Compound V2, ...)
pub mod adapters;

// Build & Synchronization
/// EIP-55 address checksum gate
pub mod checksum_validator;
/// Shared write-and-format pass with atomic persistence
pub mod file_writer;
/// Metadata artifact serialization
pub mod metadata_writer;
/// Main build orchestrator
pub mod orchestrator;
/// Registry source file transformer
pub mod source_transformer;

// Infrastructure
/// Error taxonomy
pub mod errors;
/// Configuration management
pub mod settings;

// Contracts (Public ABIs Only)
/// Smart contract ABIs (read-only)
pub mod contracts;

// Re-exports for convenience
pub use adapter::ProtocolAdapter;
pub use chains::Chain;
pub use errors::MetadataBuildError;
pub use key_builder::MetadataKey;
pub use orchestrator::{BuildFilters, BuildOrchestrator, BuildSummary};
pub use protocols::Protocol;
pub use settings::Settings;
pub use source_transformer::SourceTransformer;
