//! # Metadata Artifact Writer
//!
//! Persists one metadata payload to its canonical on-disk artifact: pretty
//! JSON, 2-space indent, UTF-8, object keys in sorted order (the default
//! `serde_json::Map` is BTreeMap-backed). Writing the same payload twice
//! produces byte-identical output, which keeps build diffs reviewable.

use crate::errors::MetadataBuildError;
use crate::file_writer::{write_and_format, SourceFormatter};
use crate::key_builder::MetadataKey;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub struct MetadataWriter {
    output_root: PathBuf,
    formatter: Arc<dyn SourceFormatter>,
}

impl MetadataWriter {
    pub fn new(output_root: impl Into<PathBuf>, formatter: Arc<dyn SourceFormatter>) -> Self {
        Self {
            output_root: output_root.into(),
            formatter,
        }
    }

    /// Absolute path of the artifact for `key`.
    pub fn artifact_path(&self, key: &MetadataKey) -> PathBuf {
        self.output_root.join(key.relative_path())
    }

    /// Serializes `payload` and persists it through the shared
    /// write-and-format pass. The full content is generated before any
    /// filesystem write. Returns the artifact path.
    pub fn write(&self, key: &MetadataKey, payload: &Value) -> Result<PathBuf, MetadataBuildError> {
        let path = self.artifact_path(key);
        let rendered = serde_json::to_string_pretty(payload)?;
        write_and_format(&path, &rendered, self.formatter.as_ref())?;
        Ok(path)
    }
}

impl std::fmt::Debug for MetadataWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataWriter")
            .field("output_root", &self.output_root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::Chain;
    use crate::file_writer::DefaultFormatter;
    use crate::protocols::Protocol;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn writer(root: &Path) -> MetadataWriter {
        MetadataWriter::new(root, Arc::new(DefaultFormatter))
    }

    #[test]
    fn writes_to_derived_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer(dir.path());
        let key = MetadataKey::new(Protocol::AaveV2, "a-token", Chain::Ethereum, "protocol-token");
        let path = writer.write(&key, &json!([{ "symbol": "aWETH" }])).unwrap();
        assert_eq!(
            path,
            dir.path()
                .join("adapters/aave-v2/products/a-token/metadata/ethereum.protocol-token.json")
        );
        assert!(path.is_file());
    }

    #[test]
    fn repeated_writes_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer(dir.path());
        let key = MetadataKey::new(Protocol::CompoundV2, "pool", Chain::Ethereum, "protocol-token");
        let payload = json!({ "b": 2, "a": 1, "nested": { "z": [1, 2], "y": null } });

        let path = writer.write(&key, &payload).unwrap();
        let first = fs::read(&path).unwrap();
        writer.write(&key, &payload).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_uses_two_space_indent_and_sorted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let writer = writer(dir.path());
        let key = MetadataKey::new(Protocol::AaveV3, "a-token", Chain::Polygon, "protocol-token");
        let path = writer.write(&key, &json!({ "b": 2, "a": 1 })).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n  \"a\": 1,\n  \"b\": 2\n}\n");
    }
}
