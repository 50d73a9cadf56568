//! # Address Checksum Validator
//!
//! Metadata artifacts are consumed by case-sensitive lookups downstream, so
//! every address that ends up in a payload must be in canonical EIP-55
//! checksum form. This module walks an arbitrary JSON payload tree and
//! collects every address-shaped string that is not checksummed. The
//! orchestrator treats a non-empty result as a hard stop for the run.
//!
//! Pure, no side effects. All offending values are reported together so the
//! operator can fix an adapter in one pass instead of replaying the build per
//! address.

use ethers::types::Address;
use ethers::utils::to_checksum;
use serde_json::Value;
use std::collections::BTreeSet;

/// Recursively scans `payload` and returns every address-shaped string that is
/// not equal to its EIP-55 checksum form. Deterministically ordered, deduped.
/// Empty result means the payload is valid.
pub fn find_checksum_violations(payload: &Value) -> Vec<String> {
    let mut violations = BTreeSet::new();
    walk(payload, &mut violations);
    violations.into_iter().collect()
}

fn walk(value: &Value, violations: &mut BTreeSet<String>) {
    match value {
        Value::String(s) => {
            if looks_like_address(s) && !is_checksummed(s) {
                violations.insert(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, violations);
            }
        }
        Value::Object(map) => {
            // Map keys can carry addresses too (token address -> metadata).
            for (key, item) in map {
                if looks_like_address(key) && !is_checksummed(key) {
                    violations.insert(key.clone());
                }
                walk(item, violations);
            }
        }
        _ => {}
    }
}

/// `0x` followed by exactly 40 hex digits.
fn looks_like_address(s: &str) -> bool {
    let Some(hex) = s.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_checksummed(s: &str) -> bool {
    match s.parse::<Address>() {
        Ok(address) => to_checksum(&address, None) == s,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CHECKSUMMED: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
    const LOWERCASE: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

    #[test]
    fn accepts_checksummed_addresses() {
        let payload = json!({
            "protocolToken": { "address": CHECKSUMMED, "symbol": "WETH" },
        });
        assert!(find_checksum_violations(&payload).is_empty());
    }

    #[test]
    fn rejects_lowercase_addresses() {
        let payload = json!({ "address": LOWERCASE });
        assert_eq!(find_checksum_violations(&payload), vec![LOWERCASE.to_string()]);
    }

    #[test]
    fn collects_all_violations_across_nesting() {
        let other = "0x6b175474e89094c44da98b954eedeac495271d0f";
        let payload = json!({
            "tokens": [
                { "address": LOWERCASE },
                { "underlying": [{ "address": other }] },
            ],
            "ok": CHECKSUMMED,
        });
        let violations = find_checksum_violations(&payload);
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&LOWERCASE.to_string()));
        assert!(violations.contains(&other.to_string()));
    }

    #[test]
    fn checks_object_keys() {
        let payload = json!({ LOWERCASE: { "symbol": "WETH" } });
        assert_eq!(find_checksum_violations(&payload), vec![LOWERCASE.to_string()]);
    }

    #[test]
    fn ignores_non_address_strings() {
        let payload = json!({
            "name": "Wrapped Ether",
            "tx": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "short": "0x1234",
        });
        assert!(find_checksum_violations(&payload).is_empty());
    }
}
