//! On-disk cache for the storefront product response.
//!
//! One JSON file per storefront query under the configured cache directory,
//! named by a SHA-256 of the query signature. Entries older than the TTL or
//! written by another cache revision are ignored.

use crate::catalog::Product;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const CATALOG_CACHE_REV: &str = "catalog-cache-v1";

#[derive(Debug, Serialize, Deserialize)]
struct CachedProduct {
    rev: String,
    generated_unix_secs: u64,
    signature: String,
    product: Product,
}

pub fn cache_signature(endpoint: &str, product_query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(CATALOG_CACHE_REV.as_bytes());
    hasher.update(endpoint.trim().as_bytes());
    hasher.update([0u8]);
    hasher.update(product_query.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn cache_path(cache_dir: &Path, signature: &str) -> PathBuf {
    cache_dir.join("catalog").join(format!("{signature}.json"))
}

pub fn load_cached_product(cache_dir: &Path, signature: &str, ttl_secs: u64) -> Option<Product> {
    let path = cache_path(cache_dir, signature);
    let contents = fs::read_to_string(&path).ok()?;
    let parsed: CachedProduct = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(path = %path.display(), "Ignoring unreadable catalog cache: {err}");
            return None;
        }
    };
    if parsed.rev != CATALOG_CACHE_REV || parsed.signature != signature {
        return None;
    }
    let age = now_unix_secs().saturating_sub(parsed.generated_unix_secs);
    if age > ttl_secs {
        debug!(age, ttl_secs, "Catalog cache is stale");
        return None;
    }
    Some(parsed.product)
}

pub fn save_cached_product(cache_dir: &Path, signature: &str, product: &Product) -> Result<()> {
    let path = cache_path(cache_dir, signature);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let payload = CachedProduct {
        rev: CATALOG_CACHE_REV.to_string(),
        generated_unix_secs: now_unix_secs(),
        signature: signature.to_string(),
        product: product.clone(),
    };
    let serialized =
        serde_json::to_string_pretty(&payload).context("failed to serialize catalog cache")?;
    fs::write(&path, serialized).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
