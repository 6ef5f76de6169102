//! Storefront catalog access.
//!
//! The page needs one product with its variants and images. Sources are tried
//! in order: a local snapshot file, the on-disk cache, the storefront GraphQL
//! endpoint. Whatever goes wrong, [`load_product`] hands back
//! [`Product::fallback`] so the page still renders and the CTA still has a
//! target.

use crate::cache::{cache_signature, load_cached_product, save_cached_product};
use crate::catalog::{Money, Product, ProductImage, SelectedOption, Variant};
use crate::config::LandingConfig;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Asks for up to 50 images so every color's shots come back, and the
/// variant's own image where one is set.
const PRODUCT_QUERY: &str = r#"
query LandingProduct($query: String!) {
  products(first: 1, query: $query) {
    nodes {
      id
      title
      handle
      images(first: 50) {
        nodes { id url altText width height }
      }
      variants(first: 50) {
        nodes {
          id
          availableForSale
          selectedOptions { name value }
          price { amount currencyCode }
          image { id url altText width height }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: QueryVariables<'a>,
}

#[derive(Debug, Serialize)]
struct QueryVariables<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<ProductsData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProductsData {
    products: Option<Connection<ProductNode>>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    handle: String,
    images: Option<Connection<ImageNode>>,
    variants: Option<Connection<VariantNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageNode {
    #[serde(default)]
    id: String,
    url: String,
    alt_text: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    #[serde(default)]
    available_for_sale: bool,
    #[serde(default)]
    selected_options: Vec<OptionNode>,
    price: MoneyNode,
    image: Option<ImageNode>,
}

#[derive(Debug, Deserialize)]
struct OptionNode {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyNode {
    amount: String,
    currency_code: String,
}

impl From<ImageNode> for ProductImage {
    fn from(node: ImageNode) -> Self {
        ProductImage {
            id: node.id,
            url: node.url,
            alt_text: node.alt_text,
            width: node.width,
            height: node.height,
        }
    }
}

impl From<VariantNode> for Variant {
    fn from(node: VariantNode) -> Self {
        Variant {
            id: node.id,
            available_for_sale: node.available_for_sale,
            price: Money {
                amount: node.price.amount,
                currency_code: node.price.currency_code,
            },
            selected_options: node
                .selected_options
                .into_iter()
                .map(|opt| SelectedOption::new(opt.name, opt.value))
                .collect(),
            image: node.image.map(ProductImage::from),
        }
    }
}

impl From<ProductNode> for Product {
    fn from(node: ProductNode) -> Self {
        // A missing variants connection (as opposed to an empty one) keeps the
        // fallback variant so the page can still sell something.
        let variants = match node.variants {
            Some(connection) => connection.nodes.into_iter().map(Variant::from).collect(),
            None => Product::fallback().variants,
        };
        let images = node
            .images
            .map(|connection| connection.nodes.into_iter().map(ProductImage::from).collect())
            .unwrap_or_default();
        Product {
            id: node.id,
            title: node.title,
            handle: node.handle,
            variants,
            images,
        }
    }
}

/// Parses a storefront GraphQL response body. `Ok(None)` when the query
/// matched no product.
pub fn parse_storefront_response(body: &str) -> Result<Option<Product>> {
    let response: GraphqlResponse =
        serde_json::from_str(body).context("storefront response is not valid JSON")?;
    let Some(data) = response.data else {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(anyhow!(
            "storefront returned no data: {}",
            if messages.is_empty() {
                "no error details".to_string()
            } else {
                messages.join("; ")
            }
        ));
    };
    if !response.errors.is_empty() {
        warn!(
            count = response.errors.len(),
            "Storefront returned partial data with errors"
        );
    }
    Ok(data
        .products
        .and_then(|connection| connection.nodes.into_iter().next())
        .map(Product::from))
}

pub fn load_snapshot(path: &Path) -> Result<Option<Product>> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog snapshot {}", path.display()))?;
    parse_storefront_response(&body)
        .with_context(|| format!("failed to parse catalog snapshot {}", path.display()))
}

pub fn fetch_product(config: &LandingConfig, endpoint: &str) -> Result<Option<Product>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
        .build()
        .context("failed to build storefront HTTP client")?;
    let payload = GraphqlRequest {
        query: PRODUCT_QUERY,
        variables: QueryVariables {
            query: &config.product_query,
        },
    };
    let mut request = client.post(endpoint).json(&payload);
    if let Some(token) = config.storefront_access_token.as_deref() {
        request = request.header(ACCESS_TOKEN_HEADER, token);
    }

    debug!(%endpoint, query = %config.product_query, "Querying storefront");
    let body = request
        .send()
        .with_context(|| format!("storefront request to {endpoint} failed"))?
        .error_for_status()
        .context("storefront rejected the request")?
        .text()
        .context("failed to read storefront response body")?;
    parse_storefront_response(&body)
}

/// Resolves the product for this page load. Never fails.
pub fn load_product(config: &LandingConfig) -> Product {
    match try_load_product(config) {
        Ok(Some(product)) => {
            info!(
                product = %product.id,
                variants = product.variants.len(),
                images = product.images.len(),
                "Loaded catalog product"
            );
            product
        }
        Ok(None) => {
            info!("No catalog product available; rendering fallback dataset");
            Product::fallback()
        }
        Err(err) => {
            warn!("Catalog unavailable; rendering fallback dataset: {err:#}");
            Product::fallback()
        }
    }
}

fn try_load_product(config: &LandingConfig) -> Result<Option<Product>> {
    if let Some(path) = config.snapshot_path.as_deref() {
        return load_snapshot(Path::new(path));
    }

    let Some(endpoint) = config.storefront_endpoint.as_deref() else {
        debug!("No storefront endpoint configured");
        return Ok(None);
    };

    let cache_dir = Path::new(&config.cache_dir);
    let signature = cache_signature(endpoint, &config.product_query);
    if let Some(product) =
        load_cached_product(cache_dir, &signature, config.catalog_cache_ttl_secs)
    {
        debug!(product = %product.id, "Using cached catalog product");
        return Ok(Some(product));
    }

    let product = fetch_product(config, endpoint)?;
    if let Some(product) = &product {
        if let Err(err) = save_cached_product(cache_dir, &signature, product) {
            warn!("Failed to cache catalog product: {err:#}");
        }
    }
    Ok(product)
}
