//! Meta assembly error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Asset metadata lookup failed for {asset}: {reason}")]
    AssetMetadata { asset: String, reason: String },

    #[error("Price lookup failed for {target}: {reason}")]
    PriceLookup { target: String, reason: String },

    #[error("Price feed returned no price for asset {0}")]
    MissingAssetPrice(String),
}

pub type Result<T> = std::result::Result<T, MetaError>;
