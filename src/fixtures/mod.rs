//! Fixtures
//!
//! YAML fixture sets: `products/<set>.yml` holds the catalog and
//! `policies/<set>.yml` the store configuration.

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    config::StoreConfig,
    fixtures::{policies::PoliciesFixture, products::ProductsFixture},
    promotions::PromotionError,
    schedule::ScheduleError,
};

pub mod policies;
pub mod products;

pub use products::reference_catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid weekday name
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The product list is empty
    #[error("No products in fixture; currency unknown")]
    NoProducts,

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Invalid promotion settings
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Invalid timer settings
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog loaded from `products/`
    catalog: Option<Catalog<'static>>,

    /// Config loaded from `policies/`, defaults until loaded
    config: StoreConfig,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            config: StoreConfig::default(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is
    /// malformed, or the products do not share a currency.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        let catalog = catalog_from_str(&contents)?;

        debug!(path = %file_path.display(), products = catalog.len(), "loaded products");

        self.catalog = Some(catalog);

        Ok(self)
    }

    /// Load policies from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a value is
    /// out of range.
    pub fn load_policies(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("policies").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.config = config_from_str(&contents)?;

        debug!(path = %file_path.display(), "loaded policies");

        Ok(self)
    }

    /// Load a complete fixture set (products and policies with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_policies(name)?;

        Ok(fixture)
    }

    /// Loaded catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoProducts`] if no products were loaded.
    pub fn catalog(&self) -> Result<&Catalog<'static>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// Loaded store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a products fixture document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or describes an invalid catalog.
pub fn catalog_from_str(yaml: &str) -> Result<Catalog<'static>, FixtureError> {
    let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

    fixture.into_catalog()
}

/// Parse a policies fixture document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a value is out of range.
pub fn config_from_str(yaml: &str) -> Result<StoreConfig, FixtureError> {
    let fixture: PoliciesFixture = serde_norway::from_str(yaml)?;

    fixture.try_into()
}
