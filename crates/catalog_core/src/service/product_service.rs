//! Product use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD and lookup entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::product::{parse_price_text, Category, Product};
use crate::repo::product_repo::{ProductRepository, RepoResult};
use rust_decimal::Decimal;

/// Use-case service wrapper for product CRUD and lookup operations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new product and assigns its store-generated id.
    pub fn create(&self, product: &mut Product) -> RepoResult<i64> {
        self.repo.create(product)
    }

    /// Updates an existing product by its surrogate id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update(&self, product: &Product) -> RepoResult<()> {
        self.repo.update(product)
    }

    /// Deletes a product by id.
    pub fn delete(&self, id: i64) -> RepoResult<()> {
        self.repo.delete(id)
    }

    /// Lists every persisted product.
    pub fn all(&self) -> RepoResult<Vec<Product>> {
        self.repo.all()
    }

    /// Gets one product by id.
    pub fn find(&self, id: i64) -> RepoResult<Option<Product>> {
        self.repo.find(id)
    }

    /// Finds products by exact name match.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.repo.find_by_name(name)
    }

    /// Finds products by exact availability match.
    pub fn find_by_availability(&self, available: bool) -> RepoResult<Vec<Product>> {
        self.repo.find_by_availability(available)
    }

    /// Finds products by exact category match.
    pub fn find_by_category(&self, category: Category) -> RepoResult<Vec<Product>> {
        self.repo.find_by_category(category)
    }

    /// Finds products by exact decimal price match.
    pub fn find_by_price(&self, price: Decimal) -> RepoResult<Vec<Product>> {
        self.repo.find_by_price(price)
    }

    /// Finds products by a textual price.
    ///
    /// Some callers pass the price as quoted text; surrounding quotes and
    /// whitespace are stripped and the value is coerced to the decimal
    /// domain before comparison.
    pub fn find_by_price_text(&self, raw: &str) -> RepoResult<Vec<Product>> {
        let price = parse_price_text(raw)?;
        self.repo.find_by_price(price)
    }
}
