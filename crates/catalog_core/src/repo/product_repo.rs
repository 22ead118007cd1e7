//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and lookup APIs over the `products` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Product::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Validation runs before any write; a validation failure leaves the
//!   table untouched.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::product::{Category, DataValidationError, Product};
use rust_decimal::Decimal;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    price,
    available,
    category
FROM products";

const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "price",
    "available",
    "category",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DataValidationError),
    Db(DbError),
    NotFound(i64),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version}, expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DataValidationError> for RepoError {
    fn from(value: DataValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product CRUD and lookup operations.
pub trait ProductRepository {
    /// Inserts the entity as a new row and assigns the store-generated id.
    fn create(&self, product: &mut Product) -> RepoResult<i64>;
    /// Overwrites the row identified by `product.id` with in-memory state.
    fn update(&self, product: &Product) -> RepoResult<()>;
    /// Removes the row identified by `id`.
    fn delete(&self, id: i64) -> RepoResult<()>;
    /// Returns every persisted product in insertion (id) order.
    fn all(&self) -> RepoResult<Vec<Product>>;
    /// Returns the product with the given id, if any.
    fn find(&self, id: i64) -> RepoResult<Option<Product>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>>;
    fn find_by_availability(&self, available: bool) -> RepoResult<Vec<Product>>;
    fn find_by_category(&self, category: Category) -> RepoResult<Vec<Product>>;
    fn find_by_price(&self, price: Decimal) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps an already-bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   the latest migration known by this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   lacks the product storage shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !table_exists(conn, "products")? {
            return Err(RepoError::MissingRequiredTable("products"));
        }

        let columns = table_columns(conn, "products")?;
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|column| column == required) {
                return Err(RepoError::MissingRequiredColumn {
                    table: "products",
                    column: required,
                });
            }
        }

        Ok(Self { conn })
    }

    fn select_where(&self, predicate: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Product>> {
        let sql = format!("{PRODUCT_SELECT_SQL} {predicate} ORDER BY id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params)?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create(&self, product: &mut Product) -> RepoResult<i64> {
        product.validate()?;

        self.conn.execute(
            "INSERT INTO products (
                name,
                description,
                price,
                available,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price_to_db(product.price),
                bool_to_int(product.available),
                product.category.name(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        product.id = Some(id);
        Ok(id)
    }

    fn update(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;
        let id = product
            .id
            .ok_or(RepoError::Validation(DataValidationError::EmptyId))?;

        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                description = ?2,
                price = ?3,
                available = ?4,
                category = ?5
             WHERE id = ?6;",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price_to_db(product.price),
                bool_to_int(product.available),
                product.category.name(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn all(&self) -> RepoResult<Vec<Product>> {
        self.select_where("", [])
    }

    fn find(&self, id: i64) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.select_where("WHERE name = ?1", [name])
    }

    fn find_by_availability(&self, available: bool) -> RepoResult<Vec<Product>> {
        self.select_where("WHERE available = ?1", [bool_to_int(available)])
    }

    fn find_by_category(&self, category: Category) -> RepoResult<Vec<Product>> {
        self.select_where("WHERE category = ?1", [category.name()])
    }

    fn find_by_price(&self, price: Decimal) -> RepoResult<Vec<Product>> {
        self.select_where("WHERE price = ?1", [price_to_db(price)])
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let price_text: String = row.get("price")?;
    let price = Decimal::from_str(&price_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid price value `{price_text}` in products.price"))
    })?;

    let category_text: String = row.get("category")?;
    let category = Category::from_str(&category_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category value `{category_text}` in products.category"
        ))
    })?;

    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in products.available"
            )));
        }
    };

    let product = Product {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        description: row.get("description")?,
        price,
        available,
        category,
    };
    product.validate()?;
    Ok(product)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();

    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }

    Ok(columns)
}

// Prices are compared textually in SQL; normalizing strips trailing zeros so
// 9.99 and 9.990 land on the same stored representation.
fn price_to_db(price: Decimal) -> String {
    price.normalize().to_string()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
