use catalog_core::db::migrations::latest_version;
use catalog_core::db::open_db_in_memory;
use catalog_core::{
    Category, DataValidationError, Product, ProductRepository, ProductService, RepoError,
    SqliteProductRepository,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

fn sample_product() -> Product {
    Product::new(
        "Fedora",
        "A red hat",
        Decimal::from_str("12.50").unwrap(),
        true,
        Category::Cloths,
    )
}

#[test]
fn create_assigns_id_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = sample_product();
    let id = repo.create(&mut product).unwrap();

    assert_eq!(product.id, Some(id));

    let loaded = repo.find(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.name, "Fedora");
    assert_eq!(loaded.description, "A red hat");
    assert_eq!(loaded.price, Decimal::from_str("12.50").unwrap());
    assert!(loaded.available);
    assert_eq!(loaded.category, Category::Cloths);
}

#[test]
fn created_product_appears_in_all() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    assert!(repo.all().unwrap().is_empty());

    let mut product = sample_product();
    repo.create(&mut product).unwrap();

    let products = repo.all().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, product.id);
    assert_eq!(products[0].name, product.name);
}

#[test]
fn update_persists_fields_and_preserves_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = sample_product();
    let id = repo.create(&mut product).unwrap();

    product.description = "testing".to_string();
    product.price = Decimal::from_str("19.99").unwrap();
    product.available = false;
    product.category = Category::Tools;
    repo.update(&product).unwrap();

    assert_eq!(product.id, Some(id));

    let products = repo.all().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, Some(id));
    assert_eq!(products[0].description, "testing");
    assert_eq!(products[0].price, Decimal::from_str("19.99").unwrap());
    assert!(!products[0].available);
    assert_eq!(products[0].category, Category::Tools);
}

#[test]
fn update_without_id_is_a_contract_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let product = sample_product();
    let err = repo.update(&product).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(DataValidationError::EmptyId)
    ));
    assert_eq!(err.to_string(), "Update called with empty ID field");
}

#[test]
fn update_of_absent_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = sample_product();
    product.id = Some(999);

    let err = repo.update(&product).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(999)));
}

#[test]
fn delete_removes_row_and_leaves_others_intact() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut first = sample_product();
    let mut second = sample_product();
    second.name = "Bowler".to_string();
    let first_id = repo.create(&mut first).unwrap();
    let second_id = repo.create(&mut second).unwrap();

    repo.delete(first_id).unwrap();

    let remaining = repo.all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, Some(second_id));

    let err = repo.delete(first_id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == first_id));
}

#[test]
fn find_of_absent_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    assert!(repo.find(12345).unwrap().is_none());
}

#[test]
fn validation_failure_blocks_create() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut invalid = sample_product();
    invalid.name = String::new();

    let err = repo.create(&mut invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(invalid.id, None);
    assert!(repo.all().unwrap().is_empty());
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let service = ProductService::new(repo);

    let mut product = sample_product();
    let id = service.create(&mut product).unwrap();

    let fetched = service.find(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Fedora");

    service.delete(id).unwrap();
    assert!(service.all().unwrap().is_empty());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_products_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("products"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            price TEXT NOT NULL,
            available INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "products",
            column: "category"
        })
    ));
}

#[test]
fn corrupt_persisted_category_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let mut product = sample_product();
    let id = repo.create(&mut product).unwrap();

    conn.execute(
        "UPDATE products SET category = 'HATS' WHERE id = ?1;",
        [id],
    )
    .unwrap();

    let err = repo.find(id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
