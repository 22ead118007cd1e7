//! Product domain model.
//!
//! # Responsibility
//! - Define the `Product` entity and the closed `Category` enumeration.
//! - Provide the hand-rolled serialize/deserialize pair over JSON values.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first persistence.
//! - Validation messages below are an observable contract; do not reword.
//! - `deserialize` populates every field except `id`.

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type ValidationResult<T> = Result<T, DataValidationError>;

/// Validation failure raised before any persistence write.
///
/// The rendered message text is part of the observable contract and is
/// asserted verbatim by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    /// Required field absent (or present but empty).
    MissingField(&'static str),
    /// Boolean field carried a non-boolean JSON value.
    InvalidBoolean {
        field: &'static str,
        observed: &'static str,
    },
    /// Category value is not a known enumeration member name.
    InvalidAttribute(String),
    /// `update` was called on an entity that was never persisted.
    EmptyId,
    /// Structurally malformed input body.
    BadBody(String),
    /// Textual price input that does not parse as a decimal.
    InvalidPrice(String),
}

impl Display for DataValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Invalid product: missing {field}"),
            Self::InvalidBoolean { field, observed } => {
                write!(f, "Invalid type for boolean [{field}]: {observed}")
            }
            Self::InvalidAttribute(value) => write!(f, "Invalid attribute: {value}"),
            Self::EmptyId => write!(f, "Update called with empty ID field"),
            Self::BadBody(detail) => {
                write!(f, "Invalid product: body of request contained bad or no data {detail}")
            }
            Self::InvalidPrice(raw) => write!(f, "Invalid price: {raw}"),
        }
    }
}

impl Error for DataValidationError {}

/// Closed set of product classifications.
///
/// Symbolic names (`CLOTHS`, `FOOD`, ...) are the storage and wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    /// Every member, in declaration order. Useful for seeding and tests.
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Returns the symbolic member name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cloths => "CLOTHS",
            Self::Food => "FOOD",
            Self::Housewares => "HOUSEWARES",
            Self::Automotive => "AUTOMOTIVE",
            Self::Tools => "TOOLS",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = DataValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "UNKNOWN" => Ok(Self::Unknown),
            "CLOTHS" => Ok(Self::Cloths),
            "FOOD" => Ok(Self::Food),
            "HOUSEWARES" => Ok(Self::Housewares),
            "AUTOMOTIVE" => Ok(Self::Automotive),
            "TOOLS" => Ok(Self::Tools),
            other => Err(DataValidationError::InvalidAttribute(other.to_string())),
        }
    }
}

/// Product entity persisted by the catalog store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Store-assigned surrogate id; `None` means never persisted.
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    /// Exact decimal monetary value.
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Creates an unpersisted product (`id = None`).
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// Checks write-path invariants on the in-memory entity.
    ///
    /// Called by the repository before every insert/update, and on rows
    /// decoded from storage.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() {
            return Err(DataValidationError::MissingField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(DataValidationError::MissingField("description"));
        }
        Ok(())
    }

    /// Produces the structured representation of this product.
    ///
    /// `price` is rendered as a string to keep the decimal value exact;
    /// `category` is rendered as its symbolic name.
    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.name(),
        })
    }

    /// Populates entity fields from a structured representation.
    ///
    /// `id` is never assigned here. All fields are decoded before any is
    /// written, so a failed call leaves the entity untouched.
    ///
    /// # Errors
    /// - missing/empty `name` -> `Invalid product: missing name`
    /// - missing/empty `description` -> `Invalid product: missing description`
    /// - non-boolean `available` -> `Invalid type for boolean [available]: <kind>`
    /// - unknown `category` name -> `Invalid attribute: <value>`
    /// - other malformations -> missing-field or bad-data messages
    pub fn deserialize(&mut self, data: &Value) -> ValidationResult<()> {
        let map = data.as_object().ok_or_else(|| {
            DataValidationError::BadBody(format!("expected object, got {}", json_kind(data)))
        })?;

        let name = required_text(map, "name")?;
        let description = required_text(map, "description")?;
        let price = decode_price(map)?;
        let available = decode_available(map)?;
        let category = decode_category(map)?;

        self.name = name;
        self.description = description;
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(())
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{id}]>", self.name),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

/// Coerces a textual price into the decimal domain.
///
/// Callers sometimes pass prices as quoted text (`"9.99"` including the
/// quote characters); surrounding whitespace and double quotes are stripped
/// before parsing.
pub fn parse_price_text(raw: &str) -> ValidationResult<Decimal> {
    let cleaned = raw.trim().trim_matches('"').trim();
    Decimal::from_str(cleaned).map_err(|_| DataValidationError::InvalidPrice(raw.to_string()))
}

fn required_text(map: &Map<String, Value>, field: &'static str) -> ValidationResult<String> {
    let value = map
        .get(field)
        .ok_or(DataValidationError::MissingField(field))?;
    let text = value.as_str().ok_or_else(|| {
        DataValidationError::BadBody(format!("expected string for {field}, got {}", json_kind(value)))
    })?;
    if text.trim().is_empty() {
        return Err(DataValidationError::MissingField(field));
    }
    Ok(text.to_string())
}

fn decode_price(map: &Map<String, Value>) -> ValidationResult<Decimal> {
    let value = map
        .get("price")
        .ok_or(DataValidationError::MissingField("price"))?;
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => {
            return Err(DataValidationError::BadBody(format!(
                "expected decimal for price, got {}",
                json_kind(other)
            )))
        }
    };
    Decimal::from_str(text.trim())
        .map_err(|_| DataValidationError::BadBody(format!("invalid price `{text}`")))
}

fn decode_available(map: &Map<String, Value>) -> ValidationResult<bool> {
    let value = map
        .get("available")
        .ok_or(DataValidationError::MissingField("available"))?;
    match value {
        Value::Bool(flag) => Ok(*flag),
        other => Err(DataValidationError::InvalidBoolean {
            field: "available",
            observed: json_kind(other),
        }),
    }
}

fn decode_category(map: &Map<String, Value>) -> ValidationResult<Category> {
    let value = map
        .get("category")
        .ok_or(DataValidationError::MissingField("category"))?;
    let name = value.as_str().ok_or_else(|| {
        DataValidationError::BadBody(format!("expected string for category, got {}", json_kind(value)))
    })?;
    name.parse()
}

/// Stable JSON kind names used in type-mismatch messages.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
