//! Document types shared by the integration tests.

use chrono::{DateTime, Utc};
use docket::{
    stmt::{Primitive, Type, Value, ValueEnum},
    Document, MappingBuilder, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub active: bool,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    pub zip_code: String,
}

impl Document for User {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl User {
    pub fn new(name: &str, age: i32) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            age,
            active: true,
            email: None,
            tags: vec![],
            address: Address {
                city: "Springfield".to_string(),
                zip_code: "00000".to_string(),
            },
        }
    }

    pub fn tagged(mut self, tags: &[&str]) -> User {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    pub fn in_city(mut self, city: &str) -> User {
        self.address.city = city.to_string();
        self
    }
}

/// Uses optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub balance: i64,
}

impl Document for Account {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn configure(mapping: &mut MappingBuilder) {
        mapping.use_optimistic_concurrency(true);
    }
}

/// Soft-deleted, keyed by a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub number: String,
    pub amount: f64,
    pub issued_at: DateTime<Utc>,
}

impl Document for Invoice {
    type Id = String;

    fn id(&self) -> String {
        self.number.clone()
    }

    fn configure(mapping: &mut MappingBuilder) {
        mapping.identity("number").soft_deleted();
    }
}

impl Invoice {
    pub fn new(number: &str, amount: f64) -> Invoice {
        Invoice {
            number: number.to_string(),
            amount,
            issued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Shipped,
    Delivered,
}

impl Primitive for Status {
    fn ty() -> Type {
        Type::Enum
    }

    fn into_value(self) -> Value {
        let (name, discriminant) = match self {
            Status::Pending => ("Pending", 0),
            Status::Shipped => ("Shipped", 1),
            Status::Delivered => ("Delivered", 2),
        };
        Value::Enum(ValueEnum::new(name, discriminant))
    }

    fn load(value: Value) -> Result<Self> {
        match value.as_str() {
            Some("Pending") => Ok(Status::Pending),
            Some("Shipped") => Ok(Status::Shipped),
            Some("Delivered") => Ok(Status::Delivered),
            _ => Err(docket::Error::type_conversion(value, "Status")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub status: Status,
    pub total: f64,
    pub quantity: i64,
}

impl Document for Order {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }

    fn configure(mapping: &mut MappingBuilder) {
        mapping.alias("purchase_order");
    }
}

/// One member of each numeric and temporal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: String,
    pub price: Decimal,
    pub stock: i64,
    pub weight: f64,
    pub restocked_at: DateTime<Utc>,
}

impl Document for Product {
    type Id = String;

    fn id(&self) -> String {
        self.sku.clone()
    }

    fn configure(mapping: &mut MappingBuilder) {
        mapping.identity("sku");
    }
}
