use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A backend collection the console can list and mutate.
///
/// The backend owns identity: ids are assigned server-side and never
/// changed from the console.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + PartialEq + fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Singular, lower-case noun used in log lines and messages.
    const NOUN: &'static str;

    /// Path of the admin collection; member paths append `/<id>`.
    const COLLECTION_PATH: &'static str;

    /// Path the list is fetched from.
    const LIST_PATH: &'static str = Self::COLLECTION_PATH;

    fn id(&self) -> &Self::Id;

    fn member_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::COLLECTION_PATH, id)
    }
}

/// Nullable text column read as a plain string; `null` becomes `""`.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(d).map(Option::unwrap_or_default)
}

// ── Customers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Customer {
    type Id = i64;
    const NOUN: &'static str = "customer";
    const COLLECTION_PATH: &'static str = "/admin/api/customers";

    fn id(&self) -> &i64 {
        &self.id
    }
}

/// Body of a customer create call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Id,
    Name,
    Email,
    Phone,
}

impl CustomerField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for CustomerField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            _ => Err(format!("Invalid customer field: {}", s)),
        }
    }
}

// ── Orders ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub customer_phone: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub pickup_date: Option<String>,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Order {
    type Id = String;
    const NOUN: &'static str = "order";
    const COLLECTION_PATH: &'static str = "/admin/api/orders";

    fn id(&self) -> &String {
        &self.id
    }
}

/// The only fields an admin may change on an existing order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub pickup_date: Option<String>,
    pub total: f64,
    pub special_instructions: Option<String>,
}

/// The admin-mutable fields as echoed back by an order update.
///
/// Each text field is absent (`None`), explicitly cleared (`Some(None)`)
/// or set (`Some(Some(_))`). Absent fields leave the local order alone.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEcho {
    pub total: f64,
    pub pickup_date: Option<Option<String>>,
    pub special_instructions: Option<Option<String>>,
}

impl OrderEcho {
    /// Pull the mutable fields out of a backend echo.
    ///
    /// Returns `None` when the echo lacks a numeric `total`, which means
    /// there is nothing trustworthy to patch with.
    pub fn parse(echo: &serde_json::Value) -> Option<Self> {
        let total = echo.get("total")?.as_f64()?;
        let text = |key: &str| match echo.get(key)? {
            serde_json::Value::Null => Some(None),
            serde_json::Value::String(s) => Some(Some(s.clone())),
            _ => None,
        };
        Some(Self {
            total,
            pickup_date: text("pickupDate"),
            special_instructions: text("specialInstructions"),
        })
    }

    pub fn apply_to(&self, order: &mut Order) {
        order.total = self.total;
        if let Some(date) = &self.pickup_date {
            order.pickup_date = date.clone();
        }
        if let Some(text) = &self.special_instructions {
            order.special_instructions = text.clone();
        }
    }
}

impl From<&Order> for OrderUpdate {
    fn from(order: &Order) -> Self {
        Self {
            pickup_date: order.pickup_date.clone(),
            total: order.total,
            special_instructions: order.special_instructions.clone(),
        }
    }
}

/// Body of an order create call (public order intake endpoint).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: String,
    pub total: f64,
    #[serde(default)]
    pub pickup_date: String,
    #[serde(default)]
    pub special_instructions: String,
}

/// Path of the public order intake endpoint.
pub const ORDER_INTAKE_PATH: &str = "/api/orders";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Id,
    CustomerName,
    CustomerPhone,
    Service,
    PickupDate,
    Total,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CustomerName => "customerName",
            Self::CustomerPhone => "customerPhone",
            Self::Service => "service",
            Self::PickupDate => "pickupDate",
            Self::Total => "total",
        }
    }
}

impl FromStr for OrderField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "customerName" | "customer_name" | "customer" => Ok(Self::CustomerName),
            "customerPhone" | "customer_phone" | "phone" => Ok(Self::CustomerPhone),
            "service" => Ok(Self::Service),
            "pickupDate" | "pickup_date" | "pickup" => Ok(Self::PickupDate),
            "total" => Ok(Self::Total),
            _ => Err(format!("Invalid order field: {}", s)),
        }
    }
}

// ── Services ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default = "default_service_status")]
    pub status: String,
    #[serde(default)]
    pub usage_count: i64,
}

fn default_service_status() -> String {
    "Active".to_string()
}

impl Resource for Service {
    type Id = String;
    const NOUN: &'static str = "service";
    const COLLECTION_PATH: &'static str = "/admin/api/services";
    const LIST_PATH: &'static str = "/api/services";

    fn id(&self) -> &String {
        &self.id
    }
}

/// Body of a service create call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewService {
    pub name: String,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Body of a service update call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceUpdate {
    pub name: String,
    pub price: f64,
    pub duration: Option<String>,
    pub status: String,
}

impl From<&Service> for ServiceUpdate {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            price: service.price,
            duration: service.duration.clone(),
            status: service.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceField {
    Id,
    Name,
    Price,
    Duration,
    Status,
    UsageCount,
}

impl ServiceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Duration => "duration",
            Self::Status => "status",
            Self::UsageCount => "usage_count",
        }
    }
}

impl FromStr for ServiceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "duration" => Ok(Self::Duration),
            "status" => Ok(Self::Status),
            "usage_count" | "usage" => Ok(Self::UsageCount),
            _ => Err(format!("Invalid service field: {}", s)),
        }
    }
}
