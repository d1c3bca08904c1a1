use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Cancelled,
}

#[derive(Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: u64,
    pub status: OrderStatus,
    pub note: NullString,
    pub lines: Vec<OrderLine>,
    pub coupon: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    #[serde(rename = "unitPrice")]
    pub unit_price: f64,
}

#[derive(Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
