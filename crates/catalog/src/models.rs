use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub cost: Option<f64>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub retail_price: Option<f64>,
    /// Department name resolved through the `departments` join.
    pub department: Option<String>,
    pub sku: Option<String>,
    pub distribution_center_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    /// Maintained outside this service; returned as stored.
    pub product_count: i64,
}
