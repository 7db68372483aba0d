use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close in a stock's recent history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Market data snapshot for a ticker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockInfo {
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub history: Vec<HistoryPoint>, // ascending by date
}
