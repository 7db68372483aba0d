pub mod aggregation_service;
pub mod analysis_service;
pub mod sentiment_service;
pub mod stock_service;
