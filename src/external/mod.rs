pub mod huggingface;
pub mod market_data;
pub mod mediastack;
pub mod news_provider;
pub mod sentiment_model;
pub mod yahoo;
