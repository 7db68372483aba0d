mod analysis;
mod news;
mod sentiment;
mod stock;

pub use analysis::AnalysisResult;
pub use news::{NewsItem, NewsQueryParams};
pub use sentiment::{
    AggregateResult, AverageScoresRequest, LabelScore, ScoreTextRequest, ScoringText,
    SentimentClass, SentimentLabel, SentimentScores,
};
pub use stock::{HistoryPoint, StockInfo};
