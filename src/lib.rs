pub mod app;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
mod routes;
pub mod services;
pub mod state;
