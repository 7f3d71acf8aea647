//! Covid-19 Case Prediction API Library

pub mod audit;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod model;

pub use config::ApiConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
