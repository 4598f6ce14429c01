pub mod config;
pub mod error;
pub mod export;
pub mod headers;
pub mod logging;
pub mod match_logs;
pub mod overview;
pub mod position;
pub mod rating;
pub mod repository;
pub mod season_data;
pub mod sheet;
pub mod state;
pub mod stats;
pub mod synthetic;
