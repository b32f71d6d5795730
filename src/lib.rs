//! Drop, create, seed and query a small car-rental schema from an interactive menu.

pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod executor;
pub mod logger;
pub mod menu;
pub mod script;
