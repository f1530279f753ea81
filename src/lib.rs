// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod tenant;
pub mod utils;

pub use routes::create_router;
