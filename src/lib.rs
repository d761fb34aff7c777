pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;
pub mod utils;
