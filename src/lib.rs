pub mod config;
pub mod database;
pub mod errors;
pub mod image_assets;
pub mod models;
pub mod repositories;
pub mod services;
pub mod web;
