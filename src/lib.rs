//! Reaction resolution and mixture-state engine for a virtual chemistry lab.

pub mod api;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod lab;
pub mod models;
pub mod render;
pub mod store;
