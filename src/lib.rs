pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod enrollment;
pub mod progress;
pub mod quiz;
pub mod store;

#[cfg(test)]
pub mod testing;
