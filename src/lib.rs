pub mod app_state;
pub mod auth;
pub mod collaborators;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub mod test_utils;
