pub mod auth;
pub mod config;
pub mod error;
pub mod ids;
pub mod profile;
pub mod recipes;
pub mod state;
pub mod storage;
pub mod view;
