pub mod analyzer;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod scanner;
pub mod screens;
pub mod state;
pub mod store;
