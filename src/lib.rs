pub mod app;
pub mod browser;
pub mod command;
pub mod config;
pub mod debounce;
pub mod models;
pub mod tmdb;
pub mod view;
