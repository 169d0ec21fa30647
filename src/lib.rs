pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod model;
pub mod output;
pub mod ranking;
pub mod shell;
pub mod store;

#[cfg(test)]
mod tests;
