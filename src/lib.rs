pub mod config;
pub mod credentials;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod pages;
pub mod ui;
pub mod view;

#[cfg(test)]
mod testing;
