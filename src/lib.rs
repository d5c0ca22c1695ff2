pub mod app;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod output;
pub mod paginator;
pub mod session;
pub mod shell;

#[cfg(test)]
mod tests;
