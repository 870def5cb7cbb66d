pub mod app;
pub mod clipboard;
pub mod cli;
pub mod color;
pub mod config;
pub mod dataset;
pub mod filter;
pub mod logging;
pub mod model;
pub mod output;
pub mod quiz;
pub mod roster;
pub mod runner;
pub mod state;
pub mod urlstate;

#[cfg(test)]
mod tests;
