pub mod cli;
pub mod client;
pub mod config;
pub mod session;

#[cfg(test)]
pub mod testing;
