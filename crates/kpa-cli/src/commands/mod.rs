pub mod config;
pub mod decide;
