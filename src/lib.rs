pub mod cli;
pub mod commands;
pub mod mendel;
pub mod trio;
pub mod utils;
