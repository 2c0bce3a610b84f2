pub mod backend;
pub mod command;
pub mod discover;
pub mod runner;
pub mod status;
