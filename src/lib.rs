pub mod config;
pub mod error;
pub mod gui;
pub mod player;
pub mod sync;
