pub mod config;
pub mod error;
pub mod event;
pub mod game;
pub mod indicator;
pub mod input;
pub mod market;
pub mod model;
pub mod prefs;
pub mod ui;
