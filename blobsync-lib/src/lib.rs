pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod model;

#[macro_use]
extern crate diesel;
