// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod explanation;
pub mod questions;
pub mod quiz;
pub mod results;
pub mod subjects;
