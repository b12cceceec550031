// src/utils/mod.rs

pub mod choice;
pub mod hash;
pub mod html;
pub mod jwt;
