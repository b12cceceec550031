// src/models/mod.rs

pub mod attempt;
pub mod chat;
pub mod question;
pub mod subject;
pub mod test_result;
pub mod user;
