// src/quiz/mod.rs

pub mod review;
pub mod session;

pub use review::{SectionView, filter_by_section, section_view};
pub use session::{Progress, QuizSession};
