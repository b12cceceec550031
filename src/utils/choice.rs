// src/utils/choice.rs

//! Conversion between zero-based choice indices and the letter labels
//! (`A`-`E`) used in storage, scoring and display.

use crate::config::MAX_CHOICES;

/// Maps a zero-based choice index to its letter: 0 -> 'A', 4 -> 'E'.
pub fn index_to_letter(index: usize) -> Option<char> {
    if index < MAX_CHOICES {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Same as [`index_to_letter`] but as an owned label, the form answers are stored in.
pub fn index_to_label(index: usize) -> Option<String> {
    index_to_letter(index).map(String::from)
}

/// Parses a single upper-case letter label back into its index.
pub fn letter_to_index(label: &str) -> Option<usize> {
    let mut chars = label.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return None;
    };
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let index = (letter as u8 - b'A') as usize;
    (index < MAX_CHOICES).then_some(index)
}
