use ammonia;

/// Clean question HTML using the ammonia library.
///
/// Prompts, choices and explanations may carry formatting markup (`<b>`,
/// `<sub>`, `<img>`), so they are sanitized with a whitelist instead of being
/// escaped. `<script>` tags are dropped together with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Sanitizes every entry of a list, keeping its order.
pub fn clean_all(inputs: &[String]) -> Vec<String> {
    inputs.iter().map(|s| clean_html(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script() {
        let cleaned = clean_html("<b>x<sup>2</sup></b><script>alert(1)</script>");
        assert_eq!(cleaned, "<b>x<sup>2</sup></b>");
    }

    #[test]
    fn test_clean_all_keeps_order() {
        let cleaned = clean_all(&["<i>a</i>".to_string(), "b".to_string()]);
        assert_eq!(cleaned, vec!["<i>a</i>".to_string(), "b".to_string()]);
    }
}
