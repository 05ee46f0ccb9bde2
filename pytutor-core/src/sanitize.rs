//! Response sanitizer: strips emphasis and code markers from generated text.

/// Characters the generator is told not to emit. `**` is covered by `*`.
const MARKERS: [char; 2] = ['*', '`'];

/// Remove every `*` and backtick, then trim surrounding whitespace.
///
/// No other characters are touched, and inner whitespace is kept as is, so
/// `sanitize(sanitize(x)) == sanitize(x)`.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !MARKERS.contains(c)).collect();
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bold_and_code_markers() {
        assert_eq!(
            sanitize("  **Lists** are `mutable`, *tuples* are not.\n"),
            "Lists are mutable, tuples are not."
        );
    }

    #[test]
    fn strips_code_fences() {
        assert_eq!(sanitize("```python\nprint(1)\n```"), "python\nprint(1)");
    }

    #[test]
    fn keeps_inner_whitespace_and_case() {
        assert_eq!(sanitize("A  b\n\n  C"), "A  b\n\n  C");
    }

    #[test]
    fn markers_only_becomes_empty() {
        assert_eq!(sanitize(" ** ` * "), "");
    }

    #[test]
    fn is_idempotent_on_marker_wrapped_whitespace() {
        let once = sanitize("* \n x \n *");
        assert_eq!(once, "x");
        assert_eq!(sanitize(&once), once);
    }
}
