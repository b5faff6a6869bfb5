//! HTML Escaping
//!
//! Neutralizes untrusted input before it can be reflected into a
//! rendered view. Applied to every request field the account flows
//! store or echo.

/// Escape the HTML-significant characters in `input`
///
/// Covers the same set a templating engine would: `&`, `<`, `>`, `"`,
/// `'`. Escaping `&` first keeps already-escaped entities stable.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("alice123"), "alice123");
        assert_eq!(escape_html("a@b.com"), "a@b.com");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_markup_escaped() {
        assert_eq!(
            escape_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(escape_html("a\"b'c"), "a&quot;b&#39;c");
    }

    #[test]
    fn test_ampersand_escaped_first() {
        // A literal "&lt;" must not collapse into "<"
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
        assert_eq!(escape_html("Abc1!&"), "Abc1!&amp;");
    }
}
