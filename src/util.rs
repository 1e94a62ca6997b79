/// Short prefix of a token for log lines; full tokens stay out of the logs.
/// Cuts after 12 characters, never inside a multi-byte code point — the
/// token field is client-supplied and may be arbitrary UTF-8.
pub fn token_prefix(t: &str) -> &str {
    t.char_indices().nth(12).map_or(t, |(i, _)| &t[..i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_prefix() {
        assert_eq!(token_prefix("abcdefghijklmnop"), "abcdefghijkl");
        assert_eq!(token_prefix("short"), "short");
        assert_eq!(token_prefix(""), "");
    }

    #[test]
    fn test_multibyte_token_does_not_panic() {
        // Byte 12 lands inside the third '€' (3 bytes each).
        assert_eq!(token_prefix("aa€€€€"), "aa€€€€");
        let long = "€€€€€€€€€€€€€€";
        assert_eq!(token_prefix(long), "€€€€€€€€€€€€");
    }
}
