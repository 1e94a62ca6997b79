/// Validate the submission identifier: a phone number in loose E.164 shape,
/// optional leading `+`, then 7-15 digits.
pub fn is_valid_phone_number(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phone_numbers() {
        assert!(is_valid_phone_number("+15550001111"));
        assert!(is_valid_phone_number("15550001111"));
        assert!(is_valid_phone_number("5550001"));
    }

    #[test]
    fn test_invalid_phone_numbers() {
        assert!(!is_valid_phone_number(""));
        assert!(!is_valid_phone_number("+"));
        // too short / too long
        assert!(!is_valid_phone_number("555000"));
        assert!(!is_valid_phone_number("5550001111222233"));
        // non-digits
        assert!(!is_valid_phone_number("+1555000111a"));
        assert!(!is_valid_phone_number("555-000-1111"));
    }
}
