use std::time::Instant;

use base64::Engine;
use md5::{Digest, Md5};

/// Fixed secrets and search-space parameters for token verification.
/// Built once at startup from [`crate::config::Config`] and never mutated.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Server-held secret mixed into every coins-hash preimage. Never
    /// transmitted; the brute-force search exists precisely so the client
    /// does not have to reveal which suffix the issuer appended to it.
    pub secret_text: String,
    /// Salt for the full-message integrity digest.
    pub salt: String,
    /// Alphabet the issuer draws suffix characters from.
    pub alphabet: String,
}

impl VerifierConfig {
    pub fn new(secret_text: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            secret_text: secret_text.into(),
            salt: salt.into(),
            alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string(),
        }
    }
}

/// Outcome of a single verification attempt. The verifier never errors past
/// this boundary; every failure mode lands in `reason`.
///
/// `elapsed_seconds` is reported only when the suffix search actually ran
/// (success or exhaustion). Decode, structure, and integrity failures leave
/// it `None`.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub ok: bool,
    pub reason: Option<String>,
    pub amount: i64,
    pub found_suffix: Option<String>,
    pub elapsed_seconds: Option<f64>,
}

impl VerificationOutcome {
    fn failure(amount: i64, reason: String) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
            amount,
            found_suffix: None,
            elapsed_seconds: None,
        }
    }
}

const SUFFIX_LEN: usize = 5;

/// Pure token verifier: decode, structural check, integrity check, keyed
/// suffix search. No I/O, no shared state; safe to run concurrently.
pub struct TokenVerifier {
    config: VerifierConfig,
}

impl TokenVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Verify a base64-encoded, colon-delimited token against a claimed
    /// amount. The expected decoded layout is
    /// `<unused>:<coinsHash>:<timestamp>:<nonce>:<fullHash>`.
    ///
    /// CPU-bound in the worst case (|alphabet|^5 MD5 computations); callers
    /// in async context should dispatch this via `spawn_blocking`.
    pub fn verify(&self, encoded_token: &str, claimed_amount: i64) -> VerificationOutcome {
        let decoded = match base64::engine::general_purpose::STANDARD.decode(encoded_token) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                // Lump bad UTF-8 in with bad base64: callers only ever see
                // one uniform decode failure.
                Err(_) => {
                    return VerificationOutcome::failure(
                        claimed_amount,
                        "Invalid Base64 encoding".to_string(),
                    )
                }
            },
            Err(_) => {
                return VerificationOutcome::failure(
                    claimed_amount,
                    "Invalid Base64 encoding".to_string(),
                )
            }
        };

        let parts: Vec<&str> = decoded.split(':').collect();
        if parts.len() != 5 {
            return VerificationOutcome::failure(
                claimed_amount,
                format!(
                    "Decoded message must have 5 parts separated by ':' (got {})",
                    parts.len()
                ),
            );
        }

        // parts: [unused, coins_hash, timestamp, nonce, full_hash]
        let coins_hash = parts[1];
        let timestamp = parts[2];
        let nonce = parts[3];
        let full_hash = parts[4];

        let recomputed_full =
            md5_hex(&format!("{timestamp}{coins_hash}{nonce}{}", self.config.salt));
        if recomputed_full != full_hash {
            // Tampered token; skip the expensive search entirely.
            return VerificationOutcome::failure(
                claimed_amount,
                "Full-hash mismatch — message integrity check failed".to_string(),
            );
        }

        self.search_suffix(coins_hash, claimed_amount)
    }

    /// Enumerate every suffix in lexicographic order until one reproduces
    /// `coins_hash` for the claimed amount, or the space is exhausted.
    fn search_suffix(&self, coins_hash: &str, claimed_amount: i64) -> VerificationOutcome {
        let alphabet: Vec<char> = self.config.alphabet.chars().collect();
        let space = (alphabet.len() as u64).pow(SUFFIX_LEN as u32);
        let start = Instant::now();

        for idx in 0..space {
            let suffix = index_to_suffix(idx, &alphabet);
            let candidate = md5_hex(&format!(
                "The_coin_user:{claimed_amount}:{}{suffix}",
                self.config.secret_text
            ));
            if candidate == coins_hash {
                return VerificationOutcome {
                    ok: true,
                    reason: None,
                    amount: claimed_amount,
                    found_suffix: Some(suffix),
                    elapsed_seconds: Some(start.elapsed().as_secs_f64()),
                };
            }
        }

        VerificationOutcome {
            ok: false,
            reason: Some(format!("No coins hash match for amount {claimed_amount}")),
            amount: claimed_amount,
            found_suffix: None,
            elapsed_seconds: Some(start.elapsed().as_secs_f64()),
        }
    }
}

/// Map a search index to a fixed-length suffix, treating the index as a
/// base-|alphabet| number, most-significant digit first (0 maps to the
/// first alphabet character, so index 0 is "AAAAA" for A–Z).
fn index_to_suffix(idx: u64, alphabet: &[char]) -> String {
    let base = alphabet.len() as u64;
    let mut n = idx;
    let mut chars = ['\0'; SUFFIX_LEN];
    for slot in chars.iter_mut().rev() {
        *slot = alphabet[(n % base) as usize];
        n /= base;
    }
    chars.iter().collect()
}

/// Lowercase hex MD5 of a UTF-8 string.
pub fn md5_hex(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(VerifierConfig::new("ONLY_JAMES_KNOWS_THIS_PART", "XyZ123!@#"))
    }

    /// Build a well-formed token whose coins hash was issued for `amount`
    /// with the given suffix.
    fn build_token(config: &VerifierConfig, amount: i64, suffix: &str) -> String {
        let coins_hash = md5_hex(&format!(
            "The_coin_user:{amount}:{}{suffix}",
            config.secret_text
        ));
        let timestamp = "1700000000";
        let nonce = "n0nc3";
        let full_hash = md5_hex(&format!("{timestamp}{coins_hash}{nonce}{}", config.salt));
        let message = format!("x:{coins_hash}:{timestamp}:{nonce}:{full_hash}");
        base64::engine::general_purpose::STANDARD.encode(message)
    }

    #[test]
    fn index_zero_is_all_first_char() {
        let alphabet: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZ".chars().collect();
        assert_eq!(index_to_suffix(0, &alphabet), "AAAAA");
        assert_eq!(index_to_suffix(1, &alphabet), "AAAAB");
        assert_eq!(index_to_suffix(26, &alphabet), "AAABA");
        // Last point of the 26^5 space.
        assert_eq!(index_to_suffix(26u64.pow(5) - 1, &alphabet), "ZZZZZ");
    }

    #[test]
    fn valid_token_verifies() {
        let v = verifier();
        let token = build_token(&v.config, 100, "AAAAA");
        let outcome = v.verify(&token, 100);
        assert!(outcome.ok, "reason: {:?}", outcome.reason);
        assert_eq!(outcome.found_suffix.as_deref(), Some("AAAAA"));
        assert_eq!(outcome.amount, 100);
        assert!(outcome.elapsed_seconds.is_some());
    }

    #[test]
    fn suffix_deeper_in_the_space_is_found() {
        let v = verifier();
        // "ABCDE" sits ~19k candidates in, enough to exercise real iteration.
        let token = build_token(&v.config, 42, "ABCDE");
        let outcome = v.verify(&token, 42);
        assert!(outcome.ok);
        assert_eq!(outcome.found_suffix.as_deref(), Some("ABCDE"));
    }

    #[test]
    fn invalid_base64_is_a_uniform_decode_failure() {
        let outcome = verifier().verify("!!!not-base64!!!", 5);
        assert!(!outcome.ok);
        assert_eq!(outcome.reason.as_deref(), Some("Invalid Base64 encoding"));
        assert!(outcome.elapsed_seconds.is_none());
    }

    #[test]
    fn non_utf8_payload_is_a_decode_failure() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0xff, 0xfe, 0xfd]);
        let outcome = verifier().verify(&encoded, 5);
        assert_eq!(outcome.reason.as_deref(), Some("Invalid Base64 encoding"));
    }

    #[test]
    fn wrong_field_count_reports_actual_count() {
        let v = verifier();
        for (text, count) in [
            ("no-delimiters-here", 1),
            ("a:b:c:d", 4),
            ("a:b:c:d:e:f", 6),
        ] {
            let encoded = base64::engine::general_purpose::STANDARD.encode(text);
            let outcome = v.verify(&encoded, 5);
            assert!(!outcome.ok);
            assert_eq!(
                outcome.reason.as_deref(),
                Some(
                    format!(
                        "Decoded message must have 5 parts separated by ':' (got {count})"
                    )
                    .as_str()
                )
            );
            assert!(outcome.elapsed_seconds.is_none());
        }
    }

    #[test]
    fn tampered_full_hash_skips_the_search() {
        let v = verifier();
        let token = build_token(&v.config, 100, "AAAAA");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&token)
            .unwrap();
        let mut text = String::from_utf8(decoded).unwrap();
        // Flip the last hex digit of fullHash.
        let last = text.pop().unwrap();
        text.push(if last == '0' { '1' } else { '0' });
        let tampered = base64::engine::general_purpose::STANDARD.encode(text);

        let outcome = v.verify(&tampered, 100);
        assert!(!outcome.ok);
        assert_eq!(
            outcome.reason.as_deref(),
            Some("Full-hash mismatch — message integrity check failed")
        );
        // No search ran, so no timing is reported.
        assert!(outcome.elapsed_seconds.is_none());
    }

    #[test]
    fn wrong_amount_exhausts_the_space() {
        // A two-letter alphabet keeps exhaustion (2^5 = 32 candidates) fast
        // while preserving the full search semantics.
        let mut config = VerifierConfig::new("ONLY_JAMES_KNOWS_THIS_PART", "XyZ123!@#");
        config.alphabet = "AB".to_string();
        let v = TokenVerifier::new(config);
        let token = build_token(&v.config, 100, "ABBAB");

        let ok = v.verify(&token, 100);
        assert!(ok.ok);
        assert_eq!(ok.found_suffix.as_deref(), Some("ABBAB"));

        let miss = v.verify(&token, 101);
        assert!(!miss.ok);
        assert_eq!(
            miss.reason.as_deref(),
            Some("No coins hash match for amount 101")
        );
        assert!(miss.found_suffix.is_none());
        assert!(miss.elapsed_seconds.is_some());
    }

    #[test]
    fn concrete_scenario_from_issuer_docs() {
        // coinsHash = MD5("The_coin_user:100:ONLY_JAMES_KNOWS_THIS_PARTAAAAA")
        let expected =
            md5_hex("The_coin_user:100:ONLY_JAMES_KNOWS_THIS_PARTAAAAA");
        let v = verifier();
        let token = build_token(&v.config, 100, "AAAAA");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&token)
            .unwrap();
        let text = String::from_utf8(decoded).unwrap();
        assert_eq!(text.split(':').nth(1), Some(expected.as_str()));
        assert!(v.verify(&token, 100).ok);
    }
}
