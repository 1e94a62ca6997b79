use std::env;

pub struct Config {
    pub port: u16,
    pub ledger_path: String,
    pub secret_text: String,
    pub salt: String,
    pub admin_password: Option<String>,
    pub pairing_code: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_burst: u32,
    pub rate_limit_per_minute: u32,
    pub max_payload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            ledger_path: env::var("LEDGER_PATH")
                .unwrap_or_else(|_| "submissions.json".to_string()),
            secret_text: env::var("SECRET_TEXT")
                .unwrap_or_else(|_| "ONLY_JAMES_KNOWS_THIS_PART".to_string()),
            salt: env::var("TOKEN_SALT").unwrap_or_else(|_| "XyZ123!@#".to_string()),
            // Unset means the admin surface stays hidden (404).
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            pairing_code: env::var("PAIRING_CODE").unwrap_or_else(|_| "1122".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            rate_limit_per_minute: env::var("RATE_LIMIT_PER_MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            max_payload_bytes: env::var("MAX_PAYLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(65_536), // 64 KiB; tokens are small
        }
    }
}
