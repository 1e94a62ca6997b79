pub mod admin_auth;
pub mod rate_limit;
