pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_PROFILE_KEY: &str = "user_profile";
