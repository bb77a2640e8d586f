use std::env;

/// Default token lifetime: 7 days, in seconds.
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

/// Process configuration, read once at startup and passed explicitly into
/// the pieces that need it. Missing `DATABASE_URL` or `JWT_SECRET` is fatal.
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_secs: env::var("JWT_EXPIRES_IN")
                .map(|v| v.parse().expect("JWT_EXPIRES_IN must be a number of seconds"))
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a number"),
            server_host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "test-secret");
        env::remove_var("JWT_EXPIRES_IN");
        env::remove_var("PORT");
        env::remove_var("HOST");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.jwt_secret, "test-secret");
        assert_eq!(config.token_ttl_secs, 604800);
        assert_eq!(config.server_port, 5000);
        assert_eq!(config.server_host, "0.0.0.0");

        // Custom values override the defaults
        env::set_var("JWT_EXPIRES_IN", "3600");
        env::set_var("PORT", "3000");
        env::set_var("HOST", "127.0.0.1");

        let config = Config::from_env();

        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "127.0.0.1");

        env::remove_var("JWT_EXPIRES_IN");
        env::remove_var("PORT");
        env::remove_var("HOST");
    }
}
