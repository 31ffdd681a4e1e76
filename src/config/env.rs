//! Configuration loading from the process environment.

use std::env;
use std::str::FromStr;

use crate::config::schema::GatewayConfig;

/// Read an environment variable, falling back to `default` when the
/// variable is unset or fails to parse.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl GatewayConfig {
    /// Build a configuration from environment variables, using the
    /// defaults from [`GatewayConfig::default`] for anything unset.
    pub fn from_env() -> Self {
        let defaults = GatewayConfig::default();
        let mut config = defaults.clone();

        config.port = env_or("PORT", defaults.port);
        config.jwt_secret = env_string("NEXUS_JWT_SECRET", &defaults.jwt_secret);

        config.services.user_service =
            env_string("USER_SERVICE_URL", &defaults.services.user_service);
        config.services.content_service =
            env_string("CONTENT_SERVICE_URL", &defaults.services.content_service);
        config.services.notification_service = env_string(
            "NOTIFICATION_SERVICE_URL",
            &defaults.services.notification_service,
        );

        config.rate_limit.default_max_requests =
            env_or("RATE_LIMIT_DEFAULT", defaults.rate_limit.default_max_requests);
        config.rate_limit.default_window_ms =
            env_or("RATE_LIMIT_WINDOW_MS", defaults.rate_limit.default_window_ms);
        config.rate_limit.auth_max_requests =
            env_or("RATE_LIMIT_AUTH", defaults.rate_limit.auth_max_requests);
        config.rate_limit.auth_window_ms =
            env_or("RATE_LIMIT_AUTH_WINDOW_MS", defaults.rate_limit.auth_window_ms);

        config.circuit_breaker.failure_threshold = env_or(
            "CIRCUIT_FAILURE_THRESHOLD",
            defaults.circuit_breaker.failure_threshold,
        );
        config.circuit_breaker.failure_window_ms = env_or(
            "CIRCUIT_FAILURE_WINDOW_MS",
            defaults.circuit_breaker.failure_window_ms,
        );
        config.circuit_breaker.open_duration_ms = env_or(
            "CIRCUIT_OPEN_DURATION_MS",
            defaults.circuit_breaker.open_duration_ms,
        );

        config.timeouts.upstream_secs =
            env_or("UPSTREAM_TIMEOUT_SECS", defaults.timeouts.upstream_secs);
        config.timeouts.request_secs =
            env_or("REQUEST_TIMEOUT_SECS", defaults.timeouts.request_secs);

        if let Ok(origins) = env::var("CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !origins.is_empty() {
                config.cors.allowed_origins = origins;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rate_limit.default_max_requests, 100);
        assert_eq!(config.rate_limit.auth_max_requests, 10);
        assert_eq!(config.rate_limit.default_window_ms, 60_000);
        assert_eq!(config.services.user_service, "http://localhost:3001");
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.circuit_breaker.failure_threshold, 5);
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        assert_eq!(env_or("NEXUS_TEST_UNSET_PORT_1234", 42u16), 42);
    }
}
