use crate::auth::jwt::JwtConfig;

/// Credentials for the admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the session secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the session cookie carries the `Secure` flag (default: `false`).
    pub cookie_secure: bool,
    /// Session token configuration (secret, lifetime).
    pub jwt: JwtConfig,
    /// Optional admin account ensured at startup.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default    |
    /// |----------------------------|------------|
    /// | `HOST`                     | `0.0.0.0`  |
    /// | `PORT`                     | `3000`     |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`       |
    /// | `COOKIE_SECURE`            | `false`    |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | unset      |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset      |
    /// | `BOOTSTRAP_ADMIN_NAME`     | `Administrator` |
    ///
    /// Session variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be true or false");

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_EMAIL"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin {
                    name: std::env::var("BOOTSTRAP_ADMIN_NAME")
                        .unwrap_or_else(|_| "Administrator".into()),
                    email,
                    password,
                })
            }
            _ => None,
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            request_timeout_secs,
            cookie_secure,
            jwt,
            bootstrap_admin,
        }
    }
}
