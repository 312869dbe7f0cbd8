use chrono::Duration;

/// Longest session lifetime accepted from `SESSION_TTL_HOURS` (ten years).
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Public base URL of this server.
    pub server_url: String,
    /// The single origin allowed by CORS.
    pub web_client_url: String,
    pub auth_secret: String,
    pub session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let server_url =
            std::env::var("SERVER_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let web_client_url = std::env::var("WEB_CLIENT_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .map_err(|_| anyhow::anyhow!("WEB_CLIENT_URL must be set"))?;
        let auth_secret =
            std::env::var("AUTH_SECRET").map_err(|_| anyhow::anyhow!("AUTH_SECRET must be set"))?;
        let session_ttl = parse_session_ttl(
            &std::env::var("SESSION_TTL_HOURS").unwrap_or_else(|_| "168".into()),
        )?;

        Ok(Self {
            host,
            port,
            database_url,
            server_url,
            web_client_url,
            auth_secret,
            session_ttl,
        })
    }
}

fn parse_session_ttl(raw: &str) -> anyhow::Result<Duration> {
    let hours: i64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid SESSION_TTL_HOURS: {}", e))?;

    if hours <= 0 {
        anyhow::bail!("SESSION_TTL_HOURS must be positive");
    }
    if hours > MAX_SESSION_TTL_HOURS {
        anyhow::bail!("SESSION_TTL_HOURS must be at most {}", MAX_SESSION_TTL_HOURS);
    }

    Duration::try_hours(hours)
        .ok_or_else(|| anyhow::anyhow!("SESSION_TTL_HOURS is out of range: {}", hours))
}
