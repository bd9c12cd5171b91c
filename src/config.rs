use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote quiz API, e.g. "http://localhost:5000/api".
    pub api_base_url: String,
    /// Base URL uploaded image paths are joined against. Falls back to the
    /// API base URL when not set separately.
    pub upload_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = required("QUIZ_API_URL")?;
        let upload_base_url =
            env::var("QUIZ_UPLOAD_URL").unwrap_or_else(|_| api_base_url.clone());

        Ok(Self {
            api_base_url,
            upload_base_url,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}
