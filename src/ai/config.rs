use dotenv::dotenv;

use crate::error::{AiError, AiResult};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Full URL of the completions endpoint.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> AiConfig {
        AiConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Reads `DAYWEAVER_API_URL`, `DAYWEAVER_API_KEY` and `DAYWEAVER_MODEL`
    /// from the environment. A `.env` file is honored.
    pub fn from_env() -> AiResult<AiConfig> {
        dotenv().ok();
        let base_url = std::env::var("DAYWEAVER_API_URL")
            .map_err(|_| AiError::MissingConfig("DAYWEAVER_API_URL"))?;
        let api_key = std::env::var("DAYWEAVER_API_KEY")
            .map_err(|_| AiError::MissingConfig("DAYWEAVER_API_KEY"))?;
        let model =
            std::env::var("DAYWEAVER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(AiConfig {
            base_url,
            api_key,
            model,
        })
    }
}
