use clap::Parser;
use std::net::SocketAddr;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Command line and environment configuration for the service binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Intelligent claims extraction and QA service", long_about = None)]
pub struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub openai_api_base: String,

    #[arg(long, env = "OPENAI_CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "IMAGE_MAX_TOKENS", default_value_t = 800)]
    pub image_max_tokens: u16,

    #[arg(long, env = "DOCUMENT_MAX_TOKENS", default_value_t = 1000)]
    pub document_max_tokens: u16,

    #[arg(long, env = "ANSWER_MAX_TOKENS", default_value_t = 400)]
    pub answer_max_tokens: u16,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 20 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

impl Args {
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.openai_api_key.clone(),
            api_base: self.openai_api_base.trim_end_matches('/').to_string(),
            model: self.model.clone(),
            image_max_tokens: self.image_max_tokens,
            document_max_tokens: self.document_max_tokens,
            answer_max_tokens: self.answer_max_tokens,
        }
    }

    pub fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {}:{}: {}", self.host, self.port, e))?;

        Ok(ServiceConfig {
            addr,
            max_upload_bytes: self.max_upload_bytes,
        })
    }
}

/// Settings for the OpenAI-compatible model provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub image_max_tokens: u16,
    pub document_max_tokens: u16,
    pub answer_max_tokens: u16,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn declared_default(id: &str) -> String {
        let command = Args::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id().as_str() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()[0].to_string_lossy().into_owned()
    }

    #[test]
    fn default_model_and_token_limits() {
        assert_eq!(declared_default("model"), DEFAULT_MODEL);
        assert_eq!(declared_default("openai_api_base"), DEFAULT_API_BASE);
        assert_eq!(declared_default("image_max_tokens"), "800");
        assert_eq!(declared_default("document_max_tokens"), "1000");
        assert_eq!(declared_default("answer_max_tokens"), "400");
        assert_eq!(declared_default("port"), "8000");
        assert_eq!(
            declared_default("max_upload_bytes"),
            ServiceConfig::default().max_upload_bytes.to_string()
        );
    }

    #[test]
    fn explicit_flags_reach_provider_config() {
        let args = Args::try_parse_from([
            "claims-qa-service",
            "--openai-api-key",
            "sk-test",
            "--openai-api-base",
            DEFAULT_API_BASE,
            "--model",
            "gpt-4o-mini",
            "--image-max-tokens",
            "100",
            "--document-max-tokens",
            "200",
            "--answer-max-tokens",
            "300",
        ])
        .unwrap();
        let provider = args.provider_config();

        assert_eq!(provider.api_key, "sk-test");
        assert_eq!(provider.model, "gpt-4o-mini");
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.image_max_tokens, 100);
        assert_eq!(provider.document_max_tokens, 200);
        assert_eq!(provider.answer_max_tokens, 300);
    }

    #[test]
    fn api_base_loses_trailing_slash() {
        let args = Args::try_parse_from([
            "claims-qa-service",
            "--openai-api-key",
            "sk-test",
            "--openai-api-base",
            "http://localhost:9000/v1/",
            "--host",
            "127.0.0.1",
            "--port",
            "9100",
        ])
        .unwrap();

        assert_eq!(args.provider_config().api_base, "http://localhost:9000/v1");
        assert_eq!(args.service_config().unwrap().addr.port(), 9100);
    }
}
