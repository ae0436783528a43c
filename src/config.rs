use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_FISCAL_DATA_URL: &str = "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v2/accounting/od/avg_interest_rates?filter=record_date:gte:2025-01-01&sort=-record_date&page[size]=1";

/// Configuration for the chat-completion gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_GATEWAY_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("AI_GATEWAY_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            url: std::env::var("AI_GATEWAY_URL").unwrap_or(defaults.url),
            model: std::env::var("AI_GATEWAY_MODEL").unwrap_or(defaults.model),
            timeout: secs_from_env("AI_GATEWAY_TIMEOUT_SECS").unwrap_or(defaults.timeout),
        }
    }
}

/// Configuration for the public reference-data feed used by the fair value oracle
#[derive(Debug, Clone)]
pub struct ReferenceDataConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for ReferenceDataConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FISCAL_DATA_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl ReferenceDataConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("FISCAL_DATA_URL").unwrap_or(defaults.url),
            timeout: secs_from_env("FISCAL_DATA_TIMEOUT_SECS").unwrap_or(defaults.timeout),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    pub gateway: GatewayConfig,
    pub reference_data: ReferenceDataConfig,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid BIND_ADDR: {}", e))?;

        Ok(Self {
            bind_addr,
            gateway: GatewayConfig::from_env(),
            reference_data: ReferenceDataConfig::from_env(),
        })
    }
}

fn secs_from_env(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "google/gemini-2.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.url.ends_with("/v1/chat/completions"));
    }

    #[test]
    fn test_reference_data_config_default() {
        let config = ReferenceDataConfig::default();
        assert!(config.url.contains("avg_interest_rates"));
        assert!(config.url.contains("sort=-record_date"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
