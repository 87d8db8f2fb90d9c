use std::time::Duration;

use crate::payment::WeChatConfig;

/// Process configuration, read from the environment with defaults for every field.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    /// Bound of each actor's mailbox.
    pub mailbox_capacity: usize,
    pub request_timeout_ms: u64,
    pub logging: LoggingConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub provider: String,
    pub subject: String,
    pub wechat: WeChatConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env_or("ENVIRONMENT", "development"),
            mailbox_capacity: std::env::var("MAILBOX_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(100),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            logging: LoggingConfig::from_env(),
            payment: PaymentConfig::from_env(),
        }
    }

    /// `None` when configured as 0, meaning requests wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let format = match env_or("LOG_FORMAT", "compact").to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };
        Self {
            filter: env_or("LOG_FILTER", "info"),
            format,
        }
    }
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            provider: env_or("PAYMENT_PROVIDER", crate::payment::wechat::PROVIDER),
            subject: env_or("PAYMENT_SUBJECT", "Convenience Store Order"),
            wechat: WeChatConfig {
                app_id: env_or("WECHAT_APP_ID", ""),
                mch_id: env_or("WECHAT_MCH_ID", ""),
                api_key: env_or("WECHAT_API_KEY", ""),
                notify_url: env_or("WECHAT_NOTIFY_URL", ""),
            },
        }
    }
}
