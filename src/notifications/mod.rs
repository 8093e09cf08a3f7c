//! 通知投递
//!
//! 邮件与短信通过 `Notifier` 发出；默认的 `LogNotifier` 只写日志，
//! 接入真实通道时替换实现即可。

pub mod templates;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::errors::{PlatformError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, message: MailMessage) -> Result<()>;

    async fn send_sms(&self, phone: &str, text: &str) -> Result<()>;
}

/// 把投递内容写入日志
pub struct LogNotifier {
    from: String,
}

impl LogNotifier {
    pub fn new(from_name: &str, from_address: &str) -> Self {
        Self {
            from: format!("{from_name} <{from_address}>"),
        }
    }

    pub fn from_config() -> Self {
        let mail = &AppConfig::get().mail;
        Self::new(&mail.from_name, &mail.from_address)
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_email(&self, message: MailMessage) -> Result<()> {
        if message.to.trim().is_empty() {
            return Err(PlatformError::notification("Email recipient is empty."));
        }
        info!(
            "Email from {} to {}: {}",
            self.from, message.to, message.subject
        );
        debug!("Email body:\n{}", message.text_body);
        Ok(())
    }

    async fn send_sms(&self, phone: &str, text: &str) -> Result<()> {
        if phone.trim().is_empty() {
            return Err(PlatformError::notification("SMS recipient is empty."));
        }
        info!("SMS to {}", phone);
        debug!("SMS body: {}", text);
        Ok(())
    }
}
