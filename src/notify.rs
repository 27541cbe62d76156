use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;

use crate::config::TelegramConfig;
use crate::error::{Context, Result};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    NotSent,
}

/// Outbound boundary for alert delivery, kept behind a trait so tests can
/// substitute a recording fake.
pub trait AlertTransport {
    fn deliver(&self, token: &str, chat_id: &str, text: &str) -> Result<()>;
}

/// Telegram `sendMessage` webhook delivery.
pub struct TelegramTransport;

impl AlertTransport for TelegramTransport {
    fn deliver(&self, token: &str, chat_id: &str, text: &str) -> Result<()> {
        let client = Client::builder()
            .timeout(NOTIFY_TIMEOUT)
            .build()
            .context("Failed to construct notification HTTP client")?;

        let url = format!("https://api.telegram.org/bot{token}/sendMessage");
        client
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .context("Alert notification request failed")?;

        Ok(())
    }
}

/// Best-effort delivery. Missing or empty credentials mean `NotSent` without
/// touching the transport; transport failures are logged and swallowed so
/// notification can never fail the run.
pub fn send_alert(
    transport: &dyn AlertTransport,
    telegram: Option<&TelegramConfig>,
    text: &str,
) -> Delivery {
    let Some(config) = telegram else {
        return Delivery::NotSent;
    };
    if config.bot_token.is_empty() || config.chat_id.is_empty() {
        return Delivery::NotSent;
    }

    match transport.deliver(&config.bot_token, &config.chat_id, text) {
        Ok(()) => Delivery::Sent,
        Err(err) => {
            log::warn!("Failed to deliver alert notification: {}", err);
            Delivery::NotSent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTransport {
        calls: RefCell<Vec<(String, String, String)>>,
        fail: bool,
    }

    impl AlertTransport for RecordingTransport {
        fn deliver(&self, token: &str, chat_id: &str, text: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((token.to_string(), chat_id.to_string(), text.to_string()));
            if self.fail {
                Err(AppError::message("simulated delivery failure"))
            } else {
                Ok(())
            }
        }
    }

    fn credentials(token: &str, chat_id: &str) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    #[test]
    fn missing_config_is_not_sent_and_makes_no_call() {
        let transport = RecordingTransport::default();

        let delivery = send_alert(&transport, None, "BTC alert");

        assert_eq!(delivery, Delivery::NotSent);
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn empty_credentials_are_not_sent_and_make_no_call() {
        let transport = RecordingTransport::default();

        let delivery = send_alert(&transport, Some(&credentials("", "")), "BTC alert");
        assert_eq!(delivery, Delivery::NotSent);

        let delivery = send_alert(&transport, Some(&credentials("tok", "")), "BTC alert");
        assert_eq!(delivery, Delivery::NotSent);

        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn delivers_with_full_credentials() {
        let transport = RecordingTransport::default();

        let delivery = send_alert(
            &transport,
            Some(&credentials("tok", "chat-1")),
            "ALERT: BTC >= 60000 -> 61000.00 USD",
        );

        assert_eq!(delivery, Delivery::Sent);
        let calls = transport.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "tok");
        assert_eq!(calls[0].1, "chat-1");
        assert!(calls[0].2.contains("BTC"));
    }

    #[test]
    fn transport_failures_are_swallowed() {
        let transport = RecordingTransport {
            fail: true,
            ..Default::default()
        };

        let delivery = send_alert(&transport, Some(&credentials("tok", "chat-1")), "text");

        assert_eq!(delivery, Delivery::NotSent);
        assert_eq!(transport.calls.borrow().len(), 1);
    }
}
