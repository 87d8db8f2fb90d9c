//! WeChat-Pay-style gateway.
//!
//! Builds the JSAPI credential bundle locally; the prepay id is generated rather than
//! requested from the provider. Callbacks are JSON in either the simple
//! `{"order_id", "success"}` shape or the provider's `{"out_trade_no", "trade_state"}`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{GatewayError, PaymentGateway, PaymentRequest};
use crate::domain::CallbackResult;

pub const PROVIDER: &str = "wechat";

const SIGN_TYPE: &str = "SHA256";
const TRADE_STATE_SUCCESS: &str = "SUCCESS";

/// Merchant credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeChatConfig {
    pub app_id: String,
    pub mch_id: String,
    pub api_key: String,
    pub notify_url: String,
}

impl WeChatConfig {
    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("app_id", &self.app_id),
            ("mch_id", &self.mch_id),
            ("api_key", &self.api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

pub struct WeChatPayGateway {
    config: WeChatConfig,
}

impl WeChatPayGateway {
    pub fn new(config: WeChatConfig) -> Self {
        Self { config }
    }
}

/// `paySign`: upper-case hex SHA-256 of `k1=v1&k2=v2...&key=<api_key>`, keys in
/// ascii order, empty values skipped.
pub fn pay_sign(fields: &BTreeMap<String, String>, api_key: &str) -> String {
    let mut canonical = fields
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    canonical.push_str("&key=");
    canonical.push_str(api_key);

    hex::encode_upper(Sha256::digest(canonical.as_bytes()))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CallbackPayload {
    Simple {
        order_id: String,
        success: bool,
    },
    Provider {
        out_trade_no: String,
        trade_state: String,
    },
}

impl From<CallbackPayload> for CallbackResult {
    fn from(payload: CallbackPayload) -> Self {
        match payload {
            CallbackPayload::Simple { order_id, success } => CallbackResult { order_id, success },
            CallbackPayload::Provider {
                out_trade_no,
                trade_state,
            } => CallbackResult {
                order_id: out_trade_no,
                success: trade_state == TRADE_STATE_SUCCESS,
            },
        }
    }
}

#[async_trait]
impl PaymentGateway for WeChatPayGateway {
    fn provider(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self, request), fields(order_id = %request.order_id, amount_minor = request.amount_minor))]
    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> Result<BTreeMap<String, String>, GatewayError> {
        let missing = self.config.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "Merchant configuration incomplete");
            return Err(GatewayError::Unavailable(format!(
                "merchant configuration incomplete: {}",
                missing.join(", ")
            )));
        }
        if request.amount_minor <= 0 {
            return Err(GatewayError::Unavailable(format!(
                "amount must be positive, got {}",
                request.amount_minor
            )));
        }

        let prepay_id = format!("wx{}", Uuid::new_v4().simple());
        let mut credentials = BTreeMap::from([
            ("appId".to_string(), self.config.app_id.clone()),
            ("nonceStr".to_string(), Uuid::new_v4().simple().to_string()),
            ("package".to_string(), format!("prepay_id={prepay_id}")),
            ("signType".to_string(), SIGN_TYPE.to_string()),
            ("timeStamp".to_string(), Utc::now().timestamp().to_string()),
        ]);
        let signature = pay_sign(&credentials, &self.config.api_key);
        credentials.insert("paySign".to_string(), signature);
        credentials.insert("prepay_id".to_string(), prepay_id);

        debug!(notify_url = %self.config.notify_url, subject = %request.subject, "Prepay created");
        info!("Payment intent created");
        Ok(credentials)
    }

    fn parse_callback(&self, payload: &[u8]) -> Result<CallbackResult, GatewayError> {
        debug!(bytes = payload.len(), "Parsing callback");
        let parsed: CallbackPayload = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::MalformedCallback(e.to_string()))?;

        let result = CallbackResult::from(parsed);
        if result.order_id.trim().is_empty() {
            return Err(GatewayError::MalformedCallback(
                "callback carries no order id".to_string(),
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> WeChatPayGateway {
        WeChatPayGateway::new(WeChatConfig {
            app_id: "wx_app".into(),
            mch_id: "1900000001".into(),
            api_key: "secret".into(),
            notify_url: "https://store.example/pay/notify".into(),
        })
    }

    fn request(amount_minor: i64) -> PaymentRequest {
        PaymentRequest {
            order_id: "ord_1".into(),
            amount_minor,
            subject: "Convenience Store Order".into(),
        }
    }

    #[tokio::test]
    async fn builds_signed_credentials() {
        let gateway = configured();
        let credentials = gateway.create_payment_intent(&request(900)).await.unwrap();

        for key in ["appId", "prepay_id", "package", "nonceStr", "timeStamp", "signType", "paySign"] {
            assert!(credentials.contains_key(key), "missing {key}");
        }
        assert_eq!(credentials["appId"], "wx_app");
        assert_eq!(
            credentials["package"],
            format!("prepay_id={}", credentials["prepay_id"])
        );

        let signed: BTreeMap<_, _> = credentials
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "paySign" | "prepay_id"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        assert_eq!(credentials["paySign"], pay_sign(&signed, "secret"));
        assert_eq!(credentials["paySign"].len(), 64);
    }

    #[tokio::test]
    async fn incomplete_config_is_unavailable() {
        let gateway = WeChatPayGateway::new(WeChatConfig {
            app_id: "wx_app".into(),
            ..Default::default()
        });
        let err = gateway.create_payment_intent(&request(900)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(ref msg) if msg.contains("mch_id")));
    }

    #[tokio::test]
    async fn non_positive_amounts_are_refused() {
        let err = configured()
            .create_payment_intent(&request(0))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
    }

    #[test]
    fn signature_depends_on_key_and_fields() {
        let fields = BTreeMap::from([("a".to_string(), "1".to_string())]);
        assert_ne!(pay_sign(&fields, "k1"), pay_sign(&fields, "k2"));
        let with_empty = BTreeMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), String::new()),
        ]);
        assert_eq!(pay_sign(&fields, "k1"), pay_sign(&with_empty, "k1"));
    }

    #[test]
    fn parses_both_callback_shapes() {
        let gateway = configured();
        assert_eq!(
            gateway
                .parse_callback(br#"{"order_id":"ord_1","success":true}"#)
                .unwrap(),
            CallbackResult {
                order_id: "ord_1".into(),
                success: true
            }
        );
        assert_eq!(
            gateway
                .parse_callback(br#"{"out_trade_no":"ord_2","trade_state":"PAYERROR"}"#)
                .unwrap(),
            CallbackResult {
                order_id: "ord_2".into(),
                success: false
            }
        );
    }

    #[test]
    fn rejects_garbage_and_missing_ids() {
        let gateway = configured();
        let payloads: [&[u8]; 3] = [
            b"not json",
            br#"{"success":true}"#,
            br#"{"order_id":"","success":true}"#,
        ];
        for payload in payloads {
            assert!(matches!(
                gateway.parse_callback(payload),
                Err(GatewayError::MalformedCallback(_))
            ));
        }
    }
}
