//! Settings record and normalization.
//!
//! The backend stores settings as a flat string map and may omit keys or
//! hand back blank values. Normalization always yields a complete record:
//! every field is either a trimmed override or its compiled-in default, and
//! the SOCKS5 flag always agrees with its address field.

use std::collections::HashMap;

use serde::Serialize;

pub const DEFAULT_FAKE_IP_RANGE: &str = "f2b0::/18";
pub const DEFAULT_DOMESTIC_DNS: &str = "114.114.114.114";
pub const DEFAULT_SOCKS5_ADDRESS: &str = "127.0.0.1:7891";
pub const DEFAULT_PROXY_INBOUND: &str = "127.0.0.1:7874";
pub const DEFAULT_FORWARD_ECS: &str = "2408:8214:213::1";
pub const DEFAULT_DOMESTIC_FAKE_DNS: &str = "udp://127.0.0.1:7874";
pub const DEFAULT_LISTEN_7777: &str = ":7777";
pub const DEFAULT_LISTEN_8888: &str = ":8888";

/// The complete, defaulted set of operator-configurable values used to
/// render the config template.
///
/// `enable_socks5` is derived, never stored independently: it is true
/// exactly when the SOCKS5 address is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    pub fake_ip_range: String,
    pub domestic_dns: String,
    pub socks5_address: String,
    pub proxy_inbound_address: String,
    pub forward_ecs_address: String,
    pub domestic_fake_dns_address: String,
    pub listen_address_7777: String,
    pub listen_address_8888: String,
    pub aliyun_doh_ecs_ip: String,
    pub aliyun_doh_id: String,
    pub aliyun_doh_key_id: String,
    pub aliyun_doh_key_secret: String,
    pub enable_socks5: bool,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            fake_ip_range: DEFAULT_FAKE_IP_RANGE.to_string(),
            domestic_dns: DEFAULT_DOMESTIC_DNS.to_string(),
            socks5_address: DEFAULT_SOCKS5_ADDRESS.to_string(),
            proxy_inbound_address: DEFAULT_PROXY_INBOUND.to_string(),
            forward_ecs_address: DEFAULT_FORWARD_ECS.to_string(),
            domestic_fake_dns_address: DEFAULT_DOMESTIC_FAKE_DNS.to_string(),
            listen_address_7777: DEFAULT_LISTEN_7777.to_string(),
            listen_address_8888: DEFAULT_LISTEN_8888.to_string(),
            aliyun_doh_ecs_ip: String::new(),
            aliyun_doh_id: String::new(),
            aliyun_doh_key_id: String::new(),
            aliyun_doh_key_secret: String::new(),
            enable_socks5: true,
        }
    }
}

/// Trim-then-default: absent or blank values degrade to the default.
fn resolve(source: &HashMap<String, String>, key: &str, default: &str) -> String {
    match source.get(key) {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => default.to_string(),
    }
}

impl SettingsRecord {
    /// Merges a partial backend map against the default table.
    ///
    /// Every field follows trim-then-default, except the SOCKS5 address: an
    /// explicitly blank address stays blank and means "disabled". Unknown
    /// keys in `source` are ignored. Pure, no error conditions.
    #[must_use]
    pub fn normalize(source: &HashMap<String, String>) -> Self {
        let socks5_address = match source.get("socks5Address") {
            Some(value) => value.trim().to_string(),
            None => DEFAULT_SOCKS5_ADDRESS.to_string(),
        };
        let enable_socks5 = !socks5_address.is_empty();
        Self {
            fake_ip_range: resolve(source, "fakeIpRange", DEFAULT_FAKE_IP_RANGE),
            domestic_dns: resolve(source, "domesticDns", DEFAULT_DOMESTIC_DNS),
            socks5_address,
            proxy_inbound_address: resolve(source, "proxyInboundAddress", DEFAULT_PROXY_INBOUND),
            forward_ecs_address: resolve(source, "forwardEcsAddress", DEFAULT_FORWARD_ECS),
            domestic_fake_dns_address: resolve(
                source,
                "domesticFakeDnsAddress",
                DEFAULT_DOMESTIC_FAKE_DNS,
            ),
            listen_address_7777: resolve(source, "listenAddress7777", DEFAULT_LISTEN_7777),
            listen_address_8888: resolve(source, "listenAddress8888", DEFAULT_LISTEN_8888),
            aliyun_doh_ecs_ip: resolve(source, "aliyunDohEcsIp", ""),
            aliyun_doh_id: resolve(source, "aliyunDohId", ""),
            aliyun_doh_key_id: resolve(source, "aliyunDohKeyId", ""),
            aliyun_doh_key_secret: resolve(source, "aliyunDohKeySecret", ""),
            enable_socks5,
        }
    }

    /// Stringifies the full record for the settings PUT body.
    ///
    /// The backend only accepts string values, so the derived flag goes out
    /// as `"true"`/`"false"`. The backend merges key-wise, so sending the
    /// full record never clears unrelated stored keys.
    #[must_use]
    pub fn to_payload(&self) -> HashMap<String, String> {
        HashMap::from([
            ("fakeIpRange".to_string(), self.fake_ip_range.clone()),
            ("domesticDns".to_string(), self.domestic_dns.clone()),
            ("socks5Address".to_string(), self.socks5_address.clone()),
            (
                "proxyInboundAddress".to_string(),
                self.proxy_inbound_address.clone(),
            ),
            (
                "forwardEcsAddress".to_string(),
                self.forward_ecs_address.clone(),
            ),
            (
                "domesticFakeDnsAddress".to_string(),
                self.domestic_fake_dns_address.clone(),
            ),
            (
                "listenAddress7777".to_string(),
                self.listen_address_7777.clone(),
            ),
            (
                "listenAddress8888".to_string(),
                self.listen_address_8888.clone(),
            ),
            ("aliyunDohEcsIp".to_string(), self.aliyun_doh_ecs_ip.clone()),
            ("aliyunDohId".to_string(), self.aliyun_doh_id.clone()),
            ("aliyunDohKeyId".to_string(), self.aliyun_doh_key_id.clone()),
            (
                "aliyunDohKeySecret".to_string(),
                self.aliyun_doh_key_secret.clone(),
            ),
            ("enableSocks5".to_string(), self.enable_socks5.to_string()),
        ])
    }

    /// Whether the four fields edited in the preferences dialog still hold
    /// their defaults. Drives the confirmation shown before downloading a
    /// config rendered from untouched preferences.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.fake_ip_range == DEFAULT_FAKE_IP_RANGE
            && self.domestic_dns == DEFAULT_DOMESTIC_DNS
            && self.socks5_address == DEFAULT_SOCKS5_ADDRESS
            && self.proxy_inbound_address == DEFAULT_PROXY_INBOUND
    }
}

/// Tolerant bool reading for stringly settings values such as
/// `autoRefreshLogs`. Only the exact words `true`/`false` (any case) count;
/// everything else keeps the fallback.
#[must_use]
pub fn parse_bool(value: &str, fallback: bool) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => fallback,
    }
}
