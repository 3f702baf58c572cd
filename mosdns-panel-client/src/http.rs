//! HTTP implementation of [`PanelBackend`].
//!
//! One thin wrapper per REST operation, all funneled through a shared
//! request/response pipeline: send, log, map transport errors, surface
//! non-success statuses with the message the backend put in the body.
//!
//! Failed requests are never retried here. The panel surfaces every failure
//! and waits for the operator to trigger the operation again.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BackendError, Result};
use crate::traits::PanelBackend;
use crate::types::{
    ConfigStatus, ConfigTreePayload, DownloadReport, KernelUpdateReport, LogsPayload, ReleaseInfo,
    SaveFileAck, SaveFileRequest, SaveListAck, SaveListRequest, ServiceSnapshot, SetSwitchRequest,
    SettingsPayload, SwitchPayload, UpdateConfigPathRequest,
};
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// 下载/更新类请求超时（秒）。后端侧这两类操作最长运行 2 分钟。
const SLOW_REQUEST_TIMEOUT_SECS: u64 = 150;

/// 服务生命周期端点
const SERVICE_ENDPOINT: &str = "/api/services/mosdns";

/// 创建带超时与 Cookie 会话的 HTTP Client
fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// HTTP implementation of the panel backend.
///
/// Holds a shared [`reqwest::Client`] with a cookie store, so the login
/// session issued by the backend rides along on every call.
pub struct HttpPanelBackend {
    client: Client,
    base_url: String,
}

impl HttpPanelBackend {
    /// Creates a backend rooted at `base_url`, e.g. `http://127.0.0.1:8190`.
    ///
    /// A trailing slash on `base_url` is tolerated and stripped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(create_http_client(), base_url)
    }

    /// Creates a backend with a caller-supplied client.
    ///
    /// The client should keep a cookie store enabled, otherwise the backend
    /// session is dropped between requests.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// The base URL requests are addressed to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// 统一请求流程：发送、记录日志、映射传输错误、检查状态码。
    async fn execute(builder: RequestBuilder, method: &str, endpoint: &str) -> Result<String> {
        log::debug!("{method} {endpoint}");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            } else {
                BackendError::NetworkError {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        log::debug!("[{endpoint}] Response Status: {status}");

        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::NetworkError {
                endpoint: endpoint.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{endpoint}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        if !status.is_success() {
            let message = extract_error_message(&response_text, status);
            if status.is_client_error() {
                log::warn!("[{endpoint}] API error (HTTP {status}): {message}");
            } else {
                log::error!("[{endpoint}] API error (HTTP {status}): {message}");
            }
            return Err(BackendError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response_text)
    }

    /// 解析 JSON 响应
    fn parse_json<T>(response_text: &str, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{endpoint}] JSON parse failed: {e}");
            log::error!(
                "[{endpoint}] Raw response: {}",
                truncate_for_log(response_text)
            );
            BackendError::ParseError {
                endpoint: endpoint.to_string(),
                detail: e.to_string(),
            }
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let text = Self::execute(self.client.get(self.url(path)), "GET", path).await?;
        Self::parse_json(&text, path)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        Self::execute(self.client.get(self.url(path)), "GET", path).await
    }

    async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        log_request_body(path, body);
        let builder = self.client.put(self.url(path)).json(body);
        let text = Self::execute(builder, "PUT", path).await?;
        Self::parse_json(&text, path)
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        log_request_body(path, body);
        let builder = self.client.post(self.url(path)).json(body);
        let text = Self::execute(builder, "POST", path).await?;
        Self::parse_json(&text, path)
    }

    /// 无请求体的 POST。`timeout` 用于下载/更新这类长操作覆盖默认超时。
    async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let mut builder = self.client.post(self.url(path));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let text = Self::execute(builder, "POST", path).await?;
        Self::parse_json(&text, path)
    }
}

/// 请求体调试日志（序列化失败时降级为占位文本）
fn log_request_body<B: Serialize + ?Sized>(endpoint: &str, body: &B) {
    let body_json =
        serde_json::to_string(body).unwrap_or_else(|_| "<unserializable body>".to_string());
    log::debug!("[{endpoint}] Request Body: {}", truncate_for_log(&body_json));
}

/// Extracts a human-readable message from an error response body.
///
/// The backend answers failures with `{"error": "..."}`; a few proxied
/// responses use `{"message": "..."}` instead. Falls back to the HTTP status
/// line when the body is not JSON or carries neither field.
fn extract_error_message(body: &str, status: StatusCode) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(msg) = parsed.error.filter(|m| !m.trim().is_empty()) {
            return msg;
        }
        if let Some(msg) = parsed.message.filter(|m| !m.trim().is_empty()) {
            return msg;
        }
    }
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
}

#[async_trait]
impl PanelBackend for HttpPanelBackend {
    async fn fetch_service_status(&self) -> Result<ServiceSnapshot> {
        self.get_json(SERVICE_ENDPOINT).await
    }

    async fn start_service(&self) -> Result<ServiceSnapshot> {
        self.post_empty(&format!("{SERVICE_ENDPOINT}/start"), None)
            .await
    }

    async fn stop_service(&self) -> Result<ServiceSnapshot> {
        self.post_empty(&format!("{SERVICE_ENDPOINT}/stop"), None)
            .await
    }

    async fn restart_service(&self) -> Result<ServiceSnapshot> {
        self.post_empty(&format!("{SERVICE_ENDPOINT}/restart"), None)
            .await
    }

    async fn fetch_logs(&self) -> Result<LogsPayload> {
        self.get_json("/api/mosdns/logs").await
    }

    async fn fetch_config_status(&self) -> Result<ConfigStatus> {
        self.get_json("/api/mosdns/config").await
    }

    async fn update_config_path(&self, path: &str) -> Result<ConfigStatus> {
        let body = UpdateConfigPathRequest {
            path: path.to_string(),
        };
        self.put_json("/api/mosdns/config", &body).await
    }

    async fn download_config(&self) -> Result<DownloadReport> {
        self.post_empty(
            "/api/mosdns/config/download",
            Some(Duration::from_secs(SLOW_REQUEST_TIMEOUT_SECS)),
        )
        .await
    }

    async fn fetch_config_tree(&self) -> Result<ConfigTreePayload> {
        self.get_json("/api/mosdns/config/content").await
    }

    async fn save_config_file(&self, path: &str, content: &str) -> Result<SaveFileAck> {
        let endpoint = format!(
            "/api/mosdns/config/file?file={}",
            urlencoding::encode(path)
        );
        let body = SaveFileRequest {
            path: path.to_string(),
            content: content.to_string(),
        };
        self.put_json(&endpoint, &body).await
    }

    async fn fetch_settings(&self) -> Result<SettingsPayload> {
        self.get_json("/api/settings").await
    }

    async fn save_settings(&self, values: &HashMap<String, String>) -> Result<SettingsPayload> {
        self.put_json("/api/settings", values).await
    }

    async fn fetch_list(&self, tag: &str) -> Result<String> {
        self.get_text(&format!("/api/mosdns/lists/{tag}")).await
    }

    async fn save_list(&self, tag: &str, values: &[String]) -> Result<SaveListAck> {
        let body = SaveListRequest {
            values: values.to_vec(),
        };
        self.post_json(&format!("/api/mosdns/lists/{tag}"), &body)
            .await
    }

    async fn fetch_switch(&self, tag: &str) -> Result<SwitchPayload> {
        self.get_json(&format!("/api/mosdns/switches/{tag}")).await
    }

    async fn save_switch(&self, tag: &str, value: &str) -> Result<SwitchPayload> {
        let body = SetSwitchRequest {
            value: value.to_string(),
        };
        self.post_json(&format!("/api/mosdns/switches/{tag}"), &body)
            .await
    }

    async fn fetch_latest_release(&self) -> Result<ReleaseInfo> {
        self.get_json("/api/mosdns/kernel/latest").await
    }

    async fn update_kernel(&self) -> Result<KernelUpdateReport> {
        self.post_empty(
            "/api/mosdns/kernel/update",
            Some(Duration::from_secs(SLOW_REQUEST_TIMEOUT_SECS)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- extract_error_message ----

    #[test]
    fn error_field_preferred() {
        let msg = extract_error_message(r#"{"error":"配置路径不能为空"}"#, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "配置路径不能为空");
    }

    #[test]
    fn message_field_as_fallback() {
        let msg = extract_error_message(r#"{"message":"not found"}"#, StatusCode::NOT_FOUND);
        assert_eq!(msg, "not found");
    }

    #[test]
    fn blank_error_field_skipped() {
        let msg = extract_error_message(
            r#"{"error":"  ","message":"real cause"}"#,
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(msg, "real cause");
    }

    #[test]
    fn non_json_body_uses_status_line() {
        let msg = extract_error_message("<html>oops</html>", StatusCode::BAD_GATEWAY);
        assert_eq!(msg, "Bad Gateway");
    }

    #[test]
    fn empty_json_uses_status_line() {
        let msg = extract_error_message("{}", StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal Server Error");
    }

    // ---- URL joining ----

    #[test]
    fn trailing_slash_stripped() {
        let backend = HttpPanelBackend::new("http://127.0.0.1:8190/");
        assert_eq!(backend.base_url(), "http://127.0.0.1:8190");
        assert_eq!(
            backend.url("/api/settings"),
            "http://127.0.0.1:8190/api/settings"
        );
    }

    #[test]
    fn file_query_parameter_is_encoded() {
        let encoded = urlencoding::encode("rules/白名单 v2.txt");
        assert_eq!(
            encoded.as_ref(),
            "rules%2F%E7%99%BD%E5%90%8D%E5%8D%95%20v2.txt"
        );
    }
}
