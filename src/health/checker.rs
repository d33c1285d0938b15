//! HTTP探测器实现
//!
//! 对单个URL发起一次GET请求，测量耗时并分类结果

use crate::error::ProbeError;
use crate::health::result::{FailureLabel, ProbeResult, ProbeStatus, ResponseTime};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 默认请求超时时间
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 探测器trait，定义单次探测接口
#[async_trait]
pub trait Prober: Send + Sync {
    /// 探测一个URL
    ///
    /// 不会返回错误：所有网络失败都以 `failure` 对应的状态体现在结果里。
    /// 返回结果的序号为0，由调用方分配。
    async fn probe(&self, url: &str, failure: FailureLabel) -> ProbeResult;
}

/// 补全URL协议前缀
///
/// 没有 `http://` 或 `https://` 前缀时补上 `http://`。
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// 基于reqwest的HTTP探测器
#[derive(Debug, Clone)]
pub struct HttpProber {
    /// HTTP客户端
    client: Client,
    /// 请求超时时间
    timeout: Duration,
}

impl HttpProber {
    /// 创建新的HTTP探测器
    ///
    /// # 参数
    /// * `timeout` - 单次请求超时时间
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, timeout })
    }

    /// 超时时间
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 格式化请求错误信息
    fn format_request_error(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timeout".to_string()
        } else if error.is_connect() {
            let detail = error_chain(error);
            if detail.contains("dns") || detail.contains("resolve") {
                "DNS resolution failed".to_string()
            } else if detail.contains("certificate") || detail.contains("tls") {
                "SSL/TLS certificate error".to_string()
            } else {
                "Connection refused".to_string()
            }
        } else if error.is_builder() {
            "Invalid URL".to_string()
        } else if error.is_redirect() {
            "Too many redirects".to_string()
        } else if error.is_body() || error.is_decode() {
            format!("Response body error: {}", error_chain(error))
        } else {
            format!("Request failed: {error}")
        }
    }
}

/// 拼接错误链，便于识别底层原因
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message.to_lowercase()
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str, failure: FailureLabel) -> ProbeResult {
        let url = normalize_url(url);
        let start_time = Instant::now();

        // 计时包含读取完整响应体
        let response = match self.client.get(&url).send().await {
            Ok(response) => {
                let code = response.status().as_u16();
                response.bytes().await.map(|_| code)
            }
            Err(e) => Err(e),
        };
        let elapsed = start_time.elapsed();

        match response {
            Ok(code) => {
                let status = ProbeStatus::from_status_code(code);
                let response_time = ResponseTime::from_elapsed(elapsed);
                debug!("URL {}: {} ({})", url, status, response_time);

                ProbeResult::new(0, url, status, response_time, elapsed)
            }
            Err(e) => {
                let message = Self::format_request_error(&e);
                warn!("URL {}: 请求失败 - {}", url, message);

                ProbeResult::new(0, url, failure.into(), ResponseTime::Infinite, elapsed)
                    .with_error(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::result::SLOW_RESPONSE_THRESHOLD;
    use std::io::Write;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(
            normalize_url("localhost:8080/health"),
            "http://localhost:8080/health"
        );
        // 只认小写前缀
        assert_eq!(normalize_url("HTTP://x"), "http://HTTP://x");
    }

    #[test]
    fn test_http_prober_creation() {
        let prober = HttpProber::new(DEFAULT_TIMEOUT);
        assert!(prober.is_ok());
        assert_eq!(prober.unwrap().timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_probe_healthy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.probe(&server.url(), FailureLabel::NotHealthy).await;

        mock.assert_async().await;
        assert_eq!(result.status, ProbeStatus::Healthy);
        assert_eq!(result.sequence_number, 0);
        assert!(!result.response_time.is_infinite());
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn test_probe_non_200_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let url = format!("{}/missing", server.url());
        let result = prober.probe(&url, FailureLabel::NotHealthy).await;

        assert_eq!(result.status, ProbeStatus::StatusCode(404));
        assert_eq!(result.status.to_string(), "Status: 404");
    }

    #[tokio::test]
    async fn test_probe_adds_scheme() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        // server.host_with_port() 不带协议前缀
        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober
            .probe(&server.host_with_port(), FailureLabel::NotHealthy)
            .await;

        assert_eq!(result.url, format!("http://{}", server.host_with_port()));
        assert_eq!(result.status, ProbeStatus::StatusCode(500));
    }

    #[tokio::test]
    async fn test_probe_connection_failure_labels() {
        // 端口 1 上通常没有服务监听
        let prober = HttpProber::new(Duration::from_secs(2)).unwrap();

        let manual = prober
            .probe("http://127.0.0.1:1", FailureLabel::NotHealthy)
            .await;
        assert_eq!(manual.status, ProbeStatus::NotHealthy);
        assert_eq!(manual.response_time, ResponseTime::Infinite);
        assert!(manual.error_message.is_some());

        let auto = prober
            .probe("http://127.0.0.1:1", FailureLabel::NotReachable)
            .await;
        assert_eq!(auto.status, ProbeStatus::NotReachable);
        assert_eq!(auto.response_time.to_string(), "∞");
    }

    #[tokio::test]
    async fn test_probe_invalid_url_is_failure() {
        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let result = prober.probe("http://", FailureLabel::NotHealthy).await;

        assert_eq!(result.status, ProbeStatus::NotHealthy);
        assert!(result.response_time.is_infinite());
    }

    /// 先发出一段响应体，停顿后再发出剩余部分
    fn stalled_body(
        pause: Duration,
    ) -> impl Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync + 'static {
        move |writer: &mut dyn Write| {
            writer.write_all(b"partial")?;
            writer.flush()?;
            std::thread::sleep(pause);
            writer.write_all(b" body")
        }
    }

    #[tokio::test]
    async fn test_slow_body_counts_toward_response_time() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow")
            .with_status(200)
            .with_chunked_body(stalled_body(Duration::from_millis(3500)))
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let url = format!("{}/slow", server.url());
        let result = prober.probe(&url, FailureLabel::NotHealthy).await;

        assert_eq!(result.status, ProbeStatus::Healthy);
        assert_eq!(result.response_time.to_string(), "∞");
        assert!(result.elapsed >= SLOW_RESPONSE_THRESHOLD);
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn test_slow_non_200_shows_infinite() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/slow-error")
            .with_status(503)
            .with_chunked_body(stalled_body(Duration::from_millis(3500)))
            .create_async()
            .await;

        let prober = HttpProber::new(DEFAULT_TIMEOUT).unwrap();
        let url = format!("{}/slow-error", server.url());
        let result = prober.probe(&url, FailureLabel::NotHealthy).await;

        assert_eq!(result.status.to_string(), "Status: 503");
        assert!(result.response_time.is_infinite());
    }

    #[tokio::test]
    async fn test_body_timeout_uses_failure_label() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stalled")
            .with_status(200)
            .with_chunked_body(stalled_body(Duration::from_secs(3)))
            .create_async()
            .await;

        let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
        let url = format!("{}/stalled", server.url());

        let manual = prober.probe(&url, FailureLabel::NotHealthy).await;
        assert_eq!(manual.status, ProbeStatus::NotHealthy);
        assert_eq!(manual.response_time, ResponseTime::Infinite);
        assert!(manual.error_message.is_some());
    }
}
