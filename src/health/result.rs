//! 探测结果数据结构
//!
//! 定义单次探测结果、状态枚举以及一批检测结果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// 响应时间达到该阈值即显示为无穷大
pub const SLOW_RESPONSE_THRESHOLD: Duration = Duration::from_secs(3);

/// 无穷大响应时间的显示值
pub const INFINITE_SENTINEL: &str = "∞";

/// 探测状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// 返回 200
    Healthy,
    /// 返回了非 200 的状态码
    StatusCode(u16),
    /// 手动检测时请求失败
    NotHealthy,
    /// 自动刷新时请求失败
    NotReachable,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Healthy => write!(f, "Healthy"),
            ProbeStatus::StatusCode(code) => write!(f, "Status: {code}"),
            ProbeStatus::NotHealthy => write!(f, "Not Healthy"),
            ProbeStatus::NotReachable => write!(f, "Not reachable"),
        }
    }
}

impl ProbeStatus {
    /// 根据HTTP状态码分类
    pub fn from_status_code(code: u16) -> Self {
        if code == 200 {
            ProbeStatus::Healthy
        } else {
            ProbeStatus::StatusCode(code)
        }
    }

    /// 判断状态是否为健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeStatus::Healthy)
    }

    /// 判断请求是否根本没有拿到响应
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeStatus::NotHealthy | ProbeStatus::NotReachable)
    }

    /// 获取状态码（如果有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProbeStatus::Healthy => Some(200),
            ProbeStatus::StatusCode(code) => Some(*code),
            _ => None,
        }
    }
}

/// 请求失败时使用的状态标签
///
/// 手动检测与自动刷新对失败的描述不同，两者都需要保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureLabel {
    /// "Not Healthy"
    NotHealthy,
    /// "Not reachable"
    NotReachable,
}

impl From<FailureLabel> for ProbeStatus {
    fn from(label: FailureLabel) -> Self {
        match label {
            FailureLabel::NotHealthy => ProbeStatus::NotHealthy,
            FailureLabel::NotReachable => ProbeStatus::NotReachable,
        }
    }
}

/// 显示用的响应时间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResponseTime {
    /// 实际测得的时间
    Measured(Duration),
    /// 失败或过慢
    Infinite,
}

impl ResponseTime {
    /// 按慢响应阈值换算显示值
    ///
    /// 慢但成功的响应与失败显示相同。
    pub fn from_elapsed(elapsed: Duration) -> Self {
        if elapsed >= SLOW_RESPONSE_THRESHOLD {
            ResponseTime::Infinite
        } else {
            ResponseTime::Measured(elapsed)
        }
    }

    /// 是否为无穷大
    pub fn is_infinite(&self) -> bool {
        matches!(self, ResponseTime::Infinite)
    }
}

impl fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseTime::Measured(elapsed) => write!(f, "{:.2}s", elapsed.as_secs_f64()),
            ResponseTime::Infinite => write!(f, "{INFINITE_SENTINEL}"),
        }
    }
}

impl FromStr for ResponseTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == INFINITE_SENTINEL {
            return Ok(ResponseTime::Infinite);
        }
        let secs = s
            .strip_suffix('s')
            .and_then(|n| n.parse::<f64>().ok())
            .filter(|n| n.is_finite() && *n >= 0.0)
            .ok_or_else(|| format!("无效的响应时间: {s}"))?;
        Ok(ResponseTime::Measured(Duration::from_secs_f64(secs)))
    }
}

impl From<ResponseTime> for String {
    fn from(value: ResponseTime) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ResponseTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 单个URL的探测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// 序号（从1开始，按输入顺序）
    #[serde(rename = "no")]
    pub sequence_number: u32,
    /// 实际请求的URL
    pub url: String,
    /// 探测状态
    pub status: ProbeStatus,
    /// 显示用响应时间
    pub response_time: ResponseTime,
    /// 实际耗时
    #[serde(with = "duration_serde", rename = "elapsed_ms")]
    pub elapsed: Duration,
    /// 错误信息（如果有）
    pub error_message: Option<String>,
    /// 检测时间戳
    pub timestamp: DateTime<Utc>,
}

impl ProbeResult {
    /// 创建新的探测结果
    pub fn new(
        sequence_number: u32,
        url: String,
        status: ProbeStatus,
        response_time: ResponseTime,
        elapsed: Duration,
    ) -> Self {
        Self {
            sequence_number,
            url,
            status,
            response_time,
            elapsed,
            error_message: None,
            timestamp: Utc::now(),
        }
    }

    /// 设置序号
    pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    /// 设置错误信息
    pub fn with_error(mut self, error_message: String) -> Self {
        self.error_message = Some(error_message);
        self
    }

    /// 获取实际耗时（毫秒）
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Duration序列化模块
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// 触发检测的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckTrigger {
    /// 用户点击 "Check All"
    Manual,
    /// 定时刷新最近URL
    AutoRefresh,
}

impl CheckTrigger {
    /// 该触发来源使用的失败标签
    pub fn failure_label(&self) -> FailureLabel {
        match self {
            CheckTrigger::Manual => FailureLabel::NotHealthy,
            CheckTrigger::AutoRefresh => FailureLabel::NotReachable,
        }
    }
}

impl fmt::Display for CheckTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckTrigger::Manual => write!(f, "manual"),
            CheckTrigger::AutoRefresh => write!(f, "auto-refresh"),
        }
    }
}

/// 一次触发产生的完整结果表，整体替换上一次的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckBatch {
    /// 批次ID
    pub id: Uuid,
    /// 触发来源
    pub trigger: CheckTrigger,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 按序号排列的结果
    pub results: Vec<ProbeResult>,
}

impl CheckBatch {
    /// 创建新的结果批次
    pub fn new(trigger: CheckTrigger, results: Vec<ProbeResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            trigger,
            started_at: Utc::now(),
            results,
        }
    }

    /// 结果数量
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// 是否没有任何结果
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 健康的URL数量
    pub fn healthy_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status.is_healthy())
            .count()
    }

    /// 本批次检测过的URL（按序号）
    pub fn urls(&self) -> Vec<String> {
        self.results.iter().map(|r| r.url.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_status_display() {
        assert_eq!(ProbeStatus::Healthy.to_string(), "Healthy");
        assert_eq!(ProbeStatus::StatusCode(404).to_string(), "Status: 404");
        assert_eq!(ProbeStatus::NotHealthy.to_string(), "Not Healthy");
        assert_eq!(ProbeStatus::NotReachable.to_string(), "Not reachable");
    }

    #[test]
    fn test_probe_status_from_status_code() {
        assert_eq!(ProbeStatus::from_status_code(200), ProbeStatus::Healthy);
        assert_eq!(
            ProbeStatus::from_status_code(204),
            ProbeStatus::StatusCode(204)
        );
        assert_eq!(
            ProbeStatus::from_status_code(500),
            ProbeStatus::StatusCode(500)
        );
        assert_eq!(ProbeStatus::StatusCode(500).status_code(), Some(500));
        assert_eq!(ProbeStatus::NotHealthy.status_code(), None);
    }

    #[test]
    fn test_failure_labels_stay_distinct() {
        assert_eq!(
            ProbeStatus::from(CheckTrigger::Manual.failure_label()),
            ProbeStatus::NotHealthy
        );
        assert_eq!(
            ProbeStatus::from(CheckTrigger::AutoRefresh.failure_label()),
            ProbeStatus::NotReachable
        );
        assert!(ProbeStatus::NotHealthy.is_failure());
        assert!(!ProbeStatus::StatusCode(503).is_failure());
    }

    #[test]
    fn test_response_time_threshold() {
        let fast = ResponseTime::from_elapsed(Duration::from_secs(1));
        assert_eq!(fast.to_string(), "1.00s");

        let just_below = ResponseTime::from_elapsed(Duration::from_millis(2999));
        assert_eq!(just_below.to_string(), "3.00s");
        assert!(!just_below.is_infinite());

        assert!(ResponseTime::from_elapsed(Duration::from_secs(3)).is_infinite());
        assert_eq!(
            ResponseTime::from_elapsed(Duration::from_millis(3500)).to_string(),
            "∞"
        );
    }

    #[test]
    fn test_response_time_parse() {
        assert_eq!("∞".parse::<ResponseTime>(), Ok(ResponseTime::Infinite));
        assert_eq!(
            "0.25s".parse::<ResponseTime>(),
            Ok(ResponseTime::Measured(Duration::from_millis(250)))
        );
        assert!("fast".parse::<ResponseTime>().is_err());
        assert!("-1s".parse::<ResponseTime>().is_err());
    }

    #[test]
    fn test_probe_result_json_uses_display_values() {
        let result = ProbeResult::new(
            0,
            "http://example.com".to_string(),
            ProbeStatus::StatusCode(404),
            ResponseTime::Measured(Duration::from_millis(420)),
            Duration::from_millis(420),
        )
        .with_sequence_number(2);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["no"], 2);
        assert_eq!(json["response_time"], "0.42s");
        assert_eq!(json["elapsed_ms"], 420);
        assert_eq!(json["status"]["status_code"], 404);

        let back: ProbeResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, ProbeStatus::StatusCode(404));
        assert_eq!(back.sequence_number, 2);
    }

    #[test]
    fn test_check_batch_summary() {
        let results = vec![
            ProbeResult::new(
                1,
                "http://a".to_string(),
                ProbeStatus::Healthy,
                ResponseTime::Measured(Duration::from_millis(10)),
                Duration::from_millis(10),
            ),
            ProbeResult::new(
                2,
                "http://b".to_string(),
                ProbeStatus::NotHealthy,
                ResponseTime::Infinite,
                Duration::from_secs(5),
            )
            .with_error("Request timeout".to_string()),
        ];
        let batch = CheckBatch::new(CheckTrigger::Manual, results);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.healthy_count(), 1);
        assert_eq!(batch.urls(), vec!["http://a", "http://b"]);
        assert!(!batch.is_empty());
    }
}
