//! 结果输出格式化
//!
//! 把检测批次渲染成文本、表格或JSON

use crate::cli::args::OutputFormat;
use crate::health::CheckBatch;

/// 表格最小列宽：No、URL、Status、Response Time
const COLUMN_WIDTHS: [usize; 4] = [4, 48, 16, 14];

/// 渲染一批检测结果
pub fn render_batch(batch: &CheckBatch, format: &OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(batch),
        OutputFormat::Table => Ok(render_table(batch)),
        OutputFormat::Text => Ok(render_text(batch)),
    }
}

/// 渲染最近URL列表
pub fn render_recent(urls: &[String], format: &OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(urls),
        _ if urls.is_empty() => Ok("暂无最近检测的URL".to_string()),
        _ => Ok(urls
            .iter()
            .enumerate()
            .map(|(i, url)| format!("{}. {}", i + 1, url))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn render_text(batch: &CheckBatch) -> String {
    if batch.is_empty() {
        return "没有可检测的URL".to_string();
    }

    let mut lines = Vec::with_capacity(batch.len());
    for result in &batch.results {
        let status_icon = if result.status.is_healthy() {
            "✓"
        } else {
            "✗"
        };
        let mut line = format!(
            "{} {}. {} - {} ({})",
            status_icon, result.sequence_number, result.url, result.status, result.response_time
        );
        if let Some(error) = &result.error_message {
            line.push_str(&format!("\n  错误: {error}"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn render_table(batch: &CheckBatch) -> String {
    let [no_w, min_url_w, status_w, time_w] = COLUMN_WIDTHS;
    // URL列按最长的URL加宽
    let url_w = batch
        .results
        .iter()
        .map(|result| result.url.chars().count())
        .fold(min_url_w, usize::max);
    let mut out = String::new();

    out.push_str(&format!(
        "URL Check Results ({}, {}, {}/{} healthy)\n",
        batch.trigger,
        batch.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        batch.healthy_count(),
        batch.len()
    ));
    out.push_str(&format!(
        "{:<no_w$} {:<url_w$} {:<status_w$} {:<time_w$}\n",
        "No", "URL", "Status", "Response Time"
    ));
    out.push_str(&"-".repeat(no_w + url_w + status_w + time_w + 3));

    for result in &batch.results {
        out.push_str(&format!(
            "\n{:<no_w$} {:<url_w$} {:<status_w$} {:<time_w$}",
            result.sequence_number,
            result.url,
            result.status.to_string(),
            result.response_time.to_string()
        ));
    }
    out
}
