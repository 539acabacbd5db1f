use crate::error::{CatalogError, Result};
use crate::models::RefreshReport;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 统一响应信封 - 所有接口都返回 success 标志、成功载荷或错误描述
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// 搜索接口返回的匹配总数
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 解包后的成功载荷
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T> {
    pub data: T,
    pub total: Option<usize>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            total: None,
            error: None,
            message: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            total: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// 转换为 Result，失败信封带上服务端原因
    pub fn into_payload(self) -> Result<Payload<T>> {
        if !self.success {
            let reason = self.error.unwrap_or_else(|| "未知错误".to_string());
            tracing::warn!(%reason, "接口返回失败");
            return Err(CatalogError::Remote(reason));
        }

        let data = self.data.ok_or_else(|| {
            tracing::warn!("响应缺少 data 字段");
            CatalogError::Transport("响应缺少 data 字段".to_string())
        })?;

        Ok(Payload {
            data,
            total: self.total,
            message: self.message,
        })
    }
}

/// 从 JSON 文本解析信封，格式错误归类为传输错误
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    serde_json::from_str(body).map_err(|err| {
        tracing::warn!(%err, len = body.len(), "响应解析失败");
        CatalogError::from(err)
    })
}

/// 解析并解包，成功时返回载荷
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<Payload<T>> {
    decode::<T>(body)?.into_payload()
}

/// 更新文章库的响应没有 data 字段，计数直接放在信封顶层
#[derive(Deserialize)]
struct RefreshEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    report: RefreshReport,
}

pub fn decode_refresh(body: &str) -> Result<RefreshReport> {
    let envelope: RefreshEnvelope = serde_json::from_str(body).map_err(|err| {
        tracing::warn!(%err, "更新响应解析失败");
        CatalogError::from(err)
    })?;
    if !envelope.success {
        let reason = envelope.error.unwrap_or_else(|| "未知错误".to_string());
        tracing::warn!(%reason, "更新文章库失败");
        return Err(CatalogError::Remote(reason));
    }
    Ok(envelope.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    #[test]
    fn success_envelope_yields_payload() {
        let body = r#"{"success": true, "data": [{"id": 1}, {"id": 2}], "total": 40}"#;
        let payload = decode_payload::<Vec<ArticleRecord>>(body).unwrap();
        assert_eq!(payload.data.len(), 2);
        assert_eq!(payload.total, Some(40));
    }

    #[test]
    fn failure_envelope_carries_server_reason() {
        let body = r#"{"success": false, "error": "搜索关键词不能为空"}"#;
        let err = decode_payload::<Vec<ArticleRecord>>(body).unwrap_err();
        assert_eq!(err, CatalogError::Remote("搜索关键词不能为空".to_string()));
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_body_is_transport_failure() {
        let err = decode_payload::<Vec<ArticleRecord>>("<html>502</html>").unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn refresh_counters_sit_at_top_level() {
        let body = r#"{"success": true, "message": "爬取:10 | 保存:8", "crawled_count": 10, "saved_count": 8}"#;
        let report = decode_refresh(body).unwrap();
        assert_eq!(report.message, "爬取:10 | 保存:8");
        assert_eq!(report.saved_count, Some(8));
        assert_eq!(report.failed_count, None);

        let err = decode_refresh(r#"{"success": false, "error": "timeout"}"#).unwrap_err();
        assert_eq!(err, CatalogError::Remote("timeout".into()));
    }

    #[test]
    fn success_without_data_is_transport_failure() {
        let err = decode_payload::<Vec<ArticleRecord>>(r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }
}
