//! 文本工具 - 难度分析、摘要生成和智能分类
//!
//! 分析本身由远程接口完成。这里在本地拒绝空输入，组装请求，
//! 并把响应信封归类为结果或带操作前缀的错误。

use serde::{Deserialize, Serialize};
use utils_common::envelope::decode_payload;
use utils_common::error::{CatalogError, Result};

/// 默认摘要句数
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;

/// 难度分析请求
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub text: String,
}

impl AnalyzeRequest {
    pub fn new(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::Validation("请输入要分析的文本".to_string()));
        }
        Ok(Self { text: text.to_string() })
    }
}

/// 摘要算法，未识别的名称按 textrank 处理
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMethod {
    Lsa,
    Luhn,
    Lexrank,
    #[default]
    #[serde(other)]
    Textrank,
}

impl SummaryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMethod::Textrank => "textrank",
            SummaryMethod::Lsa => "lsa",
            SummaryMethod::Luhn => "luhn",
            SummaryMethod::Lexrank => "lexrank",
        }
    }
}

/// 摘要请求
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub text: String,
    pub method: SummaryMethod,
    pub sentences_count: usize,
}

impl SummaryRequest {
    pub fn new(text: &str, method: SummaryMethod, sentences_count: usize) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::Validation("请输入要摘要的文本".to_string()));
        }
        Ok(Self {
            text: text.to_string(),
            method,
            sentences_count: sentences_count.max(1),
        })
    }
}

/// 分类请求，标题和内容至少有一项
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassifyRequest {
    pub title: String,
    pub content: String,
}

impl ClassifyRequest {
    pub fn new(title: &str, content: &str) -> Result<Self> {
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() && content.is_empty() {
            return Err(CatalogError::Validation("请输入标题或内容".to_string()));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }
}

/// 难度分析指标，文本过短时接口返回空对象
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TextMetrics {
    #[serde(default)]
    pub vocab_complexity: Option<f64>,
    #[serde(default)]
    pub syntax_complexity: Option<f64>,
    #[serde(default)]
    pub avg_sentence_length: Option<f64>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub sentence_count: Option<u64>,
}

/// 难度分析结果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextDifficulty {
    pub difficulty_level: String,
    #[serde(default)]
    pub difficulty_score: f64,
    #[serde(default)]
    pub recommended_exam: String,
    #[serde(default)]
    pub details: TextMetrics,
}

/// 摘要结果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SummaryResult {
    pub summary: String,
    #[serde(default)]
    pub method: SummaryMethod,
    #[serde(default)]
    pub sentences_count: Option<usize>,
    /// 0 到 1 之间
    #[serde(default)]
    pub quality_score: f64,
}

impl SummaryResult {
    /// 质量评分的百分比文本
    pub fn quality_percent(&self) -> String {
        format!("{:.1}%", self.quality_score * 100.0)
    }
}

/// 分类结果
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 文本工具响应的归类
pub struct TextTools;

impl TextTools {
    pub fn analyzed(body: &str) -> Result<TextDifficulty> {
        decode_with_context::<TextDifficulty>(body, "分析失败")
    }

    pub fn summarized(body: &str) -> Result<SummaryResult> {
        decode_with_context::<SummaryResult>(body, "摘要生成失败")
    }

    pub fn classified(body: &str) -> Result<Classification> {
        decode_with_context::<Classification>(body, "分类失败")
    }
}

fn decode_with_context<T: serde::de::DeserializeOwned>(body: &str, context: &str) -> Result<T> {
    let payload = decode_payload::<T>(body).map_err(|err| match err {
        CatalogError::Remote(reason) => CatalogError::Remote(format!("{}: {}", context, reason)),
        other => other,
    })?;
    Ok(payload.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_inputs_are_rejected_locally() {
        assert!(matches!(AnalyzeRequest::new("  "), Err(CatalogError::Validation(_))));
        assert!(matches!(
            SummaryRequest::new("", SummaryMethod::Lsa, 3),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(ClassifyRequest::new(" ", "\n"), Err(CatalogError::Validation(_))));
        assert!(ClassifyRequest::new("Title only", "").is_ok());
    }

    #[test]
    fn summary_request_keeps_at_least_one_sentence() {
        let request = SummaryRequest::new(" text ", SummaryMethod::Luhn, 0).unwrap();
        assert_eq!(request.text, "text");
        assert_eq!(request.sentences_count, 1);
    }

    #[test]
    fn unknown_method_falls_back_to_textrank() {
        let method: SummaryMethod = serde_json::from_value(json!("keyword")).unwrap();
        assert_eq!(method, SummaryMethod::Textrank);
        let method: SummaryMethod = serde_json::from_value(json!("lexrank")).unwrap();
        assert_eq!(method, SummaryMethod::Lexrank);
    }

    #[test]
    fn analysis_tolerates_empty_details() {
        let body = json!({
            "success": true,
            "data": {
                "difficulty_level": "Unknown",
                "difficulty_score": 0,
                "recommended_exam": "Unknown",
                "details": {}
            }
        });
        let result = TextTools::analyzed(&body.to_string()).unwrap();
        assert_eq!(result.difficulty_level, "Unknown");
        assert_eq!(result.details, TextMetrics::default());
    }

    #[test]
    fn failures_carry_operation_prefix() {
        let body = json!({ "success": false, "error": "文本内容不能为空" }).to_string();
        assert_eq!(
            TextTools::summarized(&body).unwrap_err(),
            CatalogError::Remote("摘要生成失败: 文本内容不能为空".into())
        );
        assert_eq!(
            TextTools::classified(&body).unwrap_err(),
            CatalogError::Remote("分类失败: 文本内容不能为空".into())
        );
    }

    #[test]
    fn quality_is_shown_as_percent() {
        let body = json!({
            "success": true,
            "data": { "summary": "s", "method": "lsa", "sentences_count": 3, "quality_score": 0.8534 }
        });
        let result = TextTools::summarized(&body.to_string()).unwrap();
        assert_eq!(result.method, SummaryMethod::Lsa);
        assert_eq!(result.quality_percent(), "85.3%");
    }
}
