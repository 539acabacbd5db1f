use wasm_bindgen::prelude::*;
use web_sys::console;
use utils_common::envelope::decode_payload;
use utils_common::error::{CatalogError, Result};
use utils_common::models::ArticleRecord;

pub mod models;
pub mod recommend;
pub mod tools;

pub use models::{Recommendation, SearchOutcome, SearchRequest};
pub use recommend::{recommended_exam, ExamAdvisory, ExamLevel, RecommendRequest, Recommender};
pub use tools::{
    AnalyzeRequest, Classification, ClassifyRequest, SummaryMethod, SummaryRequest, SummaryResult, TextDifficulty,
    TextMetrics, TextTools,
};

/// 单次搜索请求的条数上限
pub const MAX_SEARCH_LIMIT: usize = 1000;

impl SearchRequest {
    /// 校验关键词并限制请求条数
    ///
    /// 去除空白后为空的关键词直接返回校验错误，不会发往远程接口。
    pub fn new(keyword: &str, limit: usize) -> Result<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CatalogError::Validation("请输入搜索关键词".to_string()));
        }

        Ok(Self {
            keyword: keyword.to_string(),
            limit: limit.clamp(1, MAX_SEARCH_LIMIT),
        })
    }
}

/// 搜索引擎 - 匹配交给远程接口，这里只负责请求和结果归类
pub struct SearchEngine;

impl SearchEngine {
    /// 解析搜索接口的响应
    ///
    /// 匹配总数优先使用接口返回的 total，缺失时退回到结果条数。
    pub fn complete(request: &SearchRequest, body: &str) -> Result<SearchOutcome> {
        let payload = decode_payload::<Vec<ArticleRecord>>(body).map_err(|err| match err {
            CatalogError::Remote(reason) => CatalogError::Remote(format!("搜索失败: {}", reason)),
            other => other,
        })?;

        let total = payload.total.unwrap_or(payload.data.len());
        tracing::debug!(keyword = %request.keyword, returned = payload.data.len(), total, "搜索完成");

        Ok(SearchOutcome {
            keyword: request.keyword.clone(),
            articles: payload.data,
            total,
        })
    }
}

impl SearchOutcome {
    /// 结果提示文本
    pub fn summary(&self) -> String {
        format!("找到 {} 篇相关文章", self.total)
    }
}

/// 搜索JS接口
#[wasm_bindgen]
pub struct ArticleSearchJS;

#[wasm_bindgen]
impl ArticleSearchJS {
    /// 校验关键词，返回可以发送的请求
    #[wasm_bindgen]
    pub fn prepare_search(keyword: &str, limit: usize) -> std::result::Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();

        let request = SearchRequest::new(keyword, limit).map_err(|e| {
            console::log_1(&JsValue::from_str(&e.to_string()));
            JsValue::from_str(&e.to_string())
        })?;

        serde_wasm_bindgen::to_value(&request)
            .map_err(|e| JsValue::from_str(&format!("序列化搜索请求失败: {}", e)))
    }

    /// 评分对应的参考考试
    #[wasm_bindgen]
    pub fn recommended_exam(score: f64) -> String {
        recommended_exam(score).label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keyword_is_rejected() {
        for keyword in ["", "   ", "\t\n"] {
            let err = SearchRequest::new(keyword, 20).unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
    }

    #[test]
    fn keyword_is_trimmed_and_limit_capped() {
        let request = SearchRequest::new("  climate  ", 50_000).unwrap();
        assert_eq!(request.keyword, "climate");
        assert_eq!(request.limit, MAX_SEARCH_LIMIT);
        assert_eq!(SearchRequest::new("a", 0).unwrap().limit, 1);
    }

    #[test]
    fn total_is_reported_separately_from_returned_rows() {
        let request = SearchRequest::new("trade", 2).unwrap();
        let body = r#"{"success": true, "data": [{"id": 9}, {"id": 3}], "total": 57, "keyword": "trade"}"#;
        let outcome = SearchEngine::complete(&request, body).unwrap();
        assert_eq!(outcome.total, 57);
        assert_eq!(outcome.articles.len(), 2);
        // 保持接口返回的相关度顺序
        assert_eq!(outcome.articles[0].id.to_string(), "9");
        assert_eq!(outcome.summary(), "找到 57 篇相关文章");
    }

    #[test]
    fn missing_total_falls_back_to_row_count() {
        let request = SearchRequest::new("trade", 20).unwrap();
        let outcome =
            SearchEngine::complete(&request, r#"{"success": true, "data": [{"id": 1}]}"#).unwrap();
        assert_eq!(outcome.total, 1);
    }

    #[test]
    fn failure_carries_server_reason() {
        let request = SearchRequest::new("trade", 20).unwrap();
        let err = SearchEngine::complete(&request, r#"{"success": false, "error": "索引不可用"}"#)
            .unwrap_err();
        assert_eq!(err, CatalogError::Remote("搜索失败: 索引不可用".into()));
    }
}
