//! 远程文章接口的请求描述
//!
//! 会话本身不做网络请求，只产出 `ApiRequest`，由宿主执行后把响应
//! 交回会话。`to_http` 给出 HTTP/JSON 绑定，也是目前唯一的绑定。

use article_filter::FilterCriteria;
use article_search::{
    AnalyzeRequest, ClassifyRequest, ExamLevel, RecommendRequest, SearchRequest, SummaryMethod, SummaryRequest,
};
use serde::{Deserialize, Serialize};
use utils_common::models::ArticleId;

/// 请求序号（代数令牌），单调递增
pub type Ticket = u64;

/// 接口的逻辑操作
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ApiRequest {
    ListArticles { criteria: FilterCriteria, limit: usize },
    GetArticle { id: ArticleId },
    SearchArticles { keyword: String, limit: usize },
    Recommend { exam_level: ExamLevel, limit: usize },
    ListCategories,
    TriggerRefresh { max_articles: usize, source: String },
    AnalyzeDifficulty { text: String },
    GenerateSummary { text: String, method: SummaryMethod, sentences_count: usize },
    ClassifyText { title: String, content: String },
}

/// HTTP 绑定
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl From<&SearchRequest> for ApiRequest {
    fn from(request: &SearchRequest) -> Self {
        ApiRequest::SearchArticles {
            keyword: request.keyword.clone(),
            limit: request.limit,
        }
    }
}

impl From<&RecommendRequest> for ApiRequest {
    fn from(request: &RecommendRequest) -> Self {
        ApiRequest::Recommend {
            exam_level: request.exam_level,
            limit: request.limit,
        }
    }
}

impl From<&AnalyzeRequest> for ApiRequest {
    fn from(request: &AnalyzeRequest) -> Self {
        ApiRequest::AnalyzeDifficulty { text: request.text.clone() }
    }
}

impl From<&SummaryRequest> for ApiRequest {
    fn from(request: &SummaryRequest) -> Self {
        ApiRequest::GenerateSummary {
            text: request.text.clone(),
            method: request.method,
            sentences_count: request.sentences_count,
        }
    }
}

impl From<&ClassifyRequest> for ApiRequest {
    fn from(request: &ClassifyRequest) -> Self {
        ApiRequest::ClassifyText {
            title: request.title.clone(),
            content: request.content.clone(),
        }
    }
}

impl ApiRequest {
    pub fn to_http(&self, api_base: &str) -> HttpRequest {
        let base = api_base.trim_end_matches('/');

        match self {
            ApiRequest::ListArticles { criteria, limit } => {
                let mut url = format!("{}/articles?limit={}", base, limit);
                let filters = [
                    ("category", criteria.category()),
                    ("difficulty", criteria.difficulty_level()),
                    ("source", criteria.source()),
                ];
                for (name, value) in filters {
                    if let Some(value) = value {
                        url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
                    }
                }
                get(url)
            }
            ApiRequest::GetArticle { id } => {
                get(format!("{}/articles/{}", base, urlencoding::encode(&id.to_string())))
            }
            ApiRequest::SearchArticles { keyword, limit } => get(format!(
                "{}/articles/search?q={}&limit={}",
                base,
                urlencoding::encode(keyword),
                limit
            )),
            ApiRequest::Recommend { exam_level, limit } => get(format!(
                "{}/recommend?exam_level={}&limit={}",
                base,
                urlencoding::encode(exam_level.as_str()),
                limit
            )),
            ApiRequest::ListCategories => get(format!("{}/categories", base)),
            ApiRequest::TriggerRefresh { max_articles, source } => post(
                format!("{}/crawl", base),
                serde_json::json!({ "max_articles": max_articles, "source": source }),
            ),
            ApiRequest::AnalyzeDifficulty { text } => post(
                format!("{}/analyze-difficulty", base),
                serde_json::json!({ "text": text }),
            ),
            ApiRequest::GenerateSummary { text, method, sentences_count } => post(
                format!("{}/generate-summary", base),
                serde_json::json!({
                    "text": text,
                    "method": method.as_str(),
                    "sentences_count": sentences_count,
                }),
            ),
            ApiRequest::ClassifyText { title, content } => post(
                format!("{}/classify", base),
                serde_json::json!({ "title": title, "content": content }),
            ),
        }
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest { method: "GET", url, body: None }
}

fn post(url: String, body: serde_json::Value) -> HttpRequest {
    HttpRequest { method: "POST", url, body: Some(body.to_string()) }
}

/// 宿主交回的响应：响应正文，或传输层失败的原因
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiResponse {
    Body { body: String },
    TransportError { reason: String },
}

impl ApiResponse {
    pub fn body(body: impl Into<String>) -> Self {
        ApiResponse::Body { body: body.into() }
    }

    pub fn transport_error(reason: impl Into<String>) -> Self {
        ApiResponse::TransportError { reason: reason.into() }
    }
}
