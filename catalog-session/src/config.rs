use article_filter::{SortOrder, DEFAULT_PAGE_SIZE};
use article_search::recommend::DEFAULT_RECOMMEND_LIMIT;
use article_search::MAX_SEARCH_LIMIT;
use serde::{Deserialize, Serialize};
use utils_common::labels::Locale;

/// 会话配置 - 由宿主页面以 JSON 传入，所有字段都有默认值
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// 浏览视图每页条数
    pub page_size: usize,
    /// 列表接口一次请求的条数
    pub listing_limit: usize,
    /// 搜索请求条数，超过上限会被截断
    pub search_limit: usize,
    pub recommend_limit: usize,
    /// 更新文章库时最多爬取的文章数
    pub refresh_max_articles: usize,
    /// 更新文章库的来源范围
    pub refresh_source: String,
    /// 浏览视图的初始排序
    pub default_sort: SortOrder,
    pub locale: Locale,
    /// HTTP 接口前缀
    pub api_base: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            listing_limit: 1000,
            search_limit: MAX_SEARCH_LIMIT,
            recommend_limit: DEFAULT_RECOMMEND_LIMIT,
            refresh_max_articles: 50,
            refresh_source: "all".to_string(),
            default_sort: SortOrder::Newest,
            locale: Locale::ZhCn,
            api_base: "/api".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn from_json(json: &str) -> utils_common::Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
            .map_err(|e| utils_common::CatalogError::Validation(format!("配置格式错误: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CatalogConfig::from_json(r#"{"page_size": 20, "locale": "en-US"}"#).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.locale, Locale::EnUs);
        assert_eq!(config.listing_limit, 1000);
        assert_eq!(config.default_sort, SortOrder::Newest);
        assert_eq!(config.api_base, "/api");
    }

    #[test]
    fn empty_input_is_default() {
        assert_eq!(CatalogConfig::from_json("").unwrap(), CatalogConfig::default());
        assert!(CatalogConfig::from_json("{oops").is_err());
    }
}
