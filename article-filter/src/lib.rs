use wasm_bindgen::prelude::*;
use std::cmp::Ordering;
use web_sys::console;
use utils_common::models::ArticleRecord;

// 导出模块
pub mod facets;
pub mod models;
pub mod pagination;

pub use facets::{CatalogStats, FacetIndex};
pub use models::{FilterCriteria, FilterParams, FilterResult, SortOrder};
pub use pagination::{PageControl, PageDescriptor, DEFAULT_PAGE_SIZE};

/// 文章过滤器 - 筛选与排序，纯函数，不修改输入
pub struct ArticleFilter;

impl ArticleFilter {
    /// 先按条件筛选，再按指定顺序稳定排序
    pub fn apply(
        working_set: &[ArticleRecord],
        criteria: &FilterCriteria,
        order: SortOrder,
    ) -> Vec<ArticleRecord> {
        let mut filtered: Vec<ArticleRecord> = working_set
            .iter()
            .filter(|article| Self::matches(article, criteria))
            .cloned()
            .collect();

        Self::apply_sorting(&mut filtered, order);

        tracing::debug!(
            input = working_set.len(),
            output = filtered.len(),
            ?order,
            "筛选排序完成"
        );
        filtered
    }

    /// 所有已设置的条件都必须精确匹配原始值
    pub fn matches(article: &ArticleRecord, criteria: &FilterCriteria) -> bool {
        fn exact(expected: Option<&str>, actual: Option<&str>) -> bool {
            match expected {
                Some(expected) => actual == Some(expected),
                None => true,
            }
        }

        exact(criteria.category(), article.category.as_deref())
            && exact(criteria.difficulty_level(), article.difficulty_level.as_deref())
            && exact(criteria.source(), article.source.as_deref())
    }

    /// 稳定排序，相等元素保持原有顺序
    pub fn apply_sorting(articles: &mut [ArticleRecord], order: SortOrder) {
        match order {
            SortOrder::Newest => articles.sort_by(|a, b| Self::by_time(b, a)),
            SortOrder::Oldest => articles.sort_by(Self::by_time),
            SortOrder::DifficultyAsc => articles.sort_by(Self::by_score),
            SortOrder::DifficultyDesc => articles.sort_by(|a, b| Self::by_score(b, a)),
            SortOrder::LengthAsc => articles.sort_by_key(ArticleRecord::words_or_zero),
            SortOrder::LengthDesc => {
                articles.sort_by(|a, b| b.words_or_zero().cmp(&a.words_or_zero()))
            }
            SortOrder::Relevance => {}
        }
    }

    // 缺失时间视为最早
    fn by_time(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
        a.sort_timestamp().cmp(&b.sort_timestamp())
    }

    fn by_score(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
        a.score_or_zero().total_cmp(&b.score_or_zero())
    }

    /// 筛选、排序并切出请求的页
    pub fn filter_page(working_set: &[ArticleRecord], params: &FilterParams) -> FilterResult {
        let ordered = Self::apply(working_set, &params.criteria, params.sort);
        let (articles, pagination) = pagination::paginate(
            &ordered,
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        FilterResult { articles, pagination }
    }
}

/// 文章过滤器JS接口 - 提供给JavaScript使用的无状态筛选API
#[wasm_bindgen]
pub struct ArticleFilterJS;

#[wasm_bindgen]
impl ArticleFilterJS {
    /// 筛选文章并返回当前页
    #[wasm_bindgen]
    pub fn filter_articles(articles_json: &str, params_json: &str) -> Result<JsValue, JsValue> {
        console_error_panic_hook::set_once();

        let articles = parse_articles(articles_json)?;
        let params: FilterParams = serde_json::from_str(params_json).map_err(|e| {
            console::log_1(&JsValue::from_str(&format!("解析参数失败: {}", e)));
            JsValue::from_str(&format!("解析参数失败: {}", e))
        })?;

        let result = ArticleFilter::filter_page(&articles, &params);

        serde_wasm_bindgen::to_value(&result)
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }

    /// 获取分类、来源和难度分布
    #[wasm_bindgen]
    pub fn facets(articles_json: &str) -> Result<JsValue, JsValue> {
        let articles = parse_articles(articles_json)?;
        let index = FacetIndex::from_articles(&articles);

        serde_wasm_bindgen::to_value(&index)
            .map_err(|e| JsValue::from_str(&format!("序列化分面失败: {}", e)))
    }

    /// 根据数量生成分页描述
    #[wasm_bindgen]
    pub fn describe_pages(total_items: usize, page: usize, page_size: usize) -> Result<JsValue, JsValue> {
        let descriptor = pagination::describe(total_items, page, page_size);

        serde_wasm_bindgen::to_value(&descriptor)
            .map_err(|e| JsValue::from_str(&format!("序列化分页失败: {}", e)))
    }
}

fn parse_articles(articles_json: &str) -> Result<Vec<ArticleRecord>, JsValue> {
    serde_json::from_str(articles_json).map_err(|e| {
        console::log_1(&JsValue::from_str(&format!("解析文章列表失败: {}", e)));
        JsValue::from_str(&format!("解析文章列表失败: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> ArticleRecord {
        ArticleRecord::new(id)
    }

    fn ids(articles: &[ArticleRecord]) -> Vec<String> {
        articles.iter().map(|a| a.id.to_string()).collect()
    }

    fn sample() -> Vec<ArticleRecord> {
        let mut a = record(1);
        a.category = Some("Tech".into());
        a.source = Some("BBC".into());
        a.difficulty_level = Some("Advanced".into());
        a.difficulty_score = Some(62.0);
        a.word_count = Some(800);
        a.created_at = Some("2024-05-02 08:00:00".into());

        let mut b = record(2);
        b.category = Some("Sports".into());
        b.source = Some("CNN".into());
        b.difficulty_level = Some("Beginner".into());
        b.difficulty_score = Some(25.0);
        b.word_count = Some(300);
        b.publish_date = Some("2024-05-03".into());

        let mut c = record(3);
        c.category = Some("Tech".into());
        c.source = Some("CNN".into());
        c.difficulty_level = Some("Intermediate".into());
        c.word_count = Some(1200);
        c.created_at = Some("2024-05-01T12:00:00Z".into());

        let mut d = record(4);
        d.category = Some("unknown".into());
        d.source = Some("BBC".into());
        d.difficulty_score = Some(25.0);

        vec![a, b, c, d]
    }

    #[test]
    fn filtering_is_conjunctive() {
        let criteria = FilterCriteria {
            category: Some("Tech".into()),
            source: Some("CNN".into()),
            ..Default::default()
        };
        let result = ArticleFilter::apply(&sample(), &criteria, SortOrder::Relevance);
        assert_eq!(ids(&result), vec!["3"]);
    }

    #[test]
    fn filtering_matches_raw_values_only() {
        let general = FilterCriteria { category: Some("General".into()), ..Default::default() };
        assert!(ArticleFilter::apply(&sample(), &general, SortOrder::Relevance).is_empty());

        let folded = FilterCriteria { category: Some("tech".into()), ..Default::default() };
        assert!(ArticleFilter::apply(&sample(), &folded, SortOrder::Relevance).is_empty());
    }

    #[test]
    fn every_record_passes_its_own_criteria() {
        let articles = sample();
        for article in &articles {
            let criteria = FilterCriteria {
                category: article.category.clone(),
                difficulty_level: article.difficulty_level.clone(),
                source: article.source.clone(),
            };
            let result = ArticleFilter::apply(&articles, &criteria, SortOrder::Relevance);
            assert!(result.iter().any(|r| r.id == article.id));
            assert!(result.iter().all(|r| ArticleFilter::matches(r, &criteria)));
        }
    }

    #[test]
    fn empty_strings_do_not_constrain() {
        let criteria = FilterCriteria {
            category: Some(String::new()),
            difficulty_level: Some(String::new()),
            source: None,
        };
        assert!(criteria.is_empty());
        assert_eq!(ArticleFilter::apply(&sample(), &criteria, SortOrder::Relevance).len(), 4);
    }

    #[test]
    fn newest_and_oldest_use_created_then_publish_date() {
        let newest = ArticleFilter::apply(&sample(), &FilterCriteria::default(), SortOrder::Newest);
        assert_eq!(ids(&newest), vec!["2", "1", "3", "4"]);

        let oldest = ArticleFilter::apply(&sample(), &FilterCriteria::default(), SortOrder::Oldest);
        assert_eq!(ids(&oldest), vec!["4", "3", "1", "2"]);
    }

    #[test]
    fn newest_reverses_oldest_for_distinct_timestamps() {
        let dated: Vec<ArticleRecord> = sample().into_iter().take(3).collect();
        let mut newest = ArticleFilter::apply(&dated, &FilterCriteria::default(), SortOrder::Newest);
        let oldest = ArticleFilter::apply(&dated, &FilterCriteria::default(), SortOrder::Oldest);
        newest.reverse();
        assert_eq!(newest, oldest);
    }

    #[test]
    fn difficulty_sort_is_stable_on_ties() {
        let asc = ArticleFilter::apply(&sample(), &FilterCriteria::default(), SortOrder::DifficultyAsc);
        // 3 无评分按0；2 与 4 同为25，保持原顺序
        assert_eq!(ids(&asc), vec!["3", "2", "4", "1"]);

        let desc = ArticleFilter::apply(&sample(), &FilterCriteria::default(), SortOrder::DifficultyDesc);
        assert_eq!(ids(&desc), vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn length_sort_treats_missing_as_zero() {
        let asc = ArticleFilter::apply(&sample(), &FilterCriteria::default(), SortOrder::LengthAsc);
        assert_eq!(ids(&asc), vec!["4", "2", "1", "3"]);
        let desc = ArticleFilter::apply(&sample(), &FilterCriteria::default(), SortOrder::LengthDesc);
        assert_eq!(ids(&desc), vec!["3", "1", "2", "4"]);
    }

    #[test]
    fn sorting_is_idempotent_and_input_untouched() {
        let input = sample();
        let once = ArticleFilter::apply(&input, &FilterCriteria::default(), SortOrder::DifficultyDesc);
        let twice = ArticleFilter::apply(&once, &FilterCriteria::default(), SortOrder::DifficultyDesc);
        assert_eq!(once, twice);
        assert_eq!(ids(&input), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn relevance_preserves_incoming_order() {
        let mut input = sample();
        input.reverse();
        let result = ArticleFilter::apply(&input, &FilterCriteria::default(), SortOrder::Relevance);
        assert_eq!(ids(&result), vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn params_parse_with_defaults() {
        let params: FilterParams =
            serde_json::from_str(r#"{"category": "Tech", "difficulty": "Advanced", "sort": "length_desc"}"#)
                .unwrap();
        assert_eq!(params.criteria.category(), Some("Tech"));
        assert_eq!(params.criteria.difficulty_level(), Some("Advanced"));
        assert_eq!(params.sort, SortOrder::LengthDesc);

        let unknown: FilterParams = serde_json::from_str(r#"{"sort": "title_asc"}"#).unwrap();
        assert_eq!(unknown.sort, SortOrder::Relevance);

        let result = ArticleFilter::filter_page(&sample(), &params);
        assert_eq!(ids(&result.articles), vec!["1"]);
        assert_eq!(result.pagination.total_items, 1);
        assert_eq!(result.pagination.page_size, DEFAULT_PAGE_SIZE);
    }
}
