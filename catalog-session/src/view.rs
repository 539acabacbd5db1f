//! 视图投影 - 状态的纯函数，页面只渲染这里的结果

use crate::state::{CatalogState, Mode};
use article_filter::pagination::paginate;
use article_filter::{ArticleFilter, CatalogStats, FacetIndex, FilterCriteria, PageDescriptor, SortOrder};
use article_search::{recommended_exam, Classification, Recommendation, SummaryResult, TextDifficulty, TextMetrics};
use serde::Serialize;
use utils_common::labels::{
    author_label, category_label, date_label, difficulty_advice, difficulty_key, difficulty_label,
    source_label, summary_preview,
};
use utils_common::models::{ArticleId, ArticleRecord};
use utils_common::Locale;

/// 推荐卡片摘要的最大字符数
pub const RECOMMEND_SUMMARY_CHARS: usize = 120;

/// 列表卡片
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub date: String,
    pub source: String,
    pub word_count: u64,
    pub summary: String,
    pub tags: Vec<String>,
    pub difficulty_label: String,
    /// 小写难度键，用于样式
    pub difficulty_key: String,
    pub category_label: String,
    pub difficulty_score: Option<f64>,
}

impl ArticleCard {
    pub fn from_record(article: &ArticleRecord, locale: Locale) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone().unwrap_or_default(),
            author: author_label(article.author.as_deref(), locale),
            date: date_label(article.publish_date.as_deref(), locale),
            source: source_label(article.source.as_deref(), locale),
            word_count: article.words_or_zero(),
            summary: article.summary.clone().unwrap_or_default(),
            tags: article.tag_list(),
            difficulty_label: difficulty_label(article.difficulty_level.as_deref(), locale),
            difficulty_key: difficulty_key(article.difficulty_level.as_deref()),
            category_label: category_label(article.category.as_deref(), locale),
            difficulty_score: article.difficulty_score,
        }
    }

    /// 推荐区的卡片只显示摘要开头
    pub fn preview(article: &ArticleRecord, locale: Locale) -> Self {
        let mut card = Self::from_record(article, locale);
        if !card.summary.is_empty() {
            card.summary = summary_preview(&card.summary, RECOMMEND_SUMMARY_CHARS);
        }
        card
    }
}

/// 难度分析
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DifficultyAnalysis {
    /// 满分100
    pub score: f64,
    pub recommended_exam: String,
    pub advice: String,
}

/// 文章详情
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub card: ArticleCard,
    pub url: Option<String>,
    pub content: String,
    /// 只有评分存在时才给出
    pub analysis: Option<DifficultyAnalysis>,
}

impl ArticleDetail {
    pub fn from_record(article: &ArticleRecord, locale: Locale) -> Self {
        let analysis = article.difficulty_score.map(|score| DifficultyAnalysis {
            score,
            recommended_exam: recommended_exam(score).label().to_string(),
            advice: difficulty_advice(article.difficulty_level.as_deref(), locale).to_string(),
        });

        Self {
            card: ArticleCard::from_record(article, locale),
            url: article.url.clone(),
            content: article.content.clone().unwrap_or_default(),
            analysis,
        }
    }
}

/// 搜索结果提示
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchBanner {
    pub keyword: String,
    pub total: usize,
    pub message: String,
}

/// 推荐区
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RecommendationView {
    pub exam_level: String,
    pub cards: Vec<ArticleCard>,
    /// 没有匹配文章时的提示，与请求失败区分
    pub empty_message: Option<String>,
}

impl RecommendationView {
    fn from_recommendation(recommendation: &Recommendation, locale: Locale) -> Self {
        let exam_level = recommendation.exam_level().to_string();
        let cards: Vec<ArticleCard> = recommendation
            .articles()
            .iter()
            .map(|article| ArticleCard::preview(article, locale))
            .collect();

        let empty_message = if cards.is_empty() {
            Some(match locale {
                Locale::ZhCn => format!("暂无适合 {} 水平的文章", exam_level),
                Locale::EnUs => format!("No articles currently match {}", exam_level),
            })
        } else {
            None
        };

        Self { exam_level, cards, empty_message }
    }
}

/// 文本难度分析结果
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TextAnalysisView {
    pub level_label: String,
    pub level_key: String,
    pub score: f64,
    pub recommended_exam: String,
    pub details: TextMetrics,
}

impl TextAnalysisView {
    fn from_result(result: &TextDifficulty, locale: Locale) -> Self {
        Self {
            level_label: difficulty_label(Some(result.difficulty_level.as_str()), locale),
            level_key: difficulty_key(Some(result.difficulty_level.as_str())),
            score: result.difficulty_score,
            recommended_exam: result.recommended_exam.clone(),
            details: result.details.clone(),
        }
    }
}

/// 摘要结果
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryView {
    /// 大写算法名
    pub method: String,
    pub quality: String,
    pub summary: String,
}

impl From<&SummaryResult> for SummaryView {
    fn from(result: &SummaryResult) -> Self {
        Self {
            method: result.method.as_str().to_uppercase(),
            quality: result.quality_percent(),
            summary: result.summary.clone(),
        }
    }
}

/// 统计区
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StatsView {
    pub total_articles: usize,
    pub average_difficulty: f64,
    pub last_update: String,
    pub category_count: usize,
}

/// 页面需要的全部内容
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub cards: Vec<ArticleCard>,
    pub pagination: PageDescriptor,
    /// 筛选后的文章数
    pub article_count: usize,
    pub facets: FacetIndex,
    pub stats: StatsView,
    pub criteria: FilterCriteria,
    pub sort: SortOrder,
    pub search: Option<SearchBanner>,
    pub detail: Option<ArticleDetail>,
    pub recommendation: Option<RecommendationView>,
    pub text_analysis: Option<TextAnalysisView>,
    pub summary: Option<SummaryView>,
    pub classification: Option<Classification>,
    pub loading: bool,
}

/// 从状态派生视图
pub fn view(state: &CatalogState) -> CatalogView {
    let locale = state.config.locale;

    // 搜索结果保持接口给出的相关度顺序
    let (ordered, search) = match &state.mode {
        Mode::Browse => (ArticleFilter::apply(&state.working_set, &state.criteria, state.sort), None),
        Mode::Search { keyword, total } => {
            let ordered = ArticleFilter::apply(&state.working_set, &FilterCriteria::default(), SortOrder::Relevance);
            let message = match locale {
                Locale::ZhCn => format!("找到 {} 篇相关文章", total),
                Locale::EnUs => format!("Found {} matching articles", total),
            };
            (ordered, Some(SearchBanner { keyword: keyword.clone(), total: *total, message }))
        }
    };

    let (page, pagination) = paginate(&ordered, state.page, state.config.page_size);
    let cards = page.iter().map(|article| ArticleCard::from_record(article, locale)).collect();

    // 分面和统计取自未筛选的目录，尚未加载时退回工作集
    let catalog = if state.catalog.is_empty() {
        &state.working_set
    } else {
        &state.catalog
    };
    let totals = CatalogStats::from_articles(catalog);
    let stats = StatsView {
        total_articles: totals.total_articles,
        average_difficulty: totals.average_difficulty,
        last_update: date_label(totals.last_update.as_deref(), locale),
        category_count: state.categories.len(),
    };

    CatalogView {
        cards,
        pagination,
        article_count: ordered.len(),
        facets: FacetIndex::from_articles(catalog),
        stats,
        criteria: state.criteria.clone(),
        sort: state.sort,
        search,
        detail: state.detail.as_ref().map(|article| ArticleDetail::from_record(article, locale)),
        recommendation: state
            .recommendation
            .as_ref()
            .map(|recommendation| RecommendationView::from_recommendation(recommendation, locale)),
        text_analysis: state
            .text_analysis
            .as_ref()
            .map(|result| TextAnalysisView::from_result(result, locale)),
        summary: state.summary.as_ref().map(SummaryView::from),
        classification: state.classification.clone(),
        loading: state.is_loading(),
    }
}
