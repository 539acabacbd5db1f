//! 目录状态机
//!
//! 所有界面动作都表示为 `Command`，由 `CatalogState::update` 消费并返回
//! 新状态、需要执行的请求和一个结果说明。状态本身从不在等待网络时被
//! 部分修改：筛选条件、排序、页码和模式随列表请求一起挂起，响应到达时
//! 和新的工作集一起提交。
//!
//! 每个请求槽位只记住最近一次请求的序号，序号不匹配的响应一律丢弃，
//! 慢请求不会覆盖后发起的快请求。

use crate::api::{ApiRequest, ApiResponse, HttpRequest, Ticket};
use crate::config::CatalogConfig;
use article_filter::pagination::normalize_page;
use article_filter::{FilterCriteria, SortOrder};
use article_search::tools::DEFAULT_SUMMARY_SENTENCES;
use article_search::{
    AnalyzeRequest, Classification, ClassifyRequest, Recommendation, RecommendRequest, Recommender, SearchEngine,
    SearchRequest, SummaryMethod, SummaryRequest, SummaryResult, TextDifficulty, TextTools,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utils_common::envelope::{decode_payload, decode_refresh};
use utils_common::error::{CatalogError, Result};
use utils_common::models::{ArticleId, ArticleRecord, Category, RefreshReport};

/// 工作集来源
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    /// 浏览：按筛选条件和排序派生
    #[default]
    Browse,
    /// 搜索：保持接口返回的相关度顺序
    Search { keyword: String, total: usize },
}

/// 界面动作
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// 首次加载：文章列表、全量目录和分类
    Init,
    SetFilters { criteria: FilterCriteria },
    SetSort { order: SortOrder },
    GoToPage { page: usize },
    Search { keyword: String },
    ClearSearch,
    /// 按当前条件重新拉取
    Refresh,
    Recommend { exam_level: String },
    /// 不访问网络，从全量目录中挑选
    RecommendLocal { exam_level: String },
    OpenArticle { id: ArticleId },
    CloseArticle,
    /// 通知服务端更新文章库
    TriggerRefresh,
    /// 用离线快照预置工作集
    Seed { articles: Vec<ArticleRecord> },
    /// 文本难度分析
    AnalyzeText { text: String },
    /// 生成摘要
    Summarize {
        text: String,
        #[serde(default)]
        method: SummaryMethod,
        #[serde(default = "default_sentences")]
        sentences_count: usize,
    },
    /// 智能分类
    ClassifyText {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
    },
    /// 宿主交回某个请求的响应
    Resolve { ticket: Ticket, response: ApiResponse },
}

fn default_sentences() -> usize {
    DEFAULT_SUMMARY_SENTENCES
}

/// 需要宿主执行的请求
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Fetch {
        ticket: Ticket,
        request: ApiRequest,
        http: HttpRequest,
    },
}

impl Effect {
    pub fn ticket(&self) -> Ticket {
        match self {
            Effect::Fetch { ticket, .. } => *ticket,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        match self {
            Effect::Fetch { request, .. } => request,
        }
    }

    pub fn http(&self) -> &HttpRequest {
        match self {
            Effect::Fetch { http, .. } => http,
        }
    }
}

/// 请求槽位
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Listing,
    Catalog,
    Categories,
    Detail,
    Recommendation,
    Refresh,
    Analysis,
    Summary,
    Classification,
}

/// 一次状态转换的结果说明
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// 没有需要提示的内容（本地派生或请求已发出）
    None,
    Loaded { slot: Slot, count: usize },
    Searched { keyword: String, total: usize, message: String },
    Recommended { exam_level: String, count: usize },
    NoRecommendation { exam_level: String },
    DetailReady { id: ArticleId },
    Refreshed { message: String },
    Analyzed { difficulty_level: String, difficulty_score: f64 },
    Summarized { quality: String },
    Classified { category: String },
    /// 已被后发请求取代的响应，直接丢弃
    Stale { ticket: Ticket },
    Failed { error: CatalogError },
}

/// 状态转换
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: CatalogState,
    pub effects: Vec<Effect>,
    pub outcome: Outcome,
}

/// 列表请求挂起时携带的意图，响应成功后整体提交
#[derive(Debug, Clone, PartialEq)]
struct ListingIntent {
    criteria: FilterCriteria,
    sort: SortOrder,
    page: usize,
    search: Option<SearchRequest>,
}

/// 各槽位最近一次发出的请求
#[derive(Debug, Clone, Default)]
struct Inflight {
    listing: Option<(Ticket, ListingIntent)>,
    catalog: Option<Ticket>,
    categories: Option<Ticket>,
    detail: Option<Ticket>,
    recommendation: Option<(Ticket, RecommendRequest)>,
    refresh: Option<Ticket>,
    analysis: Option<Ticket>,
    summary: Option<Ticket>,
    classification: Option<Ticket>,
}

impl Inflight {
    fn is_empty(&self) -> bool {
        self.listing.is_none()
            && self.catalog.is_none()
            && self.categories.is_none()
            && self.detail.is_none()
            && self.recommendation.is_none()
            && self.refresh.is_none()
            && self.analysis.is_none()
            && self.summary.is_none()
            && self.classification.is_none()
    }
}

/// 会话状态记录
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub config: CatalogConfig,
    /// 当前工作集，按接口返回顺序保存
    pub working_set: Vec<ArticleRecord>,
    pub criteria: FilterCriteria,
    pub sort: SortOrder,
    pub page: usize,
    pub mode: Mode,
    /// 未筛选的全量列表，用于分面和统计
    pub catalog: Vec<ArticleRecord>,
    pub categories: Vec<Category>,
    pub detail: Option<ArticleRecord>,
    pub recommendation: Option<Recommendation>,
    pub last_refresh: Option<RefreshReport>,
    pub text_analysis: Option<TextDifficulty>,
    pub summary: Option<SummaryResult>,
    pub classification: Option<Classification>,
    next_ticket: Ticket,
    inflight: Inflight,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

impl CatalogState {
    pub fn new(config: CatalogConfig) -> Self {
        let sort = config.default_sort;
        Self {
            config,
            working_set: Vec::new(),
            criteria: FilterCriteria::default(),
            sort,
            page: 1,
            mode: Mode::Browse,
            catalog: Vec::new(),
            categories: Vec::new(),
            detail: None,
            recommendation: None,
            last_refresh: None,
            text_analysis: None,
            summary: None,
            classification: None,
            next_ticket: 1,
            inflight: Inflight::default(),
        }
    }

    /// 是否有尚未返回的请求
    pub fn is_loading(&self) -> bool {
        !self.inflight.is_empty()
    }

    /// 列表请求是否挂起
    pub fn is_listing_pending(&self) -> bool {
        self.inflight.listing.is_some()
    }

    /// 消费一个动作，返回新的状态
    pub fn update(self, command: Command) -> Transition {
        tracing::debug!(?command, "处理动作");

        match command {
            Command::Init => {
                let mut builder = Builder::new(self);
                let mut intent = builder.latest_intent();
                intent.page = 1;
                builder.fetch_listing(intent);
                builder.fetch_catalog();
                builder.fetch_categories();
                builder.finish(Outcome::None)
            }
            Command::SetFilters { criteria } => {
                let mut builder = Builder::new(self);
                let intent = ListingIntent {
                    criteria,
                    sort: builder.latest_intent().sort,
                    page: 1,
                    search: None,
                };
                builder.fetch_listing(intent);
                builder.finish(Outcome::None)
            }
            Command::SetSort { order } => {
                let mut state = self;
                state.sort = order;
                state.page = 1;
                if let Some((_, intent)) = state.inflight.listing.as_mut() {
                    intent.sort = order;
                }
                Builder::new(state).finish(Outcome::None)
            }
            Command::GoToPage { page } => {
                let mut state = self;
                state.page = normalize_page(page);
                Builder::new(state).finish(Outcome::None)
            }
            Command::Search { keyword } => {
                let request = match SearchRequest::new(&keyword, self.config.search_limit) {
                    Ok(request) => request,
                    Err(error) => return Builder::new(self).finish(Outcome::Failed { error }),
                };
                let mut builder = Builder::new(self);
                let mut intent = builder.latest_intent();
                intent.page = 1;
                intent.search = Some(request);
                builder.fetch_listing(intent);
                builder.finish(Outcome::None)
            }
            Command::ClearSearch => {
                let mut builder = Builder::new(self);
                let intent = ListingIntent {
                    criteria: FilterCriteria::default(),
                    sort: builder.state.config.default_sort,
                    page: 1,
                    search: None,
                };
                builder.fetch_listing(intent);
                builder.finish(Outcome::None)
            }
            Command::Refresh => {
                let mut builder = Builder::new(self);
                let intent = builder.latest_intent();
                builder.fetch_listing(intent);
                builder.fetch_catalog();
                builder.finish(Outcome::None)
            }
            Command::Recommend { exam_level } => {
                let request = match RecommendRequest::new(&exam_level, self.config.recommend_limit) {
                    Ok(request) => request,
                    Err(error) => return Builder::new(self).finish(Outcome::Failed { error }),
                };
                let mut builder = Builder::new(self);
                let ticket = builder.issue(ApiRequest::from(&request));
                builder.state.inflight.recommendation = Some((ticket, request));
                builder.finish(Outcome::None)
            }
            Command::RecommendLocal { exam_level } => {
                let request = match RecommendRequest::new(&exam_level, self.config.recommend_limit) {
                    Ok(request) => request,
                    Err(error) => return Builder::new(self).finish(Outcome::Failed { error }),
                };
                let mut state = self;
                let recommendation = Recommender::select_from(&state.catalog, &request);
                let outcome = recommendation_outcome(&recommendation);
                // 本地结果取代尚未返回的远程推荐
                state.inflight.recommendation = None;
                state.recommendation = Some(recommendation);
                Builder::new(state).finish(outcome)
            }
            Command::OpenArticle { id } => {
                let mut builder = Builder::new(self);
                let ticket = builder.issue(ApiRequest::GetArticle { id });
                builder.state.inflight.detail = Some(ticket);
                builder.finish(Outcome::None)
            }
            Command::CloseArticle => {
                let mut state = self;
                state.detail = None;
                state.inflight.detail = None;
                Builder::new(state).finish(Outcome::None)
            }
            Command::TriggerRefresh => {
                let mut builder = Builder::new(self);
                let request = ApiRequest::TriggerRefresh {
                    max_articles: builder.state.config.refresh_max_articles,
                    source: builder.state.config.refresh_source.clone(),
                };
                let ticket = builder.issue(request);
                builder.state.inflight.refresh = Some(ticket);
                builder.finish(Outcome::None)
            }
            Command::Seed { articles } => {
                let mut state = self;
                let articles = dedup_by_id(articles);
                let count = articles.len();
                state.catalog = articles.clone();
                state.working_set = articles;
                state.mode = Mode::Browse;
                state.page = 1;
                Builder::new(state).finish(Outcome::Loaded { slot: Slot::Listing, count })
            }
            Command::AnalyzeText { text } => match AnalyzeRequest::new(&text) {
                Ok(request) => {
                    let mut builder = Builder::new(self);
                    let ticket = builder.issue(ApiRequest::from(&request));
                    builder.state.inflight.analysis = Some(ticket);
                    builder.finish(Outcome::None)
                }
                Err(error) => Builder::new(self).finish(Outcome::Failed { error }),
            },
            Command::Summarize { text, method, sentences_count } => {
                match SummaryRequest::new(&text, method, sentences_count) {
                    Ok(request) => {
                        let mut builder = Builder::new(self);
                        let ticket = builder.issue(ApiRequest::from(&request));
                        builder.state.inflight.summary = Some(ticket);
                        builder.finish(Outcome::None)
                    }
                    Err(error) => Builder::new(self).finish(Outcome::Failed { error }),
                }
            }
            Command::ClassifyText { title, content } => match ClassifyRequest::new(&title, &content) {
                Ok(request) => {
                    let mut builder = Builder::new(self);
                    let ticket = builder.issue(ApiRequest::from(&request));
                    builder.state.inflight.classification = Some(ticket);
                    builder.finish(Outcome::None)
                }
                Err(error) => Builder::new(self).finish(Outcome::Failed { error }),
            },
            Command::Resolve { ticket, response } => self.resolve(ticket, response),
        }
    }

    fn resolve(self, ticket: Ticket, response: ApiResponse) -> Transition {
        let mut state = self;

        let slot = match state.slot_of(ticket) {
            Some(slot) => slot,
            None => {
                tracing::warn!(ticket, "丢弃过期响应");
                return Builder::new(state).finish(Outcome::Stale { ticket });
            }
        };

        let body = match response {
            ApiResponse::Body { body } => body,
            ApiResponse::TransportError { reason } => {
                state.clear_slot(slot);
                let error = CatalogError::Transport(reason);
                tracing::warn!(?slot, %error, "请求失败");
                return Builder::new(state).finish(Outcome::Failed { error });
            }
        };

        let mut builder = Builder::new(state);
        let result = match slot {
            Slot::Listing => builder.commit_listing(&body),
            Slot::Catalog => builder.commit_catalog(&body),
            Slot::Categories => builder.commit_categories(&body),
            Slot::Detail => builder.commit_detail(&body),
            Slot::Recommendation => builder.commit_recommendation(&body),
            Slot::Refresh => builder.commit_refresh(&body),
            Slot::Analysis => builder.commit_analysis(&body),
            Slot::Summary => builder.commit_summary(&body),
            Slot::Classification => builder.commit_classification(&body),
        };

        match result {
            Ok(outcome) => builder.finish(outcome),
            Err(error) => {
                // 失败时保留原有视图，只清除挂起的请求
                builder.state.clear_slot(slot);
                tracing::warn!(?slot, %error, "请求失败");
                builder.finish(Outcome::Failed { error: with_context(slot, error) })
            }
        }
    }

    fn slot_of(&self, ticket: Ticket) -> Option<Slot> {
        let inflight = &self.inflight;
        if inflight.listing.as_ref().map(|(t, _)| *t) == Some(ticket) {
            Some(Slot::Listing)
        } else if inflight.catalog == Some(ticket) {
            Some(Slot::Catalog)
        } else if inflight.categories == Some(ticket) {
            Some(Slot::Categories)
        } else if inflight.detail == Some(ticket) {
            Some(Slot::Detail)
        } else if inflight.recommendation.as_ref().map(|(t, _)| *t) == Some(ticket) {
            Some(Slot::Recommendation)
        } else if inflight.refresh == Some(ticket) {
            Some(Slot::Refresh)
        } else if inflight.analysis == Some(ticket) {
            Some(Slot::Analysis)
        } else if inflight.summary == Some(ticket) {
            Some(Slot::Summary)
        } else if inflight.classification == Some(ticket) {
            Some(Slot::Classification)
        } else {
            None
        }
    }

    fn clear_slot(&mut self, slot: Slot) {
        match slot {
            Slot::Listing => self.inflight.listing = None,
            Slot::Catalog => self.inflight.catalog = None,
            Slot::Categories => self.inflight.categories = None,
            Slot::Detail => self.inflight.detail = None,
            Slot::Recommendation => self.inflight.recommendation = None,
            Slot::Refresh => self.inflight.refresh = None,
            Slot::Analysis => self.inflight.analysis = None,
            Slot::Summary => self.inflight.summary = None,
            Slot::Classification => self.inflight.classification = None,
        }
    }
}

/// 构造一次转换：持有状态并收集请求
struct Builder {
    state: CatalogState,
    effects: Vec<Effect>,
}

impl Builder {
    fn new(state: CatalogState) -> Self {
        Self { state, effects: Vec::new() }
    }

    fn finish(self, outcome: Outcome) -> Transition {
        Transition {
            state: self.state,
            effects: self.effects,
            outcome,
        }
    }

    /// 分配新序号并记录请求
    fn issue(&mut self, request: ApiRequest) -> Ticket {
        let ticket = self.state.next_ticket;
        self.state.next_ticket += 1;

        let http = request.to_http(&self.state.config.api_base);
        tracing::debug!(ticket, url = %http.url, "发出请求");
        self.effects.push(Effect::Fetch { ticket, request, http });
        ticket
    }

    /// 最新的列表意图：挂起的请求优先，其次是已提交的状态
    fn latest_intent(&self) -> ListingIntent {
        if let Some((_, intent)) = &self.state.inflight.listing {
            return intent.clone();
        }

        let search = match &self.state.mode {
            Mode::Search { keyword, .. } => SearchRequest::new(keyword, self.state.config.search_limit).ok(),
            Mode::Browse => None,
        };
        ListingIntent {
            criteria: self.state.criteria.clone(),
            sort: self.state.sort,
            page: self.state.page,
            search,
        }
    }

    fn fetch_listing(&mut self, intent: ListingIntent) {
        let request = match &intent.search {
            Some(search) => ApiRequest::from(search),
            None => ApiRequest::ListArticles {
                criteria: intent.criteria.clone(),
                limit: self.state.config.listing_limit,
            },
        };
        let ticket = self.issue(request);
        self.state.inflight.listing = Some((ticket, intent));
    }

    fn fetch_catalog(&mut self) {
        let ticket = self.issue(ApiRequest::ListArticles {
            criteria: FilterCriteria::default(),
            limit: self.state.config.listing_limit,
        });
        self.state.inflight.catalog = Some(ticket);
    }

    fn fetch_categories(&mut self) {
        let ticket = self.issue(ApiRequest::ListCategories);
        self.state.inflight.categories = Some(ticket);
    }

    fn commit_listing(&mut self, body: &str) -> Result<Outcome> {
        let (_, intent) = match self.state.inflight.listing.clone() {
            Some(pending) => pending,
            None => return Ok(Outcome::None),
        };

        let outcome = match &intent.search {
            Some(request) => {
                let result = SearchEngine::complete(request, body)?;
                let outcome = Outcome::Searched {
                    keyword: result.keyword.clone(),
                    total: result.total,
                    message: result.summary(),
                };
                self.state.mode = Mode::Search { keyword: result.keyword, total: result.total };
                self.state.working_set = dedup_by_id(result.articles);
                outcome
            }
            None => {
                let payload = decode_payload::<Vec<ArticleRecord>>(body)
                    .map_err(|error| prefixed("加载文章失败", error))?;
                self.state.mode = Mode::Browse;
                self.state.working_set = dedup_by_id(payload.data);
                Outcome::Loaded { slot: Slot::Listing, count: self.state.working_set.len() }
            }
        };

        self.state.criteria = intent.criteria;
        self.state.sort = intent.sort;
        self.state.page = intent.page;
        self.state.inflight.listing = None;
        Ok(outcome)
    }

    fn commit_catalog(&mut self, body: &str) -> Result<Outcome> {
        let payload = decode_payload::<Vec<ArticleRecord>>(body)?;
        self.state.catalog = dedup_by_id(payload.data);
        self.state.inflight.catalog = None;
        Ok(Outcome::Loaded { slot: Slot::Catalog, count: self.state.catalog.len() })
    }

    fn commit_categories(&mut self, body: &str) -> Result<Outcome> {
        let payload = decode_payload::<Vec<Category>>(body)?;
        self.state.categories = payload.data;
        self.state.inflight.categories = None;
        Ok(Outcome::Loaded { slot: Slot::Categories, count: self.state.categories.len() })
    }

    fn commit_detail(&mut self, body: &str) -> Result<Outcome> {
        let payload = decode_payload::<ArticleRecord>(body)?;
        let id = payload.data.id.clone();
        self.state.detail = Some(payload.data);
        self.state.inflight.detail = None;
        Ok(Outcome::DetailReady { id })
    }

    fn commit_recommendation(&mut self, body: &str) -> Result<Outcome> {
        let request = match self.state.inflight.recommendation.clone() {
            Some((_, request)) => request,
            None => return Ok(Outcome::None),
        };

        let recommendation = Recommender::complete(&request, body)?;
        let outcome = recommendation_outcome(&recommendation);
        self.state.recommendation = Some(recommendation);
        self.state.inflight.recommendation = None;
        Ok(outcome)
    }

    fn commit_refresh(&mut self, body: &str) -> Result<Outcome> {
        let report = decode_refresh(body)?;
        let message = report.message.clone();
        self.state.last_refresh = Some(report);
        self.state.inflight.refresh = None;

        // 文章库已更新，重新拉取列表和目录
        let mut intent = self.latest_intent();
        intent.page = 1;
        self.fetch_listing(intent);
        self.fetch_catalog();
        Ok(Outcome::Refreshed { message })
    }
}

impl Builder {
    fn commit_analysis(&mut self, body: &str) -> Result<Outcome> {
        let result = TextTools::analyzed(body)?;
        let outcome = Outcome::Analyzed {
            difficulty_level: result.difficulty_level.clone(),
            difficulty_score: result.difficulty_score,
        };
        self.state.text_analysis = Some(result);
        self.state.inflight.analysis = None;
        Ok(outcome)
    }

    fn commit_summary(&mut self, body: &str) -> Result<Outcome> {
        let result = TextTools::summarized(body)?;
        let outcome = Outcome::Summarized { quality: result.quality_percent() };
        self.state.summary = Some(result);
        self.state.inflight.summary = None;
        Ok(outcome)
    }

    fn commit_classification(&mut self, body: &str) -> Result<Outcome> {
        let result = TextTools::classified(body)?;
        let outcome = Outcome::Classified { category: result.category.clone() };
        self.state.classification = Some(result);
        self.state.inflight.classification = None;
        Ok(outcome)
    }
}

fn recommendation_outcome(recommendation: &Recommendation) -> Outcome {
    match recommendation {
        Recommendation::Articles { exam_level, articles } => Outcome::Recommended {
            exam_level: exam_level.clone(),
            count: articles.len(),
        },
        Recommendation::NoMatch { exam_level } => Outcome::NoRecommendation {
            exam_level: exam_level.clone(),
        },
    }
}

/// 给服务端原因加上操作前缀，列表和文本工具的错误在解析时已带前缀
fn with_context(slot: Slot, error: CatalogError) -> CatalogError {
    let context = match slot {
        Slot::Listing | Slot::Analysis | Slot::Summary | Slot::Classification => return error,
        Slot::Catalog => "加载目录失败",
        Slot::Categories => "加载分类失败",
        Slot::Detail => "加载文章详情失败",
        Slot::Recommendation => "推荐失败",
        Slot::Refresh => "爬取失败",
    };

    prefixed(context, error)
}

fn prefixed(context: &str, error: CatalogError) -> CatalogError {
    match error {
        CatalogError::Remote(reason) => CatalogError::Remote(format!("{}: {}", context, reason)),
        other => other,
    }
}

/// 按ID去重，保留第一次出现的记录
pub fn dedup_by_id(articles: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetches(transition: &Transition) -> Vec<(Ticket, ApiRequest)> {
        transition
            .effects
            .iter()
            .map(|effect| (effect.ticket(), effect.request().clone()))
            .collect()
    }

    #[test]
    fn init_issues_three_requests_with_increasing_tickets() {
        let t = CatalogState::default().update(Command::Init);
        let issued = fetches(&t);
        assert_eq!(issued.len(), 3);
        assert_eq!(issued.iter().map(|(t, _)| *t).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(issued[2].1, ApiRequest::ListCategories);
        assert!(t.state.is_loading());
        assert!(t.state.is_listing_pending());
    }

    #[test]
    fn unknown_ticket_is_stale() {
        let t = CatalogState::default().update(Command::Resolve {
            ticket: 99,
            response: ApiResponse::body("{}"),
        });
        assert_eq!(t.outcome, Outcome::Stale { ticket: 99 });
    }

    #[test]
    fn blank_search_never_issues_a_request() {
        let t = CatalogState::default().update(Command::Search { keyword: "   ".into() });
        assert!(t.effects.is_empty());
        assert!(matches!(t.outcome, Outcome::Failed { error: CatalogError::Validation(_) }));
        assert!(!t.state.is_loading());
    }

    #[test]
    fn unknown_exam_level_is_rejected() {
        let t = CatalogState::default().update(Command::Recommend { exam_level: "GRE".into() });
        assert!(t.effects.is_empty());
        assert!(matches!(t.outcome, Outcome::Failed { error: CatalogError::Validation(_) }));
    }

    #[test]
    fn sort_change_is_local() {
        let t = CatalogState::default().update(Command::SetSort { order: SortOrder::LengthAsc });
        assert!(t.effects.is_empty());
        assert_eq!(t.state.sort, SortOrder::LengthAsc);
    }

    #[test]
    fn page_zero_is_page_one() {
        let t = CatalogState::default().update(Command::GoToPage { page: 0 });
        assert_eq!(t.state.page, 1);
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut first = ArticleRecord::new(1);
        first.title = Some("first".into());
        let mut dup = ArticleRecord::new(1);
        dup.title = Some("dup".into());
        let out = dedup_by_id(vec![first, ArticleRecord::new(2), dup]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn commands_parse_from_host_json() {
        let command: Command =
            serde_json::from_str(r#"{"type": "set_filters", "criteria": {"category": "Tech"}}"#).unwrap();
        assert_eq!(
            command,
            Command::SetFilters {
                criteria: FilterCriteria { category: Some("Tech".into()), ..Default::default() }
            }
        );

        let command: Command = serde_json::from_str(
            r#"{"type": "resolve", "ticket": 4, "response": {"kind": "body", "body": "{}"}}"#,
        )
        .unwrap();
        assert_eq!(command, Command::Resolve { ticket: 4, response: ApiResponse::body("{}") });

        let command: Command = serde_json::from_str(r#"{"type": "open_article", "id": 12}"#).unwrap();
        assert_eq!(command, Command::OpenArticle { id: ArticleId::Int(12) });
    }
}
