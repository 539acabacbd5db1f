use serde::{Deserialize, Serialize};
use utils_common::models::ArticleRecord;

/// 筛选条件 - 未设置的条件不做约束
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// 分类，精确匹配存储的原始值
    #[serde(default)]
    pub category: Option<String>,
    /// 难度等级，精确匹配
    #[serde(default, alias = "difficulty")]
    pub difficulty_level: Option<String>,
    /// 来源，精确匹配
    #[serde(default)]
    pub source: Option<String>,
}

impl FilterCriteria {
    /// 空字符串等同于未设置（下拉框的"全部"选项）
    pub fn category(&self) -> Option<&str> {
        active(&self.category)
    }

    pub fn difficulty_level(&self) -> Option<&str> {
        active(&self.difficulty_level)
    }

    pub fn source(&self) -> Option<&str> {
        active(&self.source)
    }

    pub fn is_empty(&self) -> bool {
        self.category().is_none() && self.difficulty_level().is_none() && self.source().is_none()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 排序方式
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Newest,
    Oldest,
    DifficultyAsc,
    DifficultyDesc,
    LengthAsc,
    LengthDesc,
    /// 保持输入顺序（搜索结果已按相关度排列）
    #[default]
    #[serde(other)]
    Relevance,
}

/// 筛选参数 - 客户端传递的筛选条件
#[derive(Deserialize, Debug, Default)]
pub struct FilterParams {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    /// 排序方式 (可选)
    #[serde(default)]
    pub sort: SortOrder,
    /// 分页 - 当前页码 (可选, 默认为1)
    pub page: Option<usize>,
    /// 分页 - 每页条数 (可选, 默认为12)
    pub limit: Option<usize>,
}

/// 筛选结果 - 返回给客户端的当前页
#[derive(Serialize, Debug)]
pub struct FilterResult {
    /// 当前页的文章
    pub articles: Vec<ArticleRecord>,
    /// 分页描述
    pub pagination: crate::pagination::PageDescriptor,
}
