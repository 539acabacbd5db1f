use serde::{Deserialize, Serialize};
use utils_common::models::ArticleRecord;

/// 搜索请求 - 已校验的关键词和请求条数
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// 去除首尾空白后的关键词
    pub keyword: String,
    /// 请求条数，不超过上限
    pub limit: usize,
}

/// 搜索结果
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// 搜索关键词
    pub keyword: String,
    /// 按接口返回的相关度顺序排列
    pub articles: Vec<ArticleRecord>,
    /// 匹配总数，与分页截断无关
    pub total: usize,
}

/// 推荐结果 - 空结果是正常结果，不是错误
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Articles {
        exam_level: String,
        articles: Vec<ArticleRecord>,
    },
    NoMatch {
        exam_level: String,
    },
}

impl Recommendation {
    pub fn articles(&self) -> &[ArticleRecord] {
        match self {
            Recommendation::Articles { articles, .. } => articles.as_slice(),
            Recommendation::NoMatch { .. } => &[],
        }
    }

    pub fn exam_level(&self) -> &str {
        match self {
            Recommendation::Articles { exam_level, .. } | Recommendation::NoMatch { exam_level } => {
                exam_level.as_str()
            }
        }
    }
}
