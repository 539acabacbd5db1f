use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 文章唯一标识符 - 接口可能返回整数或字符串
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ArticleId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleId::Int(n) => write!(f, "{}", n),
            ArticleId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ArticleId {
    fn from(value: i64) -> Self {
        ArticleId::Int(value)
    }
}

impl From<&str> for ArticleId {
    fn from(value: &str) -> Self {
        ArticleId::Str(value.to_string())
    }
}

/// 难度等级 - 封闭枚举，其余取值按原始字符串处理
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
        DifficultyLevel::Expert,
    ];

    /// 精确匹配存储值，不做大小写折叠
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Beginner" => Some(DifficultyLevel::Beginner),
            "Intermediate" => Some(DifficultyLevel::Intermediate),
            "Advanced" => Some(DifficultyLevel::Advanced),
            "Expert" => Some(DifficultyLevel::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
            DifficultyLevel::Expert => "Expert",
        }
    }
}

/// 文章记录 - 客户端看到的一篇文章的不可变快照
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ArticleRecord {
    /// 文章唯一标识符
    pub id: ArticleId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// 分类原始值，"unknown" 只在展示时归一化
    #[serde(default)]
    pub category: Option<String>,
    /// 逗号分隔的标签串
    #[serde(default)]
    pub tags: Option<String>,
    /// 难度等级原始值
    #[serde(default)]
    pub difficulty_level: Option<String>,
    /// 难度评分 (0-100)
    #[serde(default)]
    pub difficulty_score: Option<f64>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ArticleRecord {
    /// 创建只有ID的空记录
    pub fn new(id: impl Into<ArticleId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            author: None,
            source: None,
            url: None,
            content: None,
            summary: None,
            category: None,
            tags: None,
            difficulty_level: None,
            difficulty_score: None,
            word_count: None,
            publish_date: None,
            created_at: None,
        }
    }

    /// 拆分标签串，去掉空白和空项
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn difficulty(&self) -> Option<DifficultyLevel> {
        self.difficulty_level.as_deref().and_then(DifficultyLevel::parse)
    }

    /// 排序用时间：优先 created_at，其次 publish_date
    pub fn sort_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .or(self.publish_date.as_deref())
            .and_then(parse_timestamp)
    }

    pub fn score_or_zero(&self) -> f64 {
        self.difficulty_score.unwrap_or(0.0)
    }

    pub fn words_or_zero(&self) -> u64 {
        self.word_count.unwrap_or(0)
    }
}

/// 解析接口返回的时间字符串
///
/// 支持 RFC 3339、`YYYY-MM-DD HH:MM:SS`（可带小数秒或 `T` 分隔）以及纯日期。
/// 无法解析时返回 `None`，排序时按最早时间处理。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 分类条目 - listCategories 返回
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 更新文章库的结果
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RefreshReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub crawled_count: Option<u64>,
    #[serde(default)]
    pub processed_ok: Option<u64>,
    #[serde(default)]
    pub saved_count: Option<u64>,
    #[serde(default)]
    pub skipped_count: Option<u64>,
    #[serde(default)]
    pub failed_count: Option<u64>,
}
