//! 展示文本映射 - 把原始字段值转换为页面可直接显示的标签
//!
//! 这里只做查表和归一化，没有任何 I/O。分类中的 "unknown" 只在这一层
//! 归一化为"综合"，筛选仍然匹配存储的原始值。

use crate::models::{parse_timestamp, DifficultyLevel};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 界面语言
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Locale {
    fn unknown(self) -> &'static str {
        match self {
            Locale::ZhCn => "未知",
            Locale::EnUs => "Unknown",
        }
    }
}

impl DifficultyLevel {
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (DifficultyLevel::Beginner, Locale::ZhCn) => "初级",
            (DifficultyLevel::Intermediate, Locale::ZhCn) => "中级",
            (DifficultyLevel::Advanced, Locale::ZhCn) => "高级",
            (DifficultyLevel::Expert, Locale::ZhCn) => "专家级",
            (DifficultyLevel::Beginner, Locale::EnUs) => "Beginner",
            (DifficultyLevel::Intermediate, Locale::EnUs) => "Intermediate",
            (DifficultyLevel::Advanced, Locale::EnUs) => "Advanced",
            (DifficultyLevel::Expert, Locale::EnUs) => "Expert",
        }
    }

    /// 学习建议
    pub fn advice(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (DifficultyLevel::Beginner, Locale::ZhCn) => "适合英语初学者，建议先掌握基础词汇和语法",
            (DifficultyLevel::Intermediate, Locale::ZhCn) => "适合有一定基础的学习者，重点学习长难句和复杂词汇",
            (DifficultyLevel::Advanced, Locale::ZhCn) => "适合英语水平较高的学习者，关注文章结构和逻辑关系",
            (DifficultyLevel::Expert, Locale::ZhCn) => "适合英语专业或高水平学习者，进行深度阅读和批判性思考",
            (DifficultyLevel::Beginner, Locale::EnUs) => {
                "For beginners: build core vocabulary and grammar first"
            }
            (DifficultyLevel::Intermediate, Locale::EnUs) => {
                "For learners with a foundation: focus on long sentences and harder vocabulary"
            }
            (DifficultyLevel::Advanced, Locale::EnUs) => {
                "For advanced learners: pay attention to structure and logical flow"
            }
            (DifficultyLevel::Expert, Locale::EnUs) => {
                "For expert readers: read in depth and think critically"
            }
        }
    }
}

/// 难度标签：已知等级查表，其余原样返回，缺失时显示"未知"
pub fn difficulty_label(raw: Option<&str>, locale: Locale) -> String {
    match raw {
        Some(value) => match DifficultyLevel::parse(value) {
            Some(level) => level.label(locale).to_string(),
            None if !value.is_empty() => value.to_string(),
            None => locale.unknown().to_string(),
        },
        None => locale.unknown().to_string(),
    }
}

/// 难度样式键，例如 `difficulty-beginner`
pub fn difficulty_key(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.is_empty() => value.to_lowercase(),
        _ => "unknown".to_string(),
    }
}

/// 学习建议，无法识别的等级使用默认文案
pub fn difficulty_advice(raw: Option<&str>, locale: Locale) -> &'static str {
    match raw.and_then(DifficultyLevel::parse) {
        Some(level) => level.advice(locale),
        None => match locale {
            Locale::ZhCn => "根据个人水平选择合适的学习方法",
            Locale::EnUs => "Choose a study approach that suits your level",
        },
    }
}

/// 分类标签：空值为"未分类"，unknown/未知 统一为"综合"
pub fn category_label(raw: Option<&str>, locale: Locale) -> String {
    let value = raw.unwrap_or("");
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return match locale {
            Locale::ZhCn => "未分类",
            Locale::EnUs => "Uncategorized",
        }
        .to_string();
    }

    let folded = trimmed.to_lowercase();
    if folded == "unknown" || folded == "未知" {
        return match locale {
            Locale::ZhCn => "综合",
            Locale::EnUs => "General",
        }
        .to_string();
    }

    value.to_string()
}

/// 日期标签，无法解析的值原样返回
pub fn date_label(raw: Option<&str>, locale: Locale) -> String {
    let value = match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => return locale.unknown().to_string(),
    };

    match calendar_date(value) {
        Some(date) => match locale {
            Locale::ZhCn => format!("{}/{}/{}", date.year(), date.month(), date.day()),
            Locale::EnUs => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        },
        None => value.to_string(),
    }
}

/// 带时区偏移的时间按其自身偏移取日期
fn calendar_date(value: &str) -> Option<NaiveDate> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Some(dt.date_naive()),
        Err(_) => parse_timestamp(value).map(|dt| dt.date_naive()),
    }
}

pub fn author_label(raw: Option<&str>, locale: Locale) -> String {
    match raw {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => match locale {
            Locale::ZhCn => "未知作者",
            Locale::EnUs => "Unknown author",
        }
        .to_string(),
    }
}

pub fn source_label(raw: Option<&str>, locale: Locale) -> String {
    match raw {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => match locale {
            Locale::ZhCn => "未知来源",
            Locale::EnUs => "Unknown source",
        }
        .to_string(),
    }
}

/// 截取摘要前 `max_chars` 个字符并追加省略号
pub fn summary_preview(summary: &str, max_chars: usize) -> String {
    let preview: String = summary.chars().take(max_chars).collect();
    format!("{}...", preview)
}
