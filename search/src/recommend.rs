//! 推荐选择器 - 按考试等级向远程接口请求合适的文章
//!
//! 选择本身交给远程接口，这里负责组装请求、归类响应，并提供
//! 评分到考试等级的参考映射（只用于展示）。

use crate::models::Recommendation;
use serde::{Deserialize, Serialize};
use std::fmt;
use utils_common::envelope::decode_payload;
use utils_common::error::{CatalogError, Result};
use utils_common::models::{ArticleRecord, DifficultyLevel};

/// 默认推荐条数
pub const DEFAULT_RECOMMEND_LIMIT: usize = 6;

/// 可识别的考试等级
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamLevel {
    #[serde(rename = "CET-4")]
    Cet4,
    #[serde(rename = "CET-6")]
    Cet6,
    #[serde(rename = "IELTS-6.0")]
    Ielts60,
    #[serde(rename = "TOEFL-80")]
    Toefl80,
    #[serde(rename = "IELTS-6.5")]
    Ielts65,
    #[serde(rename = "TOEFL-90")]
    Toefl90,
    #[serde(rename = "IELTS-7.0")]
    Ielts70,
    #[serde(rename = "TOEFL-100")]
    Toefl100,
}

impl ExamLevel {
    pub const ALL: [ExamLevel; 8] = [
        ExamLevel::Cet4,
        ExamLevel::Cet6,
        ExamLevel::Ielts60,
        ExamLevel::Toefl80,
        ExamLevel::Ielts65,
        ExamLevel::Toefl90,
        ExamLevel::Ielts70,
        ExamLevel::Toefl100,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamLevel::Cet4 => "CET-4",
            ExamLevel::Cet6 => "CET-6",
            ExamLevel::Ielts60 => "IELTS-6.0",
            ExamLevel::Toefl80 => "TOEFL-80",
            ExamLevel::Ielts65 => "IELTS-6.5",
            ExamLevel::Toefl90 => "TOEFL-90",
            ExamLevel::Ielts70 => "IELTS-7.0",
            ExamLevel::Toefl100 => "TOEFL-100",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|level| level.as_str().eq_ignore_ascii_case(raw))
    }

    /// 考试等级对应的目标难度
    pub fn target_difficulty(&self) -> DifficultyLevel {
        match self {
            ExamLevel::Cet4 => DifficultyLevel::Beginner,
            ExamLevel::Cet6 | ExamLevel::Ielts60 | ExamLevel::Toefl80 => DifficultyLevel::Intermediate,
            ExamLevel::Ielts65 | ExamLevel::Toefl90 | ExamLevel::Ielts70 | ExamLevel::Toefl100 => {
                DifficultyLevel::Advanced
            }
        }
    }
}

impl fmt::Display for ExamLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未识别的考试标识按最高难度处理
pub fn target_difficulty(raw: &str) -> DifficultyLevel {
    ExamLevel::parse(raw)
        .map(|level| level.target_difficulty())
        .unwrap_or(DifficultyLevel::Expert)
}

/// 评分对应的参考考试
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamAdvisory {
    Cet4,
    Cet6,
    Ielts60Toefl80,
    Ielts65Toefl90,
    Ielts70,
    Toefl100Plus,
}

impl ExamAdvisory {
    pub fn label(&self) -> &'static str {
        match self {
            ExamAdvisory::Cet4 => "CET-4",
            ExamAdvisory::Cet6 => "CET-6",
            ExamAdvisory::Ielts60Toefl80 => "IELTS-6.0 / TOEFL-80",
            ExamAdvisory::Ielts65Toefl90 => "IELTS-6.5 / TOEFL-90",
            ExamAdvisory::Ielts70 => "IELTS-7.0",
            ExamAdvisory::Toefl100Plus => "TOEFL-100+",
        }
    }
}

/// 评分到考试的阶梯映射，每档包含下界
pub fn recommended_exam(score: f64) -> ExamAdvisory {
    if score < 30.0 {
        ExamAdvisory::Cet4
    } else if score < 40.0 {
        ExamAdvisory::Cet6
    } else if score < 50.0 {
        ExamAdvisory::Ielts60Toefl80
    } else if score < 60.0 {
        ExamAdvisory::Ielts65Toefl90
    } else if score < 70.0 {
        ExamAdvisory::Ielts70
    } else {
        ExamAdvisory::Toefl100Plus
    }
}

/// 推荐请求
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecommendRequest {
    pub exam_level: ExamLevel,
    pub limit: usize,
}

impl RecommendRequest {
    pub fn new(exam_level: &str, limit: usize) -> Result<Self> {
        let level = ExamLevel::parse(exam_level).ok_or_else(|| {
            CatalogError::Validation(format!("无法识别的考试等级: {}", exam_level.trim()))
        })?;

        Ok(Self {
            exam_level: level,
            limit: limit.max(1),
        })
    }
}

/// 推荐选择器
pub struct Recommender;

impl Recommender {
    /// 归类推荐接口的响应
    pub fn complete(request: &RecommendRequest, body: &str) -> Result<Recommendation> {
        let payload = decode_payload::<Vec<ArticleRecord>>(body)?;
        Ok(Self::classify(request.exam_level, payload.data))
    }

    /// 离线时从工作集中选择目标难度的文章，保持原有顺序
    pub fn select_from(working_set: &[ArticleRecord], request: &RecommendRequest) -> Recommendation {
        let target = request.exam_level.target_difficulty();
        let articles = working_set
            .iter()
            .filter(|article| article.difficulty() == Some(target))
            .take(request.limit)
            .cloned()
            .collect();

        Self::classify(request.exam_level, articles)
    }

    fn classify(exam_level: ExamLevel, articles: Vec<ArticleRecord>) -> Recommendation {
        let exam_level = exam_level.as_str().to_string();
        if articles.is_empty() {
            tracing::debug!(%exam_level, "没有适合该等级的文章");
            Recommendation::NoMatch { exam_level }
        } else {
            Recommendation::Articles { exam_level, articles }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_boundaries_include_lower_bound() {
        assert_eq!(recommended_exam(0.0).label(), "CET-4");
        assert_eq!(recommended_exam(29.0).label(), "CET-4");
        assert_eq!(recommended_exam(29.9).label(), "CET-4");
        assert_eq!(recommended_exam(30.0).label(), "CET-6");
        assert_eq!(recommended_exam(40.0).label(), "IELTS-6.0 / TOEFL-80");
        assert_eq!(recommended_exam(50.0).label(), "IELTS-6.5 / TOEFL-90");
        assert_eq!(recommended_exam(60.0).label(), "IELTS-7.0");
        assert_eq!(recommended_exam(69.0).label(), "IELTS-7.0");
        assert_eq!(recommended_exam(70.0).label(), "TOEFL-100+");
        assert_eq!(recommended_exam(100.0).label(), "TOEFL-100+");
    }

    #[test]
    fn exam_levels_parse_from_identifiers() {
        for level in ExamLevel::ALL {
            assert_eq!(ExamLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(ExamLevel::parse(" ielts-6.5 "), Some(ExamLevel::Ielts65));
        assert_eq!(ExamLevel::parse("GRE"), None);
    }

    #[test]
    fn exam_levels_map_to_target_difficulty() {
        assert_eq!(target_difficulty("CET-4"), DifficultyLevel::Beginner);
        assert_eq!(target_difficulty("TOEFL-80"), DifficultyLevel::Intermediate);
        assert_eq!(target_difficulty("IELTS-7.0"), DifficultyLevel::Advanced);
        assert_eq!(target_difficulty("GRE"), DifficultyLevel::Expert);
    }

    #[test]
    fn unknown_exam_level_is_rejected_locally() {
        let err = RecommendRequest::new("GMAT", 6).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let request = RecommendRequest::new("CET-6", 6).unwrap();
        let outcome = Recommender::complete(&request, r#"{"success": true, "data": []}"#).unwrap();
        assert_eq!(outcome, Recommendation::NoMatch { exam_level: "CET-6".into() });
        assert!(outcome.articles().is_empty());
    }

    #[test]
    fn server_failure_stays_distinct_from_empty() {
        let request = RecommendRequest::new("CET-6", 6).unwrap();
        let err = Recommender::complete(&request, r#"{"success": false, "error": "db down"}"#)
            .unwrap_err();
        assert_eq!(err, CatalogError::Remote("db down".into()));

        let err = Recommender::complete(&request, "Bad Gateway").unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn offline_selection_keeps_order_and_limit() {
        let articles: Vec<ArticleRecord> = (1..=5)
            .map(|id| {
                let mut r = ArticleRecord::new(id);
                r.difficulty_level = Some(if id % 2 == 0 { "Beginner" } else { "Advanced" }.into());
                r
            })
            .collect();

        let request = RecommendRequest::new("IELTS-7.0", 2).unwrap();
        let picked = Recommender::select_from(&articles, &request);
        let ids: Vec<String> = picked.articles().iter().map(|a| a.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(picked.exam_level(), "IELTS-7.0");
    }
}
