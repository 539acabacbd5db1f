use serde::Serialize;
use std::collections::HashSet;
use utils_common::models::ArticleRecord;

/// 难度分布
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DifficultyCount {
    pub difficulty_level: String,
    pub count: usize,
}

/// 分面索引 - 从工作集派生的去重分类和来源
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FacetIndex {
    /// 按首次出现顺序排列的分类原始值
    pub categories: Vec<String>,
    /// 按首次出现顺序排列的来源
    pub sources: Vec<String>,
    /// 各难度等级的文章数
    pub difficulties: Vec<DifficultyCount>,
}

impl FacetIndex {
    pub fn from_articles(articles: &[ArticleRecord]) -> Self {
        let mut builder = FacetBuilder::new();
        for article in articles {
            builder.add_article(article);
        }
        builder.build()
    }
}

/// 目录统计
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CatalogStats {
    pub total_articles: usize,
    /// 平均难度，缺失评分按0计，保留一位小数
    pub average_difficulty: f64,
    /// 列表第一篇文章的入库时间
    pub last_update: Option<String>,
}

impl CatalogStats {
    pub fn from_articles(articles: &[ArticleRecord]) -> Self {
        if articles.is_empty() {
            return Self::default();
        }

        let sum: f64 = articles.iter().map(ArticleRecord::score_or_zero).sum();
        let average = sum / articles.len() as f64;

        Self {
            total_articles: articles.len(),
            average_difficulty: (average * 10.0).round() / 10.0,
            last_update: articles[0].created_at.clone(),
        }
    }
}

/// 分面索引构建器
pub struct FacetBuilder {
    categories: Vec<String>,
    sources: Vec<String>,
    difficulties: Vec<DifficultyCount>,
    seen_categories: HashSet<String>,
    seen_sources: HashSet<String>,
    articles: usize,
}

impl FacetBuilder {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            sources: Vec::new(),
            difficulties: Vec::new(),
            seen_categories: HashSet::new(),
            seen_sources: HashSet::new(),
            articles: 0,
        }
    }

    /// 收录一篇文章，空值不进入分面
    pub fn add_article(&mut self, article: &ArticleRecord) {
        self.articles += 1;

        if let Some(category) = article.category.as_deref().filter(|c| !c.is_empty()) {
            if self.seen_categories.insert(category.to_string()) {
                self.categories.push(category.to_string());
            }
        }

        if let Some(source) = article.source.as_deref().filter(|s| !s.is_empty()) {
            if self.seen_sources.insert(source.to_string()) {
                self.sources.push(source.to_string());
            }
        }

        if let Some(level) = article.difficulty_level.as_deref().filter(|l| !l.is_empty()) {
            match self.difficulties.iter_mut().find(|d| d.difficulty_level == level) {
                Some(entry) => entry.count += 1,
                None => self.difficulties.push(DifficultyCount {
                    difficulty_level: level.to_string(),
                    count: 1,
                }),
            }
        }
    }

    pub fn build(self) -> FacetIndex {
        tracing::debug!(
            articles = self.articles,
            categories = self.categories.len(),
            sources = self.sources.len(),
            "分面索引构建完成"
        );

        FacetIndex {
            categories: self.categories,
            sources: self.sources,
            difficulties: self.difficulties,
        }
    }
}

impl Default for FacetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, category: Option<&str>, source: Option<&str>, level: Option<&str>) -> ArticleRecord {
        let mut r = ArticleRecord::new(id);
        r.category = category.map(str::to_string);
        r.source = source.map(str::to_string);
        r.difficulty_level = level.map(str::to_string);
        r
    }

    #[test]
    fn facets_are_distinct_in_first_seen_order() {
        let articles = vec![
            article(1, Some("Tech"), Some("BBC"), Some("Advanced")),
            article(2, Some("Sports"), Some("CNN"), Some("Beginner")),
            article(3, Some("Tech"), Some("BBC"), Some("Advanced")),
            article(4, Some(""), None, None),
            article(5, Some("unknown"), Some("Guardian"), Some("Expert")),
        ];
        let index = FacetIndex::from_articles(&articles);
        assert_eq!(index.categories, vec!["Tech", "Sports", "unknown"]);
        assert_eq!(index.sources, vec!["BBC", "CNN", "Guardian"]);
        assert_eq!(
            index.difficulties,
            vec![
                DifficultyCount { difficulty_level: "Advanced".into(), count: 2 },
                DifficultyCount { difficulty_level: "Beginner".into(), count: 1 },
                DifficultyCount { difficulty_level: "Expert".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn stats_average_counts_missing_scores_as_zero() {
        let mut a = ArticleRecord::new(1);
        a.difficulty_score = Some(40.0);
        a.created_at = Some("2024-06-01 09:00:00".into());
        let mut b = ArticleRecord::new(2);
        b.difficulty_score = Some(35.5);
        let c = ArticleRecord::new(3);

        let stats = CatalogStats::from_articles(&[a, b, c]);
        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.average_difficulty, 25.2);
        assert_eq!(stats.last_update.as_deref(), Some("2024-06-01 09:00:00"));
        assert_eq!(CatalogStats::from_articles(&[]), CatalogStats::default());
    }
}
