//! 列表导出文件的扫描与合并

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use utils_common::envelope::decode_payload;
use utils_common::error::{CatalogError, Result};
use utils_common::models::ArticleRecord;

/// 扫描结果
#[derive(Debug, Default)]
pub struct ScanReport {
    /// 按文件名顺序合并、去重后的文章
    pub articles: Vec<ArticleRecord>,
    pub files_read: usize,
    pub files_skipped: usize,
    pub duplicates: usize,
}

/// 递归读取目录下的 JSON 列表导出
///
/// 每个文件可以是接口信封 `{success, data: [...]}`，也可以是裸数组。
/// 无法解析的文件跳过并记录警告；同一ID只保留第一次出现的记录。
pub fn scan_listing_dumps(dir: &Path) -> Result<ScanReport> {
    let mut report = ScanReport::default();
    let mut seen = std::collections::HashSet::new();

    let walker = WalkDir::new(dir).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| CatalogError::Bundle(format!("遍历目录时出错: {}", e)))?;

        if !entry.file_type().is_file() || !entry.path().extension().map_or(false, |ext| ext == "json") {
            continue;
        }

        let articles = match read_dump(entry.path()) {
            Ok(articles) => articles,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), %err, "跳过无法解析的文件");
                report.files_skipped += 1;
                continue;
            }
        };

        report.files_read += 1;
        tracing::debug!(path = %entry.path().display(), count = articles.len(), "读取列表");

        for article in articles {
            if seen.insert(article.id.clone()) {
                report.articles.push(article);
            } else {
                report.duplicates += 1;
            }
        }
    }

    Ok(report)
}

fn read_dump(path: &Path) -> Result<Vec<ArticleRecord>> {
    let text = fs::read_to_string(path)?;

    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(&text)?);
    }
    Ok(decode_payload::<Vec<ArticleRecord>>(&text)?.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn merges_envelopes_and_arrays_first_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"success": true, "data": [{"id": 1, "title": "first"}, {"id": 2}]}"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested").join("b.json"),
            r#"[{"id": 1, "title": "later"}, {"id": "cnn-3"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let report = scan_listing_dumps(dir.path()).unwrap();
        assert_eq!(report.files_read, 2);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.articles[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn failed_and_malformed_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        fs::write(dir.path().join("failed.json"), r#"{"success": false, "error": "boom"}"#).unwrap();
        fs::write(dir.path().join("ok.json"), r#"[{"id": 7}]"#).unwrap();

        let report = scan_listing_dumps(dir.path()).unwrap();
        assert_eq!(report.files_skipped, 2);
        assert_eq!(report.files_read, 1);
        assert_eq!(report.articles.len(), 1);
    }
}
