use crate::models::ArticleRecord;
use chrono::{DateTime, Utc};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// 魔数常量 - 用于标识快照文件格式
pub const MAGIC_BYTES: &[u8] = b"ARCAT"; // Article Catalog

/// 当前快照格式版本
pub const BUNDLE_VERSION: [u8; 2] = [1, 0];

const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 预分配时假定的最大压缩比，头部长度不可信
const MAX_PREALLOC_RATIO: usize = 16;

/// 文章列表快照 - 离线预置的工作集
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListingBundle {
    /// 快照生成时间
    pub created_at: DateTime<Utc>,
    /// 快照中的文章，按列表接口返回的顺序
    pub articles: Vec<ArticleRecord>,
}

impl ListingBundle {
    pub fn new(articles: Vec<ArticleRecord>, created_at: DateTime<Utc>) -> Self {
        Self { created_at, articles }
    }

    pub fn to_compressed(&self) -> Result<Vec<u8>, io::Error> {
        to_compressed(self, BUNDLE_VERSION)
    }

    pub fn from_compressed(data: &[u8]) -> Result<Self, io::Error> {
        from_compressed_with_max_version(data, BUNDLE_VERSION[0])
    }
}

/// 将对象序列化为压缩格式：魔数 + 版本 + 原始长度 + gzip(JSON)
pub fn to_compressed<T: Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let json = serde_json::to_vec(obj)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("序列化失败: {}", e)))?;

    let mut output = Vec::with_capacity(HEADER_LEN + json.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&(json.len() as u32).to_le_bytes());

    let mut encoder = GzEncoder::new(output, Compression::best());
    encoder.write_all(&json)?;
    encoder.finish()
}

/// 从压缩格式反序列化对象，允许指定支持的最大主版本
pub fn from_compressed_with_max_version<T: for<'a> Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let (_, original_size) = read_header(data, max_version)?;

    let compressed = &data[HEADER_LEN..];
    let capacity = original_size.min(compressed.len().saturating_mul(MAX_PREALLOC_RATIO));
    let mut json = Vec::with_capacity(capacity);
    // 多读一个字节以便发现超长数据
    GzDecoder::new(compressed)
        .take(original_size as u64 + 1)
        .read_to_end(&mut json)?;

    if json.len() != original_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节", original_size, json.len()),
        ));
    }

    serde_json::from_slice(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("反序列化失败: {}", e)))
}

/// 验证快照头部，返回版本号
pub fn validate_compressed_data(data: &[u8], max_version: u8) -> Result<[u8; 2], io::Error> {
    read_header(data, max_version).map(|(version, _)| version)
}

fn read_header(data: &[u8], max_version: u8) -> Result<([u8; 2], usize), io::Error> {
    if data.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("数据太短，无法解析: {} 字节", data.len()),
        ));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "无效的文件格式：魔数不匹配"));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("不支持的版本: {}.{}", version[0], version[1]),
        ));
    }

    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[version_offset + 2..HEADER_LEN]);
    Ok((version, u32::from_le_bytes(size_bytes) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bundle() -> ListingBundle {
        let mut first = ArticleRecord::new(1);
        first.title = Some("Global trade slows".to_string());
        first.category = Some("Business".to_string());
        let second = ArticleRecord::new("cnn-2");
        ListingBundle::new(vec![first, second], Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
    }

    #[test]
    fn bundle_survives_compression() {
        let bundle = sample_bundle();
        let bytes = bundle.to_compressed().unwrap();
        assert_eq!(&bytes[..5], MAGIC_BYTES);
        assert_eq!(validate_compressed_data(&bytes, 1).unwrap(), BUNDLE_VERSION);
        assert_eq!(ListingBundle::from_compressed(&bytes).unwrap(), bundle);
    }

    #[test]
    fn rejects_foreign_or_newer_data() {
        let mut bytes = sample_bundle().to_compressed().unwrap();
        bytes[MAGIC_BYTES.len()] = 9;
        assert!(ListingBundle::from_compressed(&bytes).is_err());

        assert!(ListingBundle::from_compressed(b"NECMP\x03\x00\x00\x00\x00\x00").is_err());
        assert!(ListingBundle::from_compressed(b"ARC").is_err());
    }

    #[test]
    fn oversized_header_length_is_rejected() {
        let mut bytes = sample_bundle().to_compressed().unwrap();
        bytes[MAGIC_BYTES.len() + 2..HEADER_LEN].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = ListingBundle::from_compressed(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        // 声明长度小于实际长度
        let mut bytes = sample_bundle().to_compressed().unwrap();
        bytes[MAGIC_BYTES.len() + 2..HEADER_LEN].copy_from_slice(&4u32.to_le_bytes());
        assert!(ListingBundle::from_compressed(&bytes).is_err());
    }

    #[test]
    fn detects_truncated_payload() {
        let bytes = sample_bundle().to_compressed().unwrap();
        let truncated = &bytes[..HEADER_LEN + (bytes.len() - HEADER_LEN) / 2];
        assert!(ListingBundle::from_compressed(truncated).is_err());
    }
}
