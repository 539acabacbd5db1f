pub mod compression;
pub mod envelope;
pub mod error;
pub mod labels;
pub mod models;

// 重新导出常用类型，方便直接使用
pub use compression::{ListingBundle, to_compressed, from_compressed_with_max_version, validate_compressed_data};
pub use envelope::{decode, decode_payload, decode_refresh, Envelope, Payload};
pub use error::{CatalogError, Result};
pub use labels::Locale;
pub use models::{parse_timestamp, ArticleId, ArticleRecord, Category, DifficultyLevel, RefreshReport};
