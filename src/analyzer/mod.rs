//! AI連携（損傷検出・価格見積り）
//!
//! 外部AIサービスは EstimationService トレイトの背後に置き、
//! 状態機械からはレスポンスの検証済みデータのみを受け取る

pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;
use damage_estimator_common::{ImageBlob, PartRecord};

#[async_trait]
pub trait EstimationService: Send + Sync {
    /// 画像から損傷部品名を抽出（空リストは正常）
    async fn detect_damaged_parts(&self, images: &[ImageBlob], vehicle_model: &str) -> Result<Vec<String>>;

    /// 部品名リストの価格・工賃を取得
    async fn resolve_parts(&self, names: &[String], vehicle_model: &str) -> Result<Vec<PartRecord>>;
}
