//! 解析リクエスト
//!
//! 入力フォームの内容（車種・画像・手入力リスト）と、
//! ネットワーク呼び出し前の入力チェック、部品名の統合処理

use crate::types::ImageBlob;
use std::collections::HashSet;
use thiserror::Error;

/// 手動追加時に使う仮の車種名
pub const PLACEHOLDER_VEHICLE_MODEL: &str = "خودرو";

/// AI処理失敗時の共通メッセージ
pub const PROCESSING_FAILED_MESSAGE: &str = "خطایی در پردازش رخ داد. لطفا دوباره تلاش کنید.";

/// 入力チェックエラー（表示メッセージ付き）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("لطفا مدل خودرو را وارد کنید.")]
    MissingVehicleModel,

    #[error("لطفا حداقل یک منبع (تصویر یا لیست دستی) برای تحلیل انتخاب کنید.")]
    NoSourceSelected,

    #[error("برای تحلیل با تصویر، لطفا حداقل یک عکس بارگذاری کنید.")]
    NoImages,
}

/// 解析フォームの送信内容
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub vehicle_model: String,
    pub images: Vec<ImageBlob>,
    pub manual_parts: String,
    pub use_images: bool,
    pub use_manual_list: bool,
}

impl AnalysisRequest {
    /// 入力チェック（順序固定、最初のエラーで終了）
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.vehicle_model.trim().is_empty() {
            return Err(ValidationError::MissingVehicleModel);
        }
        if !self.use_images && !self.use_manual_list {
            return Err(ValidationError::NoSourceSelected);
        }
        if self.use_images && self.images.is_empty() {
            return Err(ValidationError::NoImages);
        }
        Ok(())
    }

    /// 手入力リストの部品名（無効時は空）
    pub fn manual_part_names(&self) -> Vec<String> {
        if self.use_manual_list {
            split_manual_parts(&self.manual_parts)
        } else {
            Vec::new()
        }
    }
}

/// 改行区切りの部品リストを分割（前後空白除去、空行除外）
pub fn split_manual_parts(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 検出部品名と手入力部品名を統合
///
/// 完全一致で重複を除去し、最初の出現位置を保持する
/// （検出結果が先、手入力のみの部品が後ろ）
pub fn combine_part_names(detected: &[String], manual: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    detected
        .iter()
        .chain(manual.iter())
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
