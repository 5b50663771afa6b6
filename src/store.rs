//! 部品リストの永続化
//!
//! 単一キーに部品リスト（JSON）を保存する。
//! 読み込み失敗・破損データは「保存なし」として扱い、
//! 書き込み失敗はログのみでエラーを返さない。

use crate::error::{EstimatorError, Result};
use damage_estimator_common::Part;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// 保存キー
pub const STORAGE_KEY: &str = "car_damage_estimator_parts";

/// 部品リストの保存先
pub trait Store {
    /// 保存済みリスト（なし・破損時は空）
    fn load(&self) -> Vec<Part>;
    /// ベストエフォートで保存
    fn save(&self, parts: &[Part]);
    /// 保存データを削除
    fn clear(&self);
}

fn decode(raw: &str) -> Vec<Part> {
    match serde_json::from_str::<Vec<Part>>(raw) {
        Ok(parts) => parts,
        Err(e) => {
            warn!("保存データが不正のため破棄します: {}", e);
            Vec::new()
        }
    }
}

/// ファイル保存
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// デフォルトの保存ファイル（データディレクトリ/car-damage-estimator/<key>.json）
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| EstimatorError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("car-damage-estimator").join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, parts: &[Part]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(parts)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn load(&self) -> Vec<Part> {
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(e) => {
                warn!("保存データの読み込みに失敗: {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    fn save(&self, parts: &[Part]) {
        match self.write(parts) {
            Ok(()) => debug!("部品リストを保存: {}件 → {}", parts.len(), self.path.display()),
            Err(e) => warn!("部品リストの保存に失敗: {}", e),
        }
    }

    fn clear(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("保存データの削除に失敗: {}: {}", self.path.display(), e);
        }
    }
}

/// メモリ上の保存（テスト用・一時利用）
///
/// 生のJSON文字列を保持するため、破損データも再現できる
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生データを指定して作成
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
        }
    }

    /// 保存済みの生データ
    pub fn raw(&self) -> Option<String> {
        self.record.lock().ok().and_then(|r| r.clone())
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Vec<Part> {
        self.raw().map(|raw| decode(&raw)).unwrap_or_default()
    }

    fn save(&self, parts: &[Part]) {
        match serde_json::to_string(parts) {
            Ok(json) => {
                if let Ok(mut record) = self.record.lock() {
                    *record = Some(json);
                }
            }
            Err(e) => warn!("部品リストのシリアライズに失敗: {}", e),
        }
    }

    fn clear(&self) {
        if let Ok(mut record) = self.record.lock() {
            *record = None;
        }
    }
}

impl<T: Store + ?Sized> Store for &T {
    fn load(&self) -> Vec<Part> {
        (**self).load()
    }

    fn save(&self, parts: &[Part]) {
        (**self).save(parts)
    }

    fn clear(&self) {
        (**self).clear()
    }
}
