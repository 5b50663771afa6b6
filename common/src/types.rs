//! 見積りデータの型定義
//!
//! CLIと保存データで共有される型:
//! - PartRecord: AIが返す価格付き部品レコード
//! - Part: 画面上の部品（PartRecord + 選択状態）
//! - Screen: アプリケーション画面

use serde::{Deserialize, Serialize};

/// 部品の扱い（新品・中古・修理）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartSelection {
    #[default]
    New,
    Used,
    Repair,
}

impl PartSelection {
    pub const ALL: [PartSelection; 3] = [PartSelection::New, PartSelection::Used, PartSelection::Repair];

    /// 画面・レポート用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            PartSelection::New => "نو",
            PartSelection::Used => "کارکرده",
            PartSelection::Repair => "تعمیر",
        }
    }
}

impl std::str::FromStr for PartSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "n" | "نو" => Ok(PartSelection::New),
            "used" | "u" | "کارکرده" => Ok(PartSelection::Used),
            "repair" | "r" | "تعمیر" => Ok(PartSelection::Repair),
            _ => Err(format!("Unknown selection: {}. Use new, used, or repair", s)),
        }
    }
}

impl std::fmt::Display for PartSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartSelection::New => write!(f, "new"),
            PartSelection::Used => write!(f, "used"),
            PartSelection::Repair => write!(f, "repair"),
        }
    }
}

/// 価格レコード（AIレスポンスの1要素）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub name: String,
    pub new_price: u64,
    pub used_price: u64,
    pub repair_cost: u64,
    #[serde(default)]
    pub source_url: String,
}

/// 見積り対象の部品
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub name: String,
    pub new_price: u64,
    pub used_price: u64,
    pub repair_cost: u64,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub selection: PartSelection,
}

impl Part {
    /// 価格フィールドの値を取得
    pub fn price(&self, field: PriceField) -> u64 {
        match field {
            PriceField::NewPrice => self.new_price,
            PriceField::UsedPrice => self.used_price,
            PriceField::RepairCost => self.repair_cost,
        }
    }

    /// 価格フィールドを書き換え
    pub fn set_price(&mut self, field: PriceField, value: u64) {
        match field {
            PriceField::NewPrice => self.new_price = value,
            PriceField::UsedPrice => self.used_price = value,
            PriceField::RepairCost => self.repair_cost = value,
        }
    }
}

impl From<PartRecord> for Part {
    fn from(record: PartRecord) -> Self {
        Self {
            name: record.name,
            new_price: record.new_price,
            used_price: record.used_price,
            repair_cost: record.repair_cost,
            source_url: record.source_url,
            selection: PartSelection::New,
        }
    }
}

/// 編集可能な価格フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    NewPrice,
    UsedPrice,
    RepairCost,
}

impl PriceField {
    pub const ALL: [PriceField; 3] = [PriceField::NewPrice, PriceField::UsedPrice, PriceField::RepairCost];

    pub fn label(&self) -> &'static str {
        match self {
            PriceField::NewPrice => "قیمت نو",
            PriceField::UsedPrice => "قیمت کارکرده",
            PriceField::RepairCost => "هزینه تعمیر",
        }
    }
}

impl std::str::FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newPrice" | "new-price" | "new" => Ok(PriceField::NewPrice),
            "usedPrice" | "used-price" | "used" => Ok(PriceField::UsedPrice),
            "repairCost" | "repair-cost" | "repair" => Ok(PriceField::RepairCost),
            _ => Err(format!("Unknown field: {}. Use new-price, used-price, or repair-cost", s)),
        }
    }
}

/// アプリケーション画面
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Welcome,
    Loading,
    Results,
    Error,
}

/// アップロード用の画像データ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
