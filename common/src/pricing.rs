//! 費用集計
//!
//! 部品リストと各部品の選択状態から合計金額を計算する。
//! 修理（Repair）を選択した部品は部品代・工賃のどちらにも加算しない。

use crate::types::{Part, PartSelection};

/// 集計結果（トマン単位）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostSummary {
    pub total_parts_cost: u64,
    pub total_labor_cost: u64,
    pub grand_total: u64,
}

/// 部品リストを集計
pub fn summarize(parts: &[Part]) -> CostSummary {
    let total_parts_cost = parts.iter().fold(0u64, |sum, part| match part.selection {
        PartSelection::New => sum.saturating_add(part.new_price),
        PartSelection::Used => sum.saturating_add(part.used_price),
        PartSelection::Repair => sum,
    });

    // 交換する部品のみ工賃を加算
    let total_labor_cost = parts
        .iter()
        .filter(|part| matches!(part.selection, PartSelection::New | PartSelection::Used))
        .fold(0u64, |sum, part| sum.saturating_add(part.repair_cost));

    CostSummary {
        total_parts_cost,
        total_labor_cost,
        grand_total: total_parts_cost.saturating_add(total_labor_cost),
    }
}

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const THOUSANDS_SEPARATOR: char = '٬';

/// 数値をペルシア数字＋桁区切りで表示
pub fn format_persian_number(amount: u64) -> String {
    let digits = amount.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len * 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        let d = c.to_digit(10).unwrap_or(0) as usize;
        out.push(PERSIAN_DIGITS[d]);
    }

    out
}

/// 金額表示（例: "۱٬۵۰۰٬۰۰۰ تومان"）
pub fn format_toman(amount: u64) -> String {
    format!("{} تومان", format_persian_number(amount))
}
