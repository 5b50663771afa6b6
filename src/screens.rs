//! 端末用の画面表示
//!
//! Welcome / Loading / Results / Error の4画面を文字列として描画する。
//! 入力の受け付けは app.rs が担当する。

use damage_estimator_common::{format_toman, CostSummary, Part, PriceField, Screen};
use damage_estimator_common::export::report_core::{
    GRAND_TOTAL_LABEL, SUMMARY_TITLE, TOTAL_LABOR_LABEL, TOTAL_PARTS_LABEL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const APP_TITLE: &str = "تخمین هزینه تعمیر خودرو";
pub const RESULTS_TITLE: &str = "نتایج تخمین هزینه";
pub const LOADING_MESSAGE: &str = "در حال تحلیل...";
pub const LOADING_HINT: &str = "این فرآیند ممکن است کمی طول بکشد";
pub const ERROR_TITLE: &str = "خطا";
pub const NO_PARTS_MESSAGE: &str = "هیچ قطعه آسیب‌دیده‌ای شناسایی نشد.";
pub const NO_PARTS_HINT: &str = "می‌توانید قطعات را به صورت دستی اضافه کنید.";

const RULE: &str = "----------------------------------------";

/// 入力フォーム画面
pub fn render_welcome(has_results: bool) -> String {
    let mut out = format!("{}\n{}\n", APP_TITLE, RULE);
    out.push_str("مدل خودرو را وارد کنید و منبع تحلیل (تصویر و/یا لیست دستی) را انتخاب کنید.\n");
    if has_results {
        out.push_str("نتایج قبلی موجود است.\n");
    }
    out
}

/// 解析中スピナー
pub fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("{} ({})", LOADING_MESSAGE, LOADING_HINT));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// 部品1件の表示
pub fn render_part(index: usize, part: &Part) -> String {
    let mut out = format!("{}. {}\n", index + 1, part.name);
    for field in PriceField::ALL {
        out.push_str(&format!("   {}: {}\n", field.label(), format_toman(part.price(field))));
    }
    out.push_str(&format!("   انتخاب برای محاسبه: {}\n", part.selection.label()));
    if !part.source_url.is_empty() {
        out.push_str(&format!("   {}\n", part.source_url));
    }
    out
}

/// 集計欄
pub fn render_summary(summary: &CostSummary) -> String {
    format!(
        "{}\n{}\n{}: {}\n{}: {}\n{}: {}\n",
        SUMMARY_TITLE,
        RULE,
        TOTAL_PARTS_LABEL,
        format_toman(summary.total_parts_cost),
        TOTAL_LABOR_LABEL,
        format_toman(summary.total_labor_cost),
        GRAND_TOTAL_LABEL,
        format_toman(summary.grand_total),
    )
}

/// 結果画面
pub fn render_results(parts: &[Part], summary: &CostSummary) -> String {
    let mut out = format!("{}\n{}\n", RESULTS_TITLE, RULE);
    if parts.is_empty() {
        out.push_str(&format!("{}\n{}\n", NO_PARTS_MESSAGE, NO_PARTS_HINT));
    }
    for (i, part) in parts.iter().enumerate() {
        out.push_str(&render_part(i, part));
    }
    out.push('\n');
    out.push_str(&render_summary(summary));
    out
}

/// エラー画面
pub fn render_error(message: Option<&str>) -> String {
    format!("{}\n{}\n{}\n", ERROR_TITLE, RULE, message.unwrap_or_default())
}

/// 現在の画面を描画
pub fn render(screen: Screen, parts: &[Part], summary: &CostSummary, error: Option<&str>) -> String {
    match screen {
        Screen::Welcome => render_welcome(!parts.is_empty()),
        Screen::Loading => format!("{}\n{}\n", LOADING_MESSAGE, LOADING_HINT),
        Screen::Results => render_results(parts, summary),
        Screen::Error => render_error(error),
    }
}

/// 価格編集の入力値を解釈
///
/// ペルシア数字・桁区切りを受け付ける。数値でない場合と
/// 現在値と同じ場合は None（変更しない）。
pub fn parse_price_edit(input: &str, current: u64) -> Option<u64> {
    let normalized: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '٬' | '_' | ' '))
        .map(|c| match c {
            '۰'..='۹' => char::from_u32(c as u32 - '۰' as u32 + '0' as u32).unwrap_or(c),
            '٠'..='٩' => char::from_u32(c as u32 - '٠' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect();

    let value: u64 = normalized.parse().ok()?;
    (value != current).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use damage_estimator_common::{summarize, PartSelection};

    fn part() -> Part {
        Part {
            name: "سپر جلو".to_string(),
            new_price: 1_000,
            used_price: 500,
            repair_cost: 200,
            source_url: "https://example.ir/bumper".to_string(),
            selection: PartSelection::Used,
        }
    }

    #[test]
    fn test_parse_price_edit() {
        assert_eq!(parse_price_edit("1500", 1000), Some(1500));
        assert_eq!(parse_price_edit(" 1,500,000 ", 0), Some(1_500_000));
        assert_eq!(parse_price_edit("۲٬۵۰۰", 0), Some(2500));
        assert_eq!(parse_price_edit("٣٠٠", 0), Some(300));
    }

    #[test]
    fn test_parse_price_edit_rejects() {
        assert_eq!(parse_price_edit("abc", 10), None);
        assert_eq!(parse_price_edit("", 10), None);
        assert_eq!(parse_price_edit("-5", 10), None);
        assert_eq!(parse_price_edit("10", 10), None);
    }

    #[test]
    fn test_render_results_empty() {
        let out = render_results(&[], &CostSummary::default());
        assert!(out.contains(NO_PARTS_MESSAGE));
        assert!(out.contains("۰ تومان"));
    }

    #[test]
    fn test_render_results_with_part() {
        let parts = vec![part()];
        let out = render_results(&parts, &summarize(&parts));
        assert!(out.contains("1. سپر جلو"));
        assert!(out.contains("قیمت کارکرده: ۵۰۰ تومان"));
        assert!(out.contains("انتخاب برای محاسبه: کارکرده"));
        assert!(out.contains("https://example.ir/bumper"));
        assert!(out.contains("جمع کل هزینه‌ها: ۷۰۰ تومان"));
        assert!(!out.contains(NO_PARTS_MESSAGE));
    }

    #[test]
    fn test_render_error() {
        let out = render(Screen::Error, &[], &CostSummary::default(), Some("پیام"));
        assert!(out.starts_with(ERROR_TITLE));
        assert!(out.contains("پیام"));
    }

    #[test]
    fn test_render_welcome_mentions_previous_results() {
        assert!(render_welcome(true).contains("نتایج قبلی"));
        assert!(!render_welcome(false).contains("نتایج قبلی"));
    }
}
