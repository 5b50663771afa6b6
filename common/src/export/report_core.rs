//! 見積りレポートのコア処理
//!
//! 印刷用レポート（HTML）とExcel出力で共有する:
//! - Report: タイトル・日付・明細行・集計
//! - JalaliDate: レポート日付（イラン暦）
//! - render_html: 印刷用HTML（RTL）

use crate::pricing::{format_toman, summarize, CostSummary};
use crate::types::{Part, PartSelection};

/// デフォルトのレポートタイトル
pub const DEFAULT_REPORT_TITLE: &str = "گزارش تخمین هزینه تعمیرات خودرو";

/// 明細が空の場合の表示
pub const EMPTY_REPORT_MESSAGE: &str = "هیچ قطعه‌ای برای نمایش وجود ندارد.";

/// 表の列見出し
pub const REPORT_COLUMNS: [&str; 5] = [
    "نام قطعه",
    "قیمت نو",
    "قیمت کارکرده",
    "هزینه تعمیر/دستمزد",
    "انتخاب شده",
];

/// 集計欄のラベル
pub const SUMMARY_TITLE: &str = "خلاصه هزینه کل";
pub const TOTAL_PARTS_LABEL: &str = "هزینه کل قطعات";
pub const TOTAL_LABOR_LABEL: &str = "هزینه کل دستمزد";
pub const GRAND_TOTAL_LABEL: &str = "جمع کل هزینه‌ها";

/// イラン暦（ヒジュラ太陽暦）の日付
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// グレゴリオ暦から変換
    pub fn from_gregorian(gy: i64, gm: u32, gd: u32) -> Self {
        const G_D_M: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

        let month_index = (gm.clamp(1, 12) - 1) as usize;
        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
            + gd as i64
            + G_D_M[month_index];

        let mut jy = -1595 + 33 * (days / 12_053);
        days %= 12_053;
        jy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            jy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: jy,
            month: month as u32,
            day: day as u32,
        }
    }

    /// ペルシア数字で表示（例: ۱۴۰۳/۱/۱）
    pub fn to_persian_string(&self) -> String {
        format!(
            "{}/{}/{}",
            to_persian_digits(&self.year.to_string()),
            to_persian_digits(&self.month.to_string()),
            to_persian_digits(&self.day.to_string()),
        )
    }
}

fn to_persian_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32('۰' as u32 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// レポート明細行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub new_price: u64,
    pub used_price: u64,
    pub repair_cost: u64,
    pub selection: PartSelection,
}

impl ReportRow {
    /// 選択欄の表示（修理は「-」）
    pub fn selection_text(&self) -> &'static str {
        match self.selection {
            PartSelection::New | PartSelection::Used => self.selection.label(),
            PartSelection::Repair => "-",
        }
    }
}

/// 印刷用レポート
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub date: JalaliDate,
    pub rows: Vec<ReportRow>,
    pub summary: CostSummary,
}

/// 部品リストからレポートを構築
pub fn build_report(parts: &[Part], title: &str, date: JalaliDate) -> Report {
    let rows = parts
        .iter()
        .map(|p| ReportRow {
            name: p.name.clone(),
            new_price: p.new_price,
            used_price: p.used_price,
            repair_cost: p.repair_cost,
            selection: p.selection,
        })
        .collect();

    Report {
        title: title.to_string(),
        date,
        rows,
        summary: summarize(parts),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 印刷用HTMLを生成
pub fn render_html(report: &Report) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"fa\" dir=\"rtl\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&report.title)));
    html.push_str(
        "<style>\n\
         body { font-family: Vazirmatn, Tahoma, sans-serif; padding: 2rem; color: #1f2937; }\n\
         header { text-align: center; margin-bottom: 2rem; }\n\
         table { width: 100%; border-collapse: collapse; text-align: right; font-size: 0.9rem; }\n\
         th { background: #f3f4f6; border-bottom: 2px solid #d1d5db; padding: 0.75rem; }\n\
         td { border-bottom: 1px solid #e5e7eb; padding: 0.75rem; }\n\
         td.selection { text-align: center; }\n\
         td.empty { text-align: center; color: #6b7280; padding: 2rem; }\n\
         .summary { max-width: 20rem; margin-right: auto; margin-top: 2rem; }\n\
         .summary div { display: flex; justify-content: space-between; padding: 0.25rem 0; }\n\
         .grand { font-weight: bold; border-top: 1px solid #e5e7eb; }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!(
        "<header>\n<h1>{}</h1>\n<p>تاریخ گزارش: {}</p>\n</header>\n",
        escape_html(&report.title),
        report.date.to_persian_string()
    ));

    html.push_str("<main>\n<table>\n<thead>\n<tr>");
    for column in REPORT_COLUMNS {
        html.push_str(&format!("<th>{}</th>", column));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    if report.rows.is_empty() {
        html.push_str(&format!(
            "<tr><td colspan=\"{}\" class=\"empty\">{}</td></tr>\n",
            REPORT_COLUMNS.len(),
            EMPTY_REPORT_MESSAGE
        ));
    }
    for row in &report.rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"selection\">{}</td></tr>\n",
            escape_html(&row.name),
            format_toman(row.new_price),
            format_toman(row.used_price),
            format_toman(row.repair_cost),
            row.selection_text()
        ));
    }
    html.push_str("</tbody>\n</table>\n</main>\n");

    let s = &report.summary;
    html.push_str(&format!("<footer class=\"summary\">\n<h3>{}</h3>\n", SUMMARY_TITLE));
    html.push_str(&format!(
        "<div><span>{}:</span><span>{}</span></div>\n",
        TOTAL_PARTS_LABEL,
        format_toman(s.total_parts_cost)
    ));
    html.push_str(&format!(
        "<div><span>{}:</span><span>{}</span></div>\n",
        TOTAL_LABOR_LABEL,
        format_toman(s.total_labor_cost)
    ));
    html.push_str(&format!(
        "<div class=\"grand\"><span>{}:</span><span>{}</span></div>\n",
        GRAND_TOTAL_LABEL,
        format_toman(s.grand_total)
    ));
    html.push_str("</footer>\n</body>\n</html>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parts() -> Vec<Part> {
        vec![
            Part {
                name: "سپر جلو".to_string(),
                new_price: 4_000_000,
                used_price: 2_000_000,
                repair_cost: 500_000,
                source_url: String::new(),
                selection: PartSelection::New,
            },
            Part {
                name: "<گلگیر>".to_string(),
                new_price: 3_000_000,
                used_price: 1_000_000,
                repair_cost: 300_000,
                source_url: String::new(),
                selection: PartSelection::Repair,
            },
        ]
    }

    #[test]
    fn test_jalali_nowruz_1403() {
        let date = JalaliDate::from_gregorian(2024, 3, 20);
        assert_eq!(date, JalaliDate { year: 1403, month: 1, day: 1 });
    }

    #[test]
    fn test_jalali_last_day_of_1402() {
        let date = JalaliDate::from_gregorian(2024, 3, 19);
        assert_eq!(date, JalaliDate { year: 1402, month: 12, day: 29 });
    }

    #[test]
    fn test_jalali_nowruz_1404() {
        let date = JalaliDate::from_gregorian(2025, 3, 21);
        assert_eq!(date, JalaliDate { year: 1404, month: 1, day: 1 });
    }

    #[test]
    fn test_jalali_persian_string() {
        let date = JalaliDate { year: 1403, month: 1, day: 1 };
        assert_eq!(date.to_persian_string(), "۱۴۰۳/۱/۱");
    }

    #[test]
    fn test_build_report_summary() {
        let report = build_report(&sample_parts(), DEFAULT_REPORT_TITLE, JalaliDate::from_gregorian(2024, 3, 20));
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.summary.total_parts_cost, 4_000_000);
        assert_eq!(report.summary.total_labor_cost, 500_000);
        assert_eq!(report.summary.grand_total, 4_500_000);
    }

    #[test]
    fn test_selection_text() {
        let report = build_report(&sample_parts(), "t", JalaliDate::from_gregorian(2024, 3, 20));
        assert_eq!(report.rows[0].selection_text(), "نو");
        assert_eq!(report.rows[1].selection_text(), "-");
    }

    #[test]
    fn test_render_html() {
        let report = build_report(&sample_parts(), DEFAULT_REPORT_TITLE, JalaliDate::from_gregorian(2024, 3, 20));
        let html = render_html(&report);

        assert!(html.contains("dir=\"rtl\""));
        assert!(html.contains(DEFAULT_REPORT_TITLE));
        assert!(html.contains("تاریخ گزارش: ۱۴۰۳/۱/۱"));
        assert!(html.contains("&lt;گلگیر&gt;"));
        assert!(html.contains("۴٬۵۰۰٬۰۰۰ تومان"));
        assert!(!html.contains(EMPTY_REPORT_MESSAGE));
    }

    #[test]
    fn test_render_html_empty() {
        let report = build_report(&[], DEFAULT_REPORT_TITLE, JalaliDate::from_gregorian(2024, 3, 20));
        let html = render_html(&report);

        assert!(html.contains(EMPTY_REPORT_MESSAGE));
        assert!(html.contains("colspan=\"5\""));
    }
}
