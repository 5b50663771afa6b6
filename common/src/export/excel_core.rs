//! Excel生成（共通ライブラリ）
//!
//! report_core の Report を1シートの見積り表として出力する

use super::report_core::{
    Report, EMPTY_REPORT_MESSAGE, GRAND_TOTAL_LABEL, REPORT_COLUMNS, SUMMARY_TITLE,
    TOTAL_LABOR_LABEL, TOTAL_PARTS_LABEL,
};
use rust_xlsxwriter::*;

const SHEET_NAME: &str = "برآورد";
const NAME_COL_WIDTH: f64 = 28.0;
const AMOUNT_COL_WIDTH: f64 = 18.0;
const SELECTION_COL_WIDTH: f64 = 12.0;

/// Excelをバッファに生成
pub fn generate_excel_buffer(report: &Report) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let title_format = Format::new()
        .set_bold()
        .set_font_size(16.0)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF3F4F6))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xD1D5DB));

    let text_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xE5E7EB));

    let amount_format = Format::new()
        .set_num_format("#,##0")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xE5E7EB));

    let center_format = Format::new()
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xE5E7EB));

    let summary_label_format = Format::new().set_bold();
    let summary_amount_format = Format::new().set_bold().set_num_format("#,##0");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    worksheet.set_right_to_left(true);

    // 列幅設定
    worksheet.set_column_width(0, NAME_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    for col in 1..=3u16 {
        worksheet.set_column_width(col, AMOUNT_COL_WIDTH)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }
    worksheet.set_column_width(4, SELECTION_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    // タイトル・日付
    let last_col = (REPORT_COLUMNS.len() - 1) as u16;
    worksheet.merge_range(0, 0, 0, last_col, &report.title, &title_format)
        .map_err(|e| format!("タイトル書き込みエラー: {}", e))?;
    worksheet.write_string(1, 0, format!("تاریخ گزارش: {}", report.date.to_persian_string()))
        .map_err(|e| format!("日付書き込みエラー: {}", e))?;

    // 見出し
    let header_row: u32 = 3;
    for (col, label) in REPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(header_row, col as u16, *label, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    // 明細
    let mut row = header_row + 1;
    if report.rows.is_empty() {
        worksheet.merge_range(row, 0, row, last_col, EMPTY_REPORT_MESSAGE, &center_format)
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        row += 1;
    }
    for item in &report.rows {
        worksheet.write_string_with_format(row, 0, &item.name, &text_format)
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(row, 1, item.new_price as f64, &amount_format)
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(row, 2, item.used_price as f64, &amount_format)
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(row, 3, item.repair_cost as f64, &amount_format)
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        worksheet.write_string_with_format(row, 4, item.selection_text(), &center_format)
            .map_err(|e| format!("明細書き込みエラー: {}", e))?;
        row += 1;
    }

    // 集計
    let summary_row = row + 1;
    let totals = [
        (TOTAL_PARTS_LABEL, report.summary.total_parts_cost),
        (TOTAL_LABOR_LABEL, report.summary.total_labor_cost),
        (GRAND_TOTAL_LABEL, report.summary.grand_total),
    ];
    worksheet.write_string_with_format(summary_row, 0, SUMMARY_TITLE, &summary_label_format)
        .map_err(|e| format!("集計書き込みエラー: {}", e))?;
    for (offset, (label, amount)) in totals.iter().enumerate() {
        let r = summary_row + 1 + offset as u32;
        worksheet.write_string_with_format(r, 0, *label, &summary_label_format)
            .map_err(|e| format!("集計書き込みエラー: {}", e))?;
        worksheet.write_number_with_format(r, 1, *amount as f64, &summary_amount_format)
            .map_err(|e| format!("集計書き込みエラー: {}", e))?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
