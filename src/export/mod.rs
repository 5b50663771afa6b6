pub mod html;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use chrono::Datelike;
use damage_estimator_common::{build_report, JalaliDate, Part, Report};
use std::path::{Path, PathBuf};

fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", title, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, title: &str) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let html_path = output.join(format!("{}.html", title));
        let excel_path = output.join(format!("{}.xlsx", title));
        (html_path, excel_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(title);
        let html_path = parent.join(format!("{}.html", stem));
        let excel_path = parent.join(format!("{}.xlsx", stem));
        (html_path, excel_path)
    }
}

/// 本日の日付（イラン暦）でレポートを構築
pub fn report_for_today(parts: &[Part], title: &str) -> Report {
    let today = chrono::Local::now().date_naive();
    let date = JalaliDate::from_gregorian(today.year() as i64, today.month(), today.day());
    build_report(parts, title, date)
}

/// レポートを出力し、作成したファイルを返す
pub fn export_report(
    parts: &[Part],
    format: &ExportFormat,
    output: &Path,
    title: &str,
) -> Result<Vec<PathBuf>> {
    let report = report_for_today(parts, title);

    let written = match format {
        ExportFormat::Html => {
            let output_path = output_path_for_format(output, title, "html");
            html::write_html(&report, &output_path)?;
            vec![output_path]
        }
        ExportFormat::Excel => {
            let output_path = output_path_for_format(output, title, "xlsx");
            excel::write_excel(&report, &output_path)?;
            vec![output_path]
        }
        ExportFormat::Both => {
            let (html_path, excel_path) = output_paths_for_both(output, title);
            html::write_html(&report, &html_path)?;
            excel::write_excel(&report, &excel_path)?;
            vec![html_path, excel_path]
        }
    };

    Ok(written)
}
