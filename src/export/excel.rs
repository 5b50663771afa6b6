//! Excel出力（CLI版）
//!
//! 共通ライブラリの excel_core でバッファを生成してファイルに書き出す

use crate::error::{EstimatorError, Result};
use damage_estimator_common::export::excel_core::generate_excel_buffer;
use damage_estimator_common::Report;
use std::path::Path;

pub fn write_excel(report: &Report, output_path: &Path) -> Result<()> {
    let buffer = generate_excel_buffer(report).map_err(EstimatorError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(output_path, buffer)
        .map_err(|e| EstimatorError::ExcelGeneration(format!("Excel保存エラー: {}", e)))?;
    Ok(())
}
