//! 印刷用HTMLレポート出力

use crate::error::Result;
use damage_estimator_common::{render_html, Report};
use std::path::Path;
use tracing::debug;

pub fn write_html(report: &Report, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let html = render_html(report);
    std::fs::write(output_path, html)?;
    debug!("HTML出力: {} ({}行)", output_path.display(), report.rows.len());
    Ok(())
}
