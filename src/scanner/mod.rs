//! 損傷写真の読み込み
//!
//! 指定されたファイル・フォルダ（直下のみ）から画像を集め、
//! 大きい画像は max_image_size に縮小してからアップロード用データにする

use crate::error::{EstimatorError, Result};
use damage_estimator_common::ImageBlob;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 拡張子からMIMEタイプを判定
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_string_lossy().to_lowercase().as_str()))
        .unwrap_or(false)
}

/// 画像ファイルのパスを収集
///
/// ファイル指定はそのまま、フォルダ指定は直下の画像をファイル名順で追加
pub fn collect_image_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if !input.exists() {
            return Err(EstimatorError::FileNotFound(input.display().to_string()));
        }

        if input.is_file() {
            if !is_image_file(input) {
                return Err(EstimatorError::ImageLoad(format!(
                    "対応していない形式です: {}",
                    input.display()
                )));
            }
            paths.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .max_depth(1)  // 直下のみ（再帰しない）
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_image_file(p))
            .collect();
        found.sort();
        paths.extend(found);
    }

    Ok(paths)
}

/// 最大辺が max_size を超える場合は縮小してJPEGに再エンコード
fn downscale(data: Vec<u8>, mime_type: &str, max_size: u32) -> (Vec<u8>, String) {
    let img = match image::load_from_memory(&data) {
        Ok(img) => img,
        Err(e) => {
            warn!("画像をデコードできないため原本を送信します: {}", e);
            return (data, mime_type.to_string());
        }
    };

    if max_size == 0 || (img.width() <= max_size && img.height() <= max_size) {
        return (data, mime_type.to_string());
    }

    let resized = img.resize(max_size, max_size, FilterType::Triangle);
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut buffer = Vec::new();
    match rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg) {
        Ok(()) => {
            debug!("画像を縮小: {}x{} → {}x{}", img.width(), img.height(), rgb.width(), rgb.height());
            (buffer, "image/jpeg".to_string())
        }
        Err(e) => {
            warn!("縮小画像のエンコードに失敗したため原本を送信します: {}", e);
            (data, mime_type.to_string())
        }
    }
}

/// 1枚読み込み
pub fn load_image(path: &Path, max_size: u32) -> Result<ImageBlob> {
    let mime_type = mime_type_for(path).ok_or_else(|| {
        EstimatorError::ImageLoad(format!("対応していない形式です: {}", path.display()))
    })?;

    let data = std::fs::read(path)
        .map_err(|e| EstimatorError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let (data, mime_type) = downscale(data, mime_type, max_size);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ImageBlob {
        file_name,
        mime_type,
        data,
    })
}

/// ファイル・フォルダ指定から画像を読み込み
pub fn load_images(inputs: &[PathBuf], max_size: u32) -> Result<Vec<ImageBlob>> {
    collect_image_paths(inputs)?
        .iter()
        .map(|path| load_image(path, max_size))
        .collect()
}
