//! 対話モード
//!
//! 現在の画面を描画し、dialoguerで受け付けた操作を Estimator に渡す

use crate::analyzer::EstimationService;
use crate::cli::ExportFormat;
use crate::error::Result;
use crate::export;
use crate::scanner;
use crate::screens::{self, loading_spinner};
use crate::state::Estimator;
use crate::store::Store;
use damage_estimator_common::{
    AnalysisRequest, ImageBlob, PartSelection, PriceField, Screen, DEFAULT_REPORT_TITLE,
};
use dialoguer::{Confirm, Input, Select};
use std::path::PathBuf;
use tracing::warn;

/// 対話ループ設定
pub struct InteractiveOptions {
    pub max_image_size: u32,
    pub export_dir: PathBuf,
}

enum Flow {
    Continue,
    Quit,
}

pub async fn run_interactive<S, T>(estimator: &mut Estimator<S, T>, options: &InteractiveOptions) -> Result<()>
where
    S: EstimationService,
    T: Store,
{
    loop {
        let flow = match estimator.screen() {
            Screen::Welcome => welcome_screen(estimator, options).await?,
            Screen::Results => results_screen(estimator, options).await?,
            Screen::Error => error_screen(estimator)?,
            // 中断された解析は最初からやり直す
            Screen::Loading => {
                estimator.reset();
                Flow::Continue
            }
        };

        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

async fn welcome_screen<S, T>(estimator: &mut Estimator<S, T>, options: &InteractiveOptions) -> Result<Flow>
where
    S: EstimationService,
    T: Store,
{
    println!("\n{}", screens::render_welcome(estimator.has_results()));

    let mut items = vec!["شروع تحلیل", "خروج"];
    if estimator.has_results() {
        items.insert(1, "مشاهده نتایج قبلی");
    }
    let choice = Select::new().items(&items).default(0).interact()?;
    match items[choice] {
        "مشاهده نتایج قبلی" => {
            estimator.go_to_results();
            return Ok(Flow::Continue);
        }
        "خروج" => return Ok(Flow::Quit),
        _ => {}
    }

    let request = prompt_request(options)?;

    let spinner = loading_spinner();
    let outcome = estimator.start_analysis(request).await;
    spinner.finish_and_clear();
    outcome?;

    Ok(Flow::Continue)
}

/// estimate コマンドの入力
pub struct EstimateInput {
    pub vehicle_model: String,
    pub images: Vec<PathBuf>,
    pub parts: Vec<String>,
    pub parts_file: Option<PathBuf>,
    pub use_images: bool,
    pub use_manual_list: bool,
}

impl EstimateInput {
    /// 解析リクエストを組み立てる
    ///
    /// 画像・部品リストファイルの読み込み失敗は警告のみ。
    /// 入力チェックは start_analysis 側の順序で行う。
    pub fn into_request(self, max_image_size: u32) -> AnalysisRequest {
        let mut lines = self.parts;
        if let Some(path) = &self.parts_file {
            match std::fs::read_to_string(path) {
                Ok(content) => lines.push(content),
                Err(e) => {
                    warn!("部品リストを読み込めません: {}: {}", path.display(), e);
                    println!("⚠ {}: {}", path.display(), e);
                }
            }
        }

        let use_images = self.use_images || !self.images.is_empty();
        let use_manual_list = self.use_manual_list || self.parts_file.is_some() || !lines.is_empty();

        let images = if use_images {
            load_images_or_warn(&self.images, max_image_size)
        } else {
            Vec::new()
        };

        AnalysisRequest {
            vehicle_model: self.vehicle_model,
            images,
            manual_parts: lines.join("\n"),
            use_images,
            use_manual_list,
        }
    }
}

fn load_images_or_warn(inputs: &[PathBuf], max_image_size: u32) -> Vec<ImageBlob> {
    match scanner::load_images(inputs, max_image_size) {
        Ok(loaded) => loaded,
        Err(e) => {
            warn!("画像を読み込めません: {}", e);
            println!("⚠ {}", e);
            Vec::new()
        }
    }
}

/// 入力フォーム
fn prompt_request(options: &InteractiveOptions) -> Result<AnalysisRequest> {
    let vehicle_model: String = Input::new()
        .with_prompt("مدل خودرو")
        .allow_empty(true)
        .interact_text()?;

    let use_images = Confirm::new()
        .with_prompt("تحلیل با تصویر؟")
        .default(true)
        .interact()?;

    let mut images = Vec::new();
    if use_images {
        let raw: String = Input::new()
            .with_prompt("مسیر تصاویر یا پوشه (با ; جدا کنید)")
            .allow_empty(true)
            .interact_text()?;
        let inputs: Vec<PathBuf> = raw
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        images = load_images_or_warn(&inputs, options.max_image_size);
    }

    let use_manual_list = Confirm::new()
        .with_prompt("استفاده از لیست دستی قطعات؟")
        .default(false)
        .interact()?;

    let mut lines = Vec::new();
    if use_manual_list {
        println!("نام قطعات را وارد کنید (هر خط یک قطعه، خط خالی برای پایان):");
        loop {
            let line: String = Input::new()
                .with_prompt(">")
                .allow_empty(true)
                .interact_text()?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
    }

    Ok(AnalysisRequest {
        vehicle_model,
        images,
        manual_parts: lines.join("\n"),
        use_images,
        use_manual_list,
    })
}

async fn results_screen<S, T>(estimator: &mut Estimator<S, T>, options: &InteractiveOptions) -> Result<Flow>
where
    S: EstimationService,
    T: Store,
{
    println!(
        "\n{}",
        screens::render_results(estimator.parts(), &estimator.summary())
    );

    let mut items: Vec<String> = estimator
        .parts()
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({})", i + 1, p.name, p.selection.label()))
        .collect();
    let part_count = items.len();
    let actions = [
        "افزودن قطعه دستی",
        "دریافت خروجی محاسبات",
        "شروع مجدد",
        "خروج",
    ];
    items.extend(actions.iter().map(|s| s.to_string()));

    let choice = Select::new()
        .with_prompt("انتخاب کنید")
        .items(&items)
        .default(0)
        .interact()?;

    if choice < part_count {
        edit_part(estimator, choice)?;
        return Ok(Flow::Continue);
    }

    match actions[choice - part_count] {
        "افزودن قطعه دستی" => {
            let name: String = Input::new()
                .with_prompt("نام قطعه (مثال: آینه بغل چپ)")
                .allow_empty(true)
                .interact_text()?;
            if !name.trim().is_empty() {
                // 失敗はログのみ（リストは変更されない）
                let spinner = loading_spinner();
                let added = estimator.add_manual_part(&name).await;
                spinner.finish_and_clear();
                added?;
            }
        }
        "دریافت خروجی محاسبات" => {
            let written = export::export_report(
                estimator.parts(),
                &ExportFormat::Both,
                &options.export_dir,
                DEFAULT_REPORT_TITLE,
            )?;
            for path in written {
                println!("✔ {}", path.display());
            }
        }
        "شروع مجدد" => estimator.reset(),
        _ => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// 部品1件の編集メニュー
fn edit_part<S, T>(estimator: &mut Estimator<S, T>, index: usize) -> Result<()>
where
    S: EstimationService,
    T: Store,
{
    let Some(part) = estimator.parts().get(index).cloned() else {
        return Ok(());
    };
    println!("\n{}", screens::render_part(index, &part));

    let mut items: Vec<String> = PartSelection::ALL
        .iter()
        .map(|s| format!("انتخاب: {}", s.label()))
        .collect();
    items.extend(PriceField::ALL.iter().map(|f| format!("ویرایش {}", f.label())));
    items.push("حذف قطعه".to_string());
    items.push("بازگشت".to_string());

    let choice = Select::new().items(&items).default(0).interact()?;
    let selections = PartSelection::ALL.len();
    let fields = PriceField::ALL.len();

    if choice < selections {
        estimator.set_part_selection(index, PartSelection::ALL[choice]);
    } else if choice < selections + fields {
        let field = PriceField::ALL[choice - selections];
        let current = part.price(field);
        let input: String = Input::new()
            .with_prompt(field.label())
            .with_initial_text(current.to_string())
            .allow_empty(true)
            .interact_text()?;
        if let Some(value) = screens::parse_price_edit(&input, current) {
            estimator.update_part_field(index, field, value);
        }
    } else if choice == selections + fields {
        estimator.delete_part(index);
    }

    Ok(())
}

fn error_screen<S, T>(estimator: &mut Estimator<S, T>) -> Result<Flow>
where
    S: EstimationService,
    T: Store,
{
    println!("\n{}", screens::render_error(estimator.error()));

    let items = ["شروع مجدد", "خروج"];
    let choice = Select::new().items(&items).default(0).interact()?;
    if choice == 0 {
        estimator.reset();
        Ok(Flow::Continue)
    } else {
        Ok(Flow::Quit)
    }
}
