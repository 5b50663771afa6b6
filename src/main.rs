use anyhow::Context;
use car_damage_estimator::{analyzer, app, cli, config, export, screens, state, store};
use clap::Parser;
use cli::{to_index, Cli, Commands};
use config::Config;
use damage_estimator_common::Screen;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    let command = cli.command.unwrap_or(Commands::Interactive);

    if let Commands::Config { set_api_key, set_model, show } = &command {
        return run_config(&mut config, set_api_key.clone(), set_model.clone(), *show);
    }

    // APIを使わないコマンドはキーなしでも動かす
    let api_key = if command.needs_api() {
        config.get_api_key()?
    } else {
        config.get_api_key().unwrap_or_default()
    };
    let service = analyzer::GeminiClient::new(api_key, config.model.clone());

    let store_path = match cli.store {
        Some(path) => path,
        None => config.resolved_store_path()?,
    };
    tracing::debug!("保存先: {}", store_path.display());
    let store = store::FileStore::new(store_path);

    let mut estimator = state::Estimator::new(service, store);

    match command {
        Commands::Interactive => {
            let options = app::InteractiveOptions {
                max_image_size: config.max_image_size,
                export_dir: PathBuf::from("."),
            };
            app::run_interactive(&mut estimator, &options).await?;
        }

        Commands::Estimate { model, images, parts, parts_file, use_images, use_manual_list } => {
            println!("🚗 damage-estimator - 見積り作成\n");

            let request = app::EstimateInput {
                vehicle_model: model,
                images,
                parts,
                parts_file,
                use_images,
                use_manual_list,
            }
            .into_request(config.max_image_size);
            if request.use_images {
                println!("✔ {}枚の写真を読み込み", request.images.len());
            }

            let spinner = screens::loading_spinner();
            let outcome = estimator.start_analysis(request).await;
            spinner.finish_and_clear();

            let screen = outcome?;
            print_screen(&estimator);
            if screen == Screen::Error {
                std::process::exit(1);
            }
        }

        Commands::Show => {
            estimator.go_to_results();
            print_screen(&estimator);
        }

        Commands::Add { name } => {
            estimator.go_to_results();
            let spinner = screens::loading_spinner();
            let outcome = estimator.add_manual_part(&name).await;
            spinner.finish_and_clear();

            outcome?;
            print_screen(&estimator);
        }

        Commands::Select { index, selection } => {
            if !estimator.set_part_selection(to_index(index), selection) {
                println!("⚠ 部品番号が範囲外です: {}", index);
            }
            print_screen(&estimator);
        }

        Commands::Edit { index, field, value } => {
            let current = estimator
                .parts()
                .get(to_index(index))
                .map(|part| part.price(field));
            match current {
                None => println!("⚠ 部品番号が範囲外です: {}", index),
                Some(current) => match screens::parse_price_edit(&value, current) {
                    Some(value) => {
                        estimator.update_part_field(to_index(index), field, value);
                    }
                    None => println!("変更はありません"),
                },
            }
            print_screen(&estimator);
        }

        Commands::Delete { index } => {
            match estimator.delete_part(to_index(index)) {
                Some(part) => println!("✔ 削除しました: {}", part.name),
                None => println!("⚠ 部品番号が範囲外です: {}", index),
            }
            print_screen(&estimator);
        }

        Commands::Export { format, output, title } => {
            println!("📄 damage-estimator - エクスポート\n");

            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            let written = export::export_report(estimator.parts(), &format, &output_dir, &title)?;
            for path in written {
                println!("✔ 出力: {}", path.display());
            }

            println!("\n✅ エクスポート完了");
        }

        Commands::Reset => {
            estimator.reset();
            println!("✔ 見積りを破棄しました");
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn run_config(
    config: &mut Config,
    set_api_key: Option<String>,
    set_model: Option<String>,
    show: bool,
) -> anyhow::Result<()> {
    if let Some(key) = set_api_key {
        config.set_api_key(key)?;
        println!("✔ APIキーを設定しました");
    }

    if let Some(model) = set_model {
        config.model = model;
        config.save()?;
        println!("✔ モデルを設定しました: {}", config.model);
    }

    if show {
        println!("設定:");
        println!("  モデル: {}", config.model);
        println!("  最大画像サイズ: {}px", config.max_image_size);
        println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
        println!("  保存先: {}", config.resolved_store_path()?.display());
    }

    Ok(())
}

fn print_screen<S, T>(estimator: &state::Estimator<S, T>)
where
    S: analyzer::EstimationService,
    T: store::Store,
{
    println!(
        "{}",
        screens::render(
            estimator.screen(),
            estimator.parts(),
            &estimator.summary(),
            estimator.error(),
        )
    );
}
