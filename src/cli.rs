use clap::{Parser, Subcommand};
use damage_estimator_common::{PartSelection, PriceField, DEFAULT_REPORT_TITLE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "damage-estimator")]
#[command(about = "車両損傷AI見積り・修理費レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 部品リストの保存ファイル（省略時は設定値またはデータディレクトリ）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話モード（入力フォーム → 解析 → 結果編集）
    Interactive,

    /// 写真・部品リストから見積りを作成
    Estimate {
        /// 車種（例: پژو ۲۰۶）
        #[arg(short, long)]
        model: String,

        /// 損傷写真（ファイルまたはフォルダ、複数可）
        #[arg(short, long, num_args = 1..)]
        images: Vec<PathBuf>,

        /// 部品名（複数指定可）
        #[arg(short, long = "part")]
        parts: Vec<String>,

        /// 部品リストファイル（1行1部品）
        #[arg(long)]
        parts_file: Option<PathBuf>,

        /// 画像解析を有効化（省略時は --images 指定の有無で判定）
        #[arg(long)]
        use_images: bool,

        /// 部品リストを有効化（省略時は --part / --parts-file 指定の有無で判定）
        #[arg(long)]
        use_manual_list: bool,
    },

    /// 保存済みの見積りを表示
    Show,

    /// 部品を手動で追加
    Add {
        /// 部品名
        #[arg(required = true)]
        name: String,
    },

    /// 部品の扱いを変更 (new/used/repair)
    Select {
        /// 部品番号（1始まり）
        index: usize,

        /// new / used / repair
        selection: PartSelection,
    },

    /// 部品の価格を変更
    Edit {
        /// 部品番号（1始まり）
        index: usize,

        /// new-price / used-price / repair-cost
        field: PriceField,

        /// 新しい金額（トマン）
        value: String,
    },

    /// 部品を削除
    Delete {
        /// 部品番号（1始まり）
        index: usize,
    },

    /// 見積りレポートを出力
    Export {
        /// 出力形式 (html/excel/both)
        #[arg(short, long, default_value = "html")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// レポートタイトル
        #[arg(short, long, default_value = DEFAULT_REPORT_TITLE)]
        title: String,
    },

    /// 見積りを破棄して最初からやり直す
    Reset,

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 使用するGeminiモデル
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Commands {
    /// Gemini API を呼び出すコマンドか
    pub fn needs_api(&self) -> bool {
        matches!(
            self,
            Commands::Interactive | Commands::Estimate { .. } | Commands::Add { .. }
        )
    }
}

/// 1始まりの部品番号を0始まりに変換（0は範囲外扱い）
pub fn to_index(display_index: usize) -> usize {
    display_index.checked_sub(1).unwrap_or(usize::MAX)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Html,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "print" => Ok(ExportFormat::Html),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use html, excel, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("both".parse::<ExportFormat>().unwrap(), ExportFormat::Both);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1), 0);
        assert_eq!(to_index(3), 2);
        assert_eq!(to_index(0), usize::MAX);
    }

    #[test]
    fn test_parse_estimate_command() {
        let cli = Cli::try_parse_from([
            "damage-estimator",
            "estimate",
            "--model",
            "پراید",
            "--part",
            "سپر جلو",
            "--part",
            "گلگیر",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Estimate { model, parts, images, .. }) => {
                assert_eq!(model, "پراید");
                assert_eq!(parts, vec!["سپر جلو".to_string(), "گلگیر".to_string()]);
                assert!(images.is_empty());
            }
            _ => panic!("Expected Estimate command"),
        }
    }

    #[test]
    fn test_needs_api() {
        assert!(Commands::Interactive.needs_api());
        assert!(Commands::Add { name: "x".into() }.needs_api());
        assert!(!Commands::Show.needs_api());
        assert!(!Commands::Reset.needs_api());
    }

    #[test]
    fn test_parse_select_command() {
        let cli = Cli::try_parse_from(["damage-estimator", "select", "2", "used"]).unwrap();
        match cli.command {
            Some(Commands::Select { index, selection }) => {
                assert_eq!(index, 2);
                assert_eq!(selection, PartSelection::Used);
            }
            _ => panic!("Expected Select command"),
        }
    }
}
