use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`damage-estimator config --set-api-key YOUR_KEY` で設定するか、GEMINI_API_KEY を指定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("処理中の操作があります: {0}")]
    Busy(&'static str),

    #[error(transparent)]
    Common(#[from] damage_estimator_common::Error),
}

impl From<reqwest::Error> for EstimatorError {
    fn from(err: reqwest::Error) -> Self {
        // URLは表示しない
        EstimatorError::ApiCall(err.without_url().to_string())
    }
}

impl From<dialoguer::Error> for EstimatorError {
    fn from(err: dialoguer::Error) -> Self {
        EstimatorError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
