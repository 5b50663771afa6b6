//! Gemini API連携
//!
//! - 損傷検出: 画像（inline_data）+ プロンプト → 部品名の文字列配列
//! - 価格見積り: 部品名リスト + 車種 → 価格レコード配列
//!
//! どちらも responseMimeType=application/json と responseSchema を指定し、
//! 返ってきたテキストは共通パーサーで検証する

use super::EstimationService;
use crate::error::{EstimatorError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use damage_estimator_common::prompts::{damage_response_schema, pricing_response_schema};
use damage_estimator_common::{
    build_damage_prompt, build_pricing_prompt, parse_detected_parts, parse_part_records, ImageBlob,
    PartRecord,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// APIキーはURLに載せずヘッダーで送る
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini APIクライアント
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_BASE_URL.to_string(),
        }
    }

    /// 接続先を差し替え（テスト・プロキシ用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gemini API呼び出し（共通処理）
    async fn call_gemini_api(&self, request: &GeminiRequest) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        debug!("Gemini API呼び出し: {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Gemini APIエラー: {} - {}", status, body);
            return Err(EstimatorError::ApiCall(format!("HTTP {}", status)));
        }

        let response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| EstimatorError::ApiParse(format!("レスポンス形式が不正: {}", e)))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| EstimatorError::ApiParse("空のレスポンス".into()))
    }
}

fn json_config(schema: serde_json::Value) -> GenerationConfig {
    GenerationConfig {
        response_mime_type: "application/json".to_string(),
        response_schema: schema,
    }
}

#[async_trait]
impl EstimationService for GeminiClient {
    async fn detect_damaged_parts(&self, images: &[ImageBlob], vehicle_model: &str) -> Result<Vec<String>> {
        if images.is_empty() {
            return Ok(vec![]);
        }

        let mut parts: Vec<Part> = images
            .iter()
            .map(|img| Part::InlineData {
                inline_data: InlineData {
                    mime_type: img.mime_type.clone(),
                    data: STANDARD.encode(&img.data),
                },
            })
            .collect();
        parts.push(Part::Text {
            text: build_damage_prompt(vehicle_model),
        });

        let request = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: json_config(damage_response_schema()),
        };

        info!("損傷検出: 画像{}枚 ({}, {})", images.len(), vehicle_model, self.model());
        let text = self.call_gemini_api(&request).await?;
        let names = parse_detected_parts(&text)?;
        info!("損傷検出: {}件", names.len());
        Ok(names)
    }

    async fn resolve_parts(&self, names: &[String], vehicle_model: &str) -> Result<Vec<PartRecord>> {
        if names.is_empty() {
            return Ok(vec![]);
        }

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::Text {
                    text: build_pricing_prompt(names, vehicle_model),
                }],
            }],
            generation_config: json_config(pricing_response_schema()),
        };

        info!("価格見積り: {}件 ({}, {})", names.len(), vehicle_model, self.model());
        let text = self.call_gemini_api(&request).await?;
        let records = parse_part_records(&text)?;
        Ok(records)
    }
}
