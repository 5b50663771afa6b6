//! プロンプト生成モジュール
//!
//! - build_damage_prompt: 画像から損傷部品名を抽出するプロンプト
//! - build_pricing_prompt: 部品名から価格・工賃を見積もるプロンプト
//! - *_response_schema: Gemini responseSchema

use serde_json::{json, Value};

/// 損傷検出プロンプト生成
pub fn build_damage_prompt(vehicle_model: &str) -> String {
    format!(
        r#"You are an expert car mechanic and damage assessor. Analyze the following images of a damaged car, which is a {vehicle_model}.
Identify every damaged part. Respond ONLY with a JSON array of strings, where each string is the name of a damaged part in Persian.
For example: ["سپر جلو", "چراغ جلو راست", "گلگیر جلو راست"]"#
    )
}

/// 価格見積りプロンプト生成
///
/// 部品名リストはJSON配列としてプロンプトに埋め込む
pub fn build_pricing_prompt(part_names: &[String], vehicle_model: &str) -> String {
    let list = serde_json::to_string(part_names).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are an AI that simulates an auto parts price search engine for the Iranian market for a specific car model: {vehicle_model}. For the following list of car parts, provide estimated prices in Iranian Toman and an estimated labor cost for repair.
You MUST provide plausible prices from the Iranian market for the specified car model. Your response must be a JSON array of objects, where each object corresponds to a part from the input list.
Do not include any explanation. The JSON format for each object must be:
{{"name": "[Part Name in Persian]", "newPrice": [number], "usedPrice": [number], "repairCost": [number], "sourceUrl": "[a plausible but fake iranian auto part store URL for the part]"}}
Here is the list of parts: {list}"#
    )
}

/// 損傷検出レスポンスのスキーマ（文字列配列）
pub fn damage_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// 価格レコードレスポンスのスキーマ
pub fn pricing_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "newPrice": { "type": "INTEGER" },
                "usedPrice": { "type": "INTEGER" },
                "repairCost": { "type": "INTEGER" },
                "sourceUrl": { "type": "STRING" }
            },
            "required": ["name", "newPrice", "usedPrice", "repairCost", "sourceUrl"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_prompt_contains_model() {
        let prompt = build_damage_prompt("پژو ۴۰۵");
        assert!(prompt.contains("which is a پژو ۴۰۵."));
        assert!(prompt.contains("JSON array of strings"));
    }

    #[test]
    fn test_pricing_prompt_embeds_json_list() {
        let names = vec!["سپر جلو".to_string(), "گلگیر".to_string()];
        let prompt = build_pricing_prompt(&names, "سمند");
        assert!(prompt.contains("car model: سمند."));
        assert!(prompt.contains(r#"["سپر جلو","گلگیر"]"#));
        assert!(prompt.contains(r#"{"name": "[Part Name in Persian]""#));
    }

    #[test]
    fn test_pricing_schema_required_fields() {
        let schema = pricing_response_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 5);
        assert_eq!(schema["items"]["properties"]["newPrice"]["type"], "INTEGER");
    }

    #[test]
    fn test_damage_schema() {
        let schema = damage_response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "STRING");
    }
}
