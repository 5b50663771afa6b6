//! APIレスポンスパーサー
//!
//! Gemini APIのレスポンステキストからJSONを抽出し、
//! 損傷部品名リスト・価格レコードリストとして検証する。
//! 検証を通らないデータは部品リストに入れない。

use crate::error::{Error, Result};
use crate::types::PartRecord;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use damage_estimator_common::extract_json;
///
/// let response = "```json\n[\"سپر جلو\"]\n```";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "[\"سپر جلو\"]");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 損傷検出レスポンスをパース
///
/// 文字列配列のみ受け付ける。空白だけの要素は除外する。
/// 空配列は「損傷なし」として正常扱い。
pub fn parse_detected_parts(response: &str) -> Result<Vec<String>> {
    let json_str = extract_json(response)?;
    let names: Vec<String> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("損傷検出 JSONパースエラー: {}", e)))?;

    Ok(names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// 価格レコードレスポンスをパース
///
/// 価格は0以上の整数であること、部品名が空でないことを検証する
pub fn parse_part_records(response: &str) -> Result<Vec<PartRecord>> {
    let json_str = extract_json(response)?;
    let records: Vec<PartRecord> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("価格レコード JSONパースエラー: {}", e)))?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, mut record)| {
            record.name = record.name.trim().to_string();
            if record.name.is_empty() {
                return Err(Error::Parse(format!("価格レコード{}: 部品名が空です", i)));
            }
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json テスト
    // =============================================

    #[test]
    fn test_extract_json_with_block() {
        let response = "```json\n[\"سپر جلو\", \"گلگیر\"]\n```";
        let json = extract_json(response).unwrap();
        assert_eq!(json, "[\"سپر جلو\", \"گلگیر\"]");
    }

    #[test]
    fn test_extract_json_raw() {
        let response = r#"[{"name": "کاپوت"}]"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Here is the result: ["درب عقب"] done."#;
        assert_eq!(extract_json(response).unwrap(), r#"["درب عقب"]"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    // =============================================
    // parse_detected_parts テスト
    // =============================================

    #[test]
    fn test_parse_detected_parts() {
        let names = parse_detected_parts(r#"["سپر جلو", " چراغ جلو راست ", ""]"#).unwrap();
        assert_eq!(names, vec!["سپر جلو".to_string(), "چراغ جلو راست".to_string()]);
    }

    #[test]
    fn test_parse_detected_parts_empty_is_ok() {
        assert!(parse_detected_parts("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_detected_parts_rejects_objects() {
        assert!(parse_detected_parts(r#"[{"name": "سپر"}]"#).is_err());
    }

    // =============================================
    // parse_part_records テスト
    // =============================================

    #[test]
    fn test_parse_part_records() {
        let response = r#"```json
[
  {"name": "سپر جلو", "newPrice": 4500000, "usedPrice": 2000000, "repairCost": 800000, "sourceUrl": "https://example.ir/p/1"},
  {"name": "گلگیر", "newPrice": 3000000, "usedPrice": 1200000, "repairCost": 500000, "sourceUrl": "https://example.ir/p/2"}
]
```"#;

        let records = parse_part_records(response).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "سپر جلو");
        assert_eq!(records[0].new_price, 4_500_000);
        assert_eq!(records[1].repair_cost, 500_000);
        assert_eq!(records[1].source_url, "https://example.ir/p/2");
    }

    #[test]
    fn test_parse_part_records_missing_price_fails() {
        let response = r#"[{"name": "سپر جلو", "newPrice": 1, "usedPrice": 2}]"#;
        assert!(parse_part_records(response).is_err());
    }

    #[test]
    fn test_parse_part_records_negative_price_fails() {
        let response = r#"[{"name": "سپر جلو", "newPrice": -1, "usedPrice": 2, "repairCost": 3, "sourceUrl": ""}]"#;
        assert!(parse_part_records(response).is_err());
    }

    #[test]
    fn test_parse_part_records_blank_name_fails() {
        let response = r#"[{"name": "  ", "newPrice": 1, "usedPrice": 2, "repairCost": 3, "sourceUrl": ""}]"#;
        let err = parse_part_records(response).unwrap_err();
        assert!(err.to_string().contains("部品名が空"));
    }

    #[test]
    fn test_parse_part_records_missing_source_url_defaults() {
        let response = r#"[{"name": "آینه بغل چپ", "newPrice": 1, "usedPrice": 2, "repairCost": 3}]"#;
        let records = parse_part_records(response).unwrap();
        assert_eq!(records[0].source_url, "");
    }
}
