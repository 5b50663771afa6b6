//! Car Damage Estimator Common Library
//!
//! 見積りロジックの純粋部分（型・集計・入力チェック・パーサー・レポート）

pub mod types;
pub mod error;
pub mod pricing;
pub mod request;
pub mod parser;
pub mod prompts;
pub mod export;

pub use types::{ImageBlob, Part, PartRecord, PartSelection, PriceField, Screen};
pub use error::{Error, Result};
pub use pricing::{format_toman, summarize, CostSummary};
pub use request::{
    combine_part_names, split_manual_parts, AnalysisRequest, ValidationError,
    PLACEHOLDER_VEHICLE_MODEL, PROCESSING_FAILED_MESSAGE,
};
pub use parser::{extract_json, parse_detected_parts, parse_part_records};
pub use prompts::{build_damage_prompt, build_pricing_prompt};
pub use export::report_core::{build_report, render_html, JalaliDate, Report, DEFAULT_REPORT_TITLE};
