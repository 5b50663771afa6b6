//! アプリケーション状態機械
//!
//! 画面（Welcome / Loading / Results / Error）・部品リスト・直近のエラーを保持し、
//! ユーザー操作をAI呼び出しと状態遷移に変換する。
//! 部品リストは確定した変更のたびに Store へ保存する。

use crate::analyzer::EstimationService;
use crate::error::{EstimatorError, Result};
use crate::store::Store;
use damage_estimator_common::{
    combine_part_names, summarize, AnalysisRequest, CostSummary, Part, PartSelection, PriceField,
    Screen, PLACEHOLDER_VEHICLE_MODEL, PROCESSING_FAILED_MESSAGE,
};
use tracing::{debug, error, info, warn};

pub struct Estimator<S, T> {
    service: S,
    store: T,
    screen: Screen,
    parts: Vec<Part>,
    error: Option<String>,
    in_flight: bool,
}

impl<S: EstimationService, T: Store> Estimator<S, T> {
    /// 保存済みリストを復元して作成
    pub fn new(service: S, store: T) -> Self {
        let parts = store.load();
        let screen = if parts.is_empty() { Screen::Welcome } else { Screen::Results };
        debug!("状態を復元: {}件 ({:?})", parts.len(), screen);

        Self {
            service,
            store,
            screen,
            parts,
            error: None,
            in_flight: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn has_results(&self) -> bool {
        !self.parts.is_empty()
    }

    /// 現在のリストの集計（毎回再計算）
    pub fn summary(&self) -> CostSummary {
        summarize(&self.parts)
    }

    fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.screen = Screen::Error;
    }

    fn commit(&mut self) {
        self.store.save(&self.parts);
    }

    /// 解析開始
    ///
    /// 入力チェック失敗・AI呼び出し失敗はエラー画面への遷移として扱う。
    /// Err を返すのは別の呼び出しが処理中の場合のみ。
    pub async fn start_analysis(&mut self, request: AnalysisRequest) -> Result<Screen> {
        if self.in_flight {
            warn!("解析中のため新しい解析要求を拒否しました");
            return Err(EstimatorError::Busy("解析"));
        }

        if let Err(e) = request.validate() {
            info!("入力チェックエラー: {:?}", e);
            self.fail(e.to_string());
            return Ok(self.screen);
        }

        self.screen = Screen::Loading;
        self.error = None;
        self.in_flight = true;

        let outcome = self.run_analysis(&request).await;
        self.in_flight = false;

        match outcome {
            Ok(parts) => {
                info!("解析完了: {}件", parts.len());
                self.parts = parts;
                self.commit();
                self.screen = Screen::Results;
            }
            Err(e) => {
                error!("解析に失敗: {}", e);
                self.fail(PROCESSING_FAILED_MESSAGE.to_string());
            }
        }

        Ok(self.screen)
    }

    /// 画像解析 → 部品名統合 → 価格取得（順次実行）
    async fn run_analysis(&self, request: &AnalysisRequest) -> Result<Vec<Part>> {
        let vehicle_model = request.vehicle_model.trim();

        let mut names = if request.use_images {
            self.service
                .detect_damaged_parts(&request.images, vehicle_model)
                .await?
        } else {
            Vec::new()
        };

        if request.use_manual_list {
            names = combine_part_names(&names, &request.manual_part_names());
        }

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.service.resolve_parts(&names, vehicle_model).await?;
        Ok(records.into_iter().map(Part::from).collect())
    }

    /// 手動で部品を追加
    ///
    /// 車種は仮の名称で問い合わせる。失敗時はログのみでリストは変更しない。
    pub async fn add_manual_part(&mut self, name: &str) -> Result<bool> {
        if self.in_flight {
            warn!("処理中のため部品追加要求を拒否しました");
            return Err(EstimatorError::Busy("部品追加"));
        }

        let name = name.trim();
        if self.screen != Screen::Results || name.is_empty() {
            return Ok(false);
        }

        self.in_flight = true;
        let outcome = self
            .service
            .resolve_parts(&[name.to_string()], PLACEHOLDER_VEHICLE_MODEL)
            .await;
        self.in_flight = false;

        match outcome {
            Ok(records) => match records.into_iter().next() {
                Some(record) => {
                    info!("部品を追加: {}", record.name);
                    self.parts.push(Part::from(record));
                    self.commit();
                    Ok(true)
                }
                None => {
                    warn!("部品情報が返されませんでした: {}", name);
                    Ok(false)
                }
            },
            Err(e) => {
                warn!("部品情報の取得に失敗: {}: {}", name, e);
                Ok(false)
            }
        }
    }

    /// 選択状態を変更（範囲外は無視）
    pub fn set_part_selection(&mut self, index: usize, selection: PartSelection) -> bool {
        let Some(part) = self.parts.get_mut(index) else {
            debug!("範囲外の選択変更を無視: {}", index);
            return false;
        };
        part.selection = selection;
        self.commit();
        true
    }

    /// 価格フィールドを変更（範囲外は無視）
    pub fn update_part_field(&mut self, index: usize, field: PriceField, value: u64) -> bool {
        let Some(part) = self.parts.get_mut(index) else {
            debug!("範囲外の価格変更を無視: {}", index);
            return false;
        };
        part.set_price(field, value);
        self.commit();
        true
    }

    /// 部品を削除（後続の位置は1つ詰める）
    pub fn delete_part(&mut self, index: usize) -> Option<Part> {
        if index >= self.parts.len() {
            debug!("範囲外の削除を無視: {}", index);
            return None;
        }
        let removed = self.parts.remove(index);
        self.commit();
        Some(removed)
    }

    /// 全てクリアして最初の画面へ
    pub fn reset(&mut self) {
        self.parts.clear();
        self.error = None;
        self.in_flight = false;
        self.store.clear();
        self.screen = Screen::Welcome;
    }

    /// 入力フォームから前回の結果へ戻る
    pub fn go_to_results(&mut self) {
        if self.screen == Screen::Welcome {
            self.screen = Screen::Results;
        }
    }
}
