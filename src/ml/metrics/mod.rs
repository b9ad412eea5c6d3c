//! 機械学習の評価指標モジュール
//!
//! 関係抽出モデルの評価に使用する指標を提供します。
//!
//! 学習フレームワークは評価のたびに [`EvalPrediction`] を渡し、
//! [`ComputeMetrics`] から [`MetricReport`] を受け取ります。

pub mod classification;
pub mod ranking;

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::labels::LabelCatalogue;

pub use classification::{
    accuracy_score, f1_score, micro_f1_excluding, per_label_scores, precision_score,
    recall_score, LabelScore,
};
pub use ranking::{
    auc, auprc_average, auprc_per_label, precision_recall_curve, PrecisionRecallCurve,
    ZeroPositivePolicy,
};

/// `micro f1 score` のキー
pub const MICRO_F1_KEY: &str = "micro f1 score";
/// `auprc` のキー
pub const AUPRC_KEY: &str = "auprc";
/// `accuracy` のキー
pub const ACCURACY_KEY: &str = "accuracy";

/// 評価時に学習フレームワークから渡される予測結果
#[derive(Debug, Clone, PartialEq)]
pub struct EvalPrediction {
    /// N×K のスコア行列（softmax前のlogitsでもよい）
    pub predictions: Array2<f64>,
    /// N個の真のラベルID
    pub label_ids: Vec<usize>,
}

impl EvalPrediction {
    pub fn new(predictions: Array2<f64>, label_ids: Vec<usize>) -> Self {
        EvalPrediction {
            predictions,
            label_ids,
        }
    }

    /// サンプル数
    pub fn len(&self) -> usize {
        self.label_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_ids.is_empty()
    }

    /// 各行でスコアが最大の列を予測ラベルとする
    pub fn predicted_ids(&self) -> Result<Vec<usize>> {
        argmax_rows(self.predictions.view())
    }
}

/// 各行の最大スコアの列番号
///
/// 同点の場合は番号の小さい列を選ぶ。NaNを含む行はエラー。
pub fn argmax_rows(scores: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
    if scores.ncols() == 0 {
        return Err(Error::EmptyData("スコア行列に列がありません".to_string()));
    }

    scores
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut best = 0;
            for (j, &score) in row.iter().enumerate() {
                if score.is_nan() {
                    return Err(Error::InvalidValue(format!(
                        "スコアがNaNです: 行 {}, 列 {}",
                        i, j
                    )));
                }
                if score > row[best] {
                    best = j;
                }
            }
            Ok(best)
        })
        .collect()
}

/// 評価結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    /// デフォルトラベルを除いたマイクロF1（0〜100）
    #[serde(rename = "micro f1 score")]
    pub micro_f1: f64,
    /// 全ラベルのAUPRC平均（0〜100）
    pub auprc: f64,
    /// 正解率（0〜1）、ランキングには使用しない
    pub accuracy: f64,
}

impl MetricReport {
    /// 学習フレームワークに渡す固定キーのマップ
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            (MICRO_F1_KEY, self.micro_f1),
            (AUPRC_KEY, self.auprc),
            (ACCURACY_KEY, self.accuracy),
        ])
    }
}

impl fmt::Display for MetricReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.4}, {}: {:.4}, {}: {:.4}",
            MICRO_F1_KEY, self.micro_f1, AUPRC_KEY, self.auprc, ACCURACY_KEY, self.accuracy
        )
    }
}

/// 学習フレームワークから呼び出される評価関数のトレイト
pub trait ComputeMetrics {
    /// 予測結果から評価指標を計算する
    fn compute_metrics(&self, prediction: &EvalPrediction) -> Result<MetricReport>;
}

/// ラベルカタログに基づく評価器
#[derive(Debug, Clone)]
pub struct Evaluator {
    catalogue: LabelCatalogue,
    policy: ZeroPositivePolicy,
}

impl Evaluator {
    pub fn new(catalogue: LabelCatalogue) -> Self {
        Evaluator {
            catalogue,
            policy: ZeroPositivePolicy::default(),
        }
    }

    /// 正例がないラベルの扱いを設定
    pub fn with_policy(mut self, policy: ZeroPositivePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn catalogue(&self) -> &LabelCatalogue {
        &self.catalogue
    }

    pub fn policy(&self) -> ZeroPositivePolicy {
        self.policy
    }

    /// 形状とラベルIDの範囲を検証し、予測ラベルIDを返す
    fn validate(&self, prediction: &EvalPrediction) -> Result<Vec<usize>> {
        let (n_rows, n_cols) = prediction.predictions.dim();
        if n_cols != self.catalogue.len() {
            return Err(Error::DimensionMismatch(format!(
                "スコア行列の列数がラベル数と一致しません: {} vs {}",
                n_cols,
                self.catalogue.len()
            )));
        }
        if n_rows != prediction.label_ids.len() {
            return Err(Error::DimensionMismatch(format!(
                "スコア行列の行数と真のラベル数が一致しません: {} vs {}",
                n_rows,
                prediction.label_ids.len()
            )));
        }
        if prediction.is_empty() {
            return Err(Error::EmptyData(
                "空のデータで計算することはできません".to_string(),
            ));
        }
        self.catalogue.validate_ids(&prediction.label_ids)?;

        prediction.predicted_ids()
    }

    /// ラベルごとの適合率・再現率・F1
    pub fn classification_report(&self, prediction: &EvalPrediction) -> Result<Vec<LabelScore>> {
        let preds = self.validate(prediction)?;
        per_label_scores(&prediction.label_ids, &preds, &self.catalogue)
    }
}

impl ComputeMetrics for Evaluator {
    fn compute_metrics(&self, prediction: &EvalPrediction) -> Result<MetricReport> {
        let preds = self.validate(prediction)?;
        let labels = &prediction.label_ids;

        let micro_f1 = micro_f1_excluding(
            labels,
            &preds,
            self.catalogue.len(),
            self.catalogue.default_index(),
        )?;
        let auprc = auprc_average(prediction.predictions.view(), labels, self.policy)?;
        let accuracy = accuracy_score(labels, &preds)?;

        let report = MetricReport {
            micro_f1,
            auprc,
            accuracy,
        };
        log::info!("evaluated {} examples: {}", labels.len(), report);
        Ok(report)
    }
}
