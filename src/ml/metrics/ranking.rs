//! 適合率-再現率曲線とAUPRCのメトリクス
//!
//! スコアの順序のみに依存するため、全スコアに対する狭義単調増加な変換で
//! 結果は変わらない。

use ndarray::ArrayView2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::labels::validate_label_ids;

/// 正例が1つもないラベルの扱い
///
/// 正例がないと再現率の分母が0になり、曲線が定義できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPositivePolicy {
    /// 面積0として全ラベルで平均する
    #[default]
    Zero,
    /// 平均の対象から除外する
    Skip,
}

/// 適合率-再現率曲線
///
/// 点は再現率の昇順（しきい値の降順）に並ぶ。先頭は再現率0・適合率1の
/// アンカー点で、対応するしきい値はない。
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    /// `precision[i + 1]` と `recall[i + 1]` に対応するしきい値
    pub thresholds: Vec<f64>,
}

impl PrecisionRecallCurve {
    /// 再現率軸での台形積分による曲線下面積
    pub fn area(&self) -> Result<f64> {
        auc(&self.recall, &self.precision)
    }
}

/// 2クラス問題の適合率-再現率曲線を計算
///
/// 異なるスコア値ごとにしきい値を置き、スコアがしきい値以上のサンプルを
/// 正と予測したときの適合率と再現率を求める。同じスコアのサンプルは
/// 1つのしきい値にまとめられる。
///
/// # Errors
/// 長さの不一致、空の入力、NaNのスコア、正例がない場合
pub fn precision_recall_curve(y_true: &[bool], scores: &[f64]) -> Result<PrecisionRecallCurve> {
    if y_true.len() != scores.len() {
        return Err(Error::DimensionMismatch(format!(
            "真の値とスコアの長さが一致しません: {} vs {}",
            y_true.len(),
            scores.len()
        )));
    }
    if y_true.is_empty() {
        return Err(Error::EmptyData(
            "空のデータで計算することはできません".to_string(),
        ));
    }
    if let Some(i) = scores.iter().position(|s| s.is_nan()) {
        return Err(Error::InvalidValue(format!("スコアがNaNです: 位置 {}", i)));
    }

    let total_positives = y_true.iter().filter(|&&t| t).count();
    if total_positives == 0 {
        return Err(Error::InsufficientData(
            "正例がないため再現率を定義できません".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut precision = Vec::with_capacity(scores.len() + 1);
    let mut recall = Vec::with_capacity(scores.len() + 1);
    let mut thresholds = Vec::with_capacity(scores.len());
    precision.push(1.0);
    recall.push(0.0);

    let mut tp = 0usize;
    let mut fp = 0usize;
    for (rank, &i) in order.iter().enumerate() {
        if y_true[i] {
            tp += 1;
        } else {
            fp += 1;
        }

        // 同じスコアが続く間は点を追加しない
        let last_of_tie = order
            .get(rank + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_tie {
            precision.push(tp as f64 / (tp + fp) as f64);
            recall.push(tp as f64 / total_positives as f64);
            thresholds.push(scores[i]);
        }
    }

    Ok(PrecisionRecallCurve {
        precision,
        recall,
        thresholds,
    })
}

/// 台形則による曲線下面積
///
/// `x` は単調（非減少または非増加）でなければならない。
/// 非増加の場合も面積は正の値で返す。
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::DimensionMismatch(format!(
            "xとyの長さが一致しません: {} vs {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "面積の計算には2点以上が必要です: {}点",
            x.len()
        )));
    }

    let increasing = x.windows(2).all(|w| w[0] <= w[1]);
    let decreasing = x.windows(2).all(|w| w[0] >= w[1]);
    if !increasing && !decreasing {
        return Err(Error::InvalidValue("xが単調ではありません".to_string()));
    }

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[0] + yw[1]) / 2.0)
        .sum();

    Ok(if increasing { area } else { -area })
}

/// ラベルごとのAUPRC（0〜1）
///
/// 各ラベルを one-vs-rest の2クラス問題として扱う。バッチ内に正例がない
/// ラベルは `None`。ラベルごとの計算は並列に行う。
pub fn auprc_per_label(scores: ArrayView2<'_, f64>, y_true: &[usize]) -> Result<Vec<Option<f64>>> {
    let (n_rows, num_labels) = scores.dim();
    if n_rows != y_true.len() {
        return Err(Error::DimensionMismatch(format!(
            "スコア行列の行数とラベル数が一致しません: {} vs {}",
            n_rows,
            y_true.len()
        )));
    }
    if n_rows == 0 {
        return Err(Error::EmptyData(
            "空のデータで計算することはできません".to_string(),
        ));
    }
    validate_label_ids(y_true, num_labels)?;

    (0..num_labels)
        .into_par_iter()
        .map(|c| -> Result<Option<f64>> {
            let targets: Vec<bool> = y_true.iter().map(|&y| y == c).collect();
            if !targets.iter().any(|&t| t) {
                log::debug!("label {} has no positive example in this batch", c);
                return Ok(None);
            }
            let column = scores.column(c).to_vec();
            precision_recall_curve(&targets, &column)?.area().map(Some)
        })
        .collect()
}

/// 全ラベルのAUPRCの平均（百分率）
///
/// # Arguments
/// * `scores` - N×K のスコア行列
/// * `y_true` - N個の真のラベルID（`[0, K)`）
/// * `policy` - 正例がないラベルの扱い
///
/// # Returns
/// * `Result<f64>` - AUPRC平均（0〜100）
pub fn auprc_average(
    scores: ArrayView2<'_, f64>,
    y_true: &[usize],
    policy: ZeroPositivePolicy,
) -> Result<f64> {
    let per_label = auprc_per_label(scores, y_true)?;

    let areas: Vec<f64> = match policy {
        ZeroPositivePolicy::Zero => per_label.iter().map(|a| a.unwrap_or(0.0)).collect(),
        ZeroPositivePolicy::Skip => {
            let kept: Vec<f64> = per_label.iter().flatten().copied().collect();
            if kept.len() < per_label.len() {
                log::warn!(
                    "{} of {} labels have no positive example and are left out of the AUPRC average",
                    per_label.len() - kept.len(),
                    per_label.len()
                );
            }
            kept
        }
    };

    if areas.is_empty() {
        return Ok(0.0);
    }

    Ok(areas.iter().sum::<f64>() / areas.len() as f64 * 100.0)
}
