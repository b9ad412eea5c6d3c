//! 分類モデル評価のためのメトリクス

use serde::Serialize;

use crate::error::{Error, Result};
use crate::labels::{validate_label_ids, LabelCatalogue};


fn check_lengths(y_true: usize, y_pred: usize) -> Result<()> {
    if y_true != y_pred {
        return Err(Error::DimensionMismatch(format!(
            "真の値と予測値の長さが一致しません: {} vs {}",
            y_true, y_pred
        )));
    }

    if y_true == 0 {
        return Err(Error::EmptyData(
            "空のデータで計算することはできません".to_string(),
        ));
    }

    Ok(())
}

/// 精度（Accuracy）を計算
///
/// # Arguments
/// * `y_true` - 真のラベル
/// * `y_pred` - 予測ラベル
///
/// # Returns
/// * `Result<f64>` - 精度（0〜1）
pub fn accuracy_score<T: PartialEq>(y_true: &[T], y_pred: &[T]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;

    let correct_count = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    Ok(correct_count as f64 / y_true.len() as f64)
}

/// 適合率（Precision）を計算（2クラス分類）
///
/// 正と予測したサンプルがない場合は0を返す
pub fn precision_score(y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let counts = BinaryCounts::from_predictions(y_true, y_pred);
    Ok(ratio(counts.tp, counts.tp + counts.fp))
}

/// 再現率（Recall）を計算（2クラス分類）
///
/// 実際に正のサンプルがない場合は0を返す
pub fn recall_score(y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let counts = BinaryCounts::from_predictions(y_true, y_pred);
    Ok(ratio(counts.tp, counts.tp + counts.fn_))
}

/// F1スコアを計算（2クラス分類）
pub fn f1_score(y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
    let precision = precision_score(y_true, y_pred)?;
    let recall = recall_score(y_true, y_pred)?;
    Ok(harmonic_mean(precision, recall))
}

/// デフォルトラベルを除いたマイクロF1スコア（百分率）
///
/// 除外ラベル以外の全ラベルについてTP・FP・FNを合算してから
/// 1つのF1を計算する。非デフォルトのサンプルが1つもない場合は0。
///
/// # Arguments
/// * `y_true` - 真のラベルID
/// * `y_pred` - 予測ラベルID
/// * `num_labels` - ラベル数（IDは `[0, num_labels)`）
/// * `excluded` - 除外するラベル（"no_relation"）のID
///
/// # Returns
/// * `Result<f64>` - マイクロF1（0〜100）
pub fn micro_f1_excluding(
    y_true: &[usize],
    y_pred: &[usize],
    num_labels: usize,
    excluded: usize,
) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    if excluded >= num_labels {
        return Err(Error::LabelOutOfRange {
            id: excluded,
            num_labels,
        });
    }
    validate_label_ids(y_true, num_labels)?;
    validate_label_ids(y_pred, num_labels)?;

    let mut counts = BinaryCounts::default();
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t == p {
            if t != excluded {
                counts.tp += 1;
            }
        } else {
            if p != excluded {
                counts.fp += 1;
            }
            if t != excluded {
                counts.fn_ += 1;
            }
        }
    }

    let precision = ratio(counts.tp, counts.tp + counts.fp);
    let recall = ratio(counts.tp, counts.tp + counts.fn_);
    Ok(harmonic_mean(precision, recall) * 100.0)
}

/// ラベルごとの評価結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// 真のラベルとして出現した回数
    pub support: usize,
}

/// 各ラベルを one-vs-rest の2クラス問題として適合率・再現率・F1を計算
pub fn per_label_scores(
    y_true: &[usize],
    y_pred: &[usize],
    catalogue: &LabelCatalogue,
) -> Result<Vec<LabelScore>> {
    check_lengths(y_true.len(), y_pred.len())?;
    catalogue.validate_ids(y_true)?;
    catalogue.validate_ids(y_pred)?;

    catalogue
        .labels()
        .iter()
        .enumerate()
        .map(|(id, label)| -> Result<LabelScore> {
            let t: Vec<bool> = y_true.iter().map(|&y| y == id).collect();
            let p: Vec<bool> = y_pred.iter().map(|&y| y == id).collect();
            Ok(LabelScore {
                label: label.clone(),
                precision: precision_score(&t, &p)?,
                recall: recall_score(&t, &p)?,
                f1: f1_score(&t, &p)?,
                support: t.iter().filter(|&&b| b).count(),
            })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct BinaryCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

impl BinaryCounts {
    fn from_predictions(y_true: &[bool], y_pred: &[bool]) -> Self {
        let mut counts = BinaryCounts::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t, p) {
                (true, true) => counts.tp += 1,
                (false, true) => counts.fp += 1,
                (true, false) => counts.fn_ += 1,
                (false, false) => {}
            }
        }
        counts
    }
}

// 分母がゼロの場合は0
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn harmonic_mean(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}
