use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use ndarray::Array2;

use crate::dataset::{RelationDataset, RelationRecord};
use crate::error::{Error, Result};
use crate::labels::LabelCatalogue;
use crate::ml::metrics::EvalPrediction;

/// 予測CSVの真のラベル列の名前
pub const LABEL_COLUMN: &str = "label";

fn reader(file: File) -> csv::Reader<File> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file)
}

/// 関係抽出データセットのCSVファイルを読み込む
///
/// ヘッダー行が必要。列は `id, sentence, subject_entity, object_entity, label, source`。
pub fn read_relation_csv<P: AsRef<Path>>(path: P) -> Result<RelationDataset> {
    let file = File::open(path.as_ref())?;
    let mut rdr = reader(file);

    let records = rdr
        .deserialize::<RelationRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    log::debug!(
        "read {} relation records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(RelationDataset::new(records))
}

/// 予測結果のCSVファイルを読み込む
///
/// ヘッダーには `label` 列（ラベル名）と、カタログの各ラベル名のスコア列が必要。
/// スコア列はヘッダー名でカタログの順序に並べ替える。
pub fn read_predictions_csv<P: AsRef<Path>>(
    path: P,
    catalogue: &LabelCatalogue,
) -> Result<EvalPrediction> {
    let file = File::open(path.as_ref())?;
    let mut rdr = reader(file);

    // ヘッダーの列番号 -> カタログのラベルID
    let headers = rdr.headers()?.clone();
    let mut label_column = None;
    let mut score_columns: Vec<Option<usize>> = vec![None; catalogue.len()];
    for (i, header) in headers.iter().enumerate() {
        if header == LABEL_COLUMN {
            label_column = Some(i);
            continue;
        }
        let id = catalogue.id(header)?;
        if score_columns[id].replace(i).is_some() {
            return Err(Error::DuplicateLabel(header.to_string()));
        }
    }

    let label_column = label_column
        .ok_or_else(|| Error::KeyNotFound(format!("'{}' 列がありません", LABEL_COLUMN)))?;
    let score_columns = score_columns
        .into_iter()
        .enumerate()
        .map(|(id, column)| {
            column.ok_or_else(|| {
                Error::KeyNotFound(format!(
                    "スコア列がありません: {}",
                    catalogue.labels()[id]
                ))
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut label_ids = Vec::new();
    let mut scores = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let label = record.get(label_column).unwrap_or_default();
        label_ids.push(catalogue.id(label)?);

        for &column in &score_columns {
            let field = record.get(column).unwrap_or_default();
            let score = field.parse::<f64>().map_err(|_| {
                Error::Format(format!(
                    "スコアを数値に変換できません: 行 {}, 列 {}, 値 '{}'",
                    row + 1,
                    column,
                    field
                ))
            })?;
            scores.push(score);
        }
    }

    let predictions = Array2::from_shape_vec((label_ids.len(), catalogue.len()), scores)
        .map_err(|e| Error::DimensionMismatch(e.to_string()))?;

    log::debug!(
        "read {} predictions from {}",
        label_ids.len(),
        path.as_ref().display()
    );
    Ok(EvalPrediction::new(predictions, label_ids))
}
