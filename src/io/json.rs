use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::labels::LabelDictionary;
use crate::ml::metrics::MetricReport;

/// ラベル辞書（ラベル名 -> ID のJSONオブジェクト）を読み込む
pub fn read_label_dictionary<P: AsRef<Path>>(path: P) -> Result<LabelDictionary> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let dictionary: LabelDictionary = serde_json::from_reader(reader)?;
    log::debug!(
        "read label dictionary with {} labels from {}",
        dictionary.len(),
        path.as_ref().display()
    );
    Ok(dictionary)
}

/// ラベル辞書をJSONファイルに書き込む
pub fn write_label_dictionary<P: AsRef<Path>>(dictionary: &LabelDictionary, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, dictionary)?;
    writer.flush()?;
    Ok(())
}

/// 評価結果をJSONファイルに書き込む
pub fn write_metric_report<P: AsRef<Path>>(report: &MetricReport, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}
