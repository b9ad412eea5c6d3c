use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("入出力エラー")]
    Io(#[source] std::io::Error),

    #[error("CSVエラー")]
    Csv(#[source] csv::Error),

    #[error("JSONエラー")]
    Json(#[source] serde_json::Error),

    #[error("YAMLエラー")]
    Yaml(#[source] serde_yaml::Error),

    #[error("TOMLエラー")]
    Toml(#[source] toml::de::Error),

    #[error("次元不一致エラー: {0}")]
    DimensionMismatch(String),

    #[error("ラベルIDが範囲外です: ID {id}, ラベル数 {num_labels}")]
    LabelOutOfRange { id: usize, num_labels: usize },

    #[error("ラベル名が重複しています: {0}")]
    DuplicateLabel(String),

    #[error("キーが見つかりません: {0}")]
    KeyNotFound(String),

    #[error("データがありません: {0}")]
    EmptyData(String),

    #[error("データ不足エラー: {0}")]
    InsufficientData(String),

    #[error("無効な値です: {0}")]
    InvalidValue(String),

    #[error("無効な入力です: {0}")]
    InvalidInput(String),

    #[error("データ形式エラー: {0}")]
    Format(String),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

// 標準エラーからの変換
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
