use thiserror::Error;

#[derive(Error, Debug)]
pub enum HieroglyphError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] hieroglyph_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("バリアントが見つかりません: {0}（`hieroglyph variants list` で確認してください）")]
    UnknownVariant(String),

    #[error("結果が見つかりません: {0}（`hieroglyph feed list` で確認してください）")]
    ResultNotFound(String),
}

pub type Result<T> = std::result::Result<T, HieroglyphError>;
