//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use hieroglyph::config::Config;
use hieroglyph::error::HieroglyphError;
use hieroglyph::render;
use hieroglyph_common::ResultFeed;
use tempfile::tempdir;

/// 壊れた設定ファイル
#[test]
fn test_config_broken_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ model: ").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(HieroglyphError::JsonParse(_))));
}

/// 存在しない結果ID
#[test]
fn test_unknown_result_id() {
    let feed = ResultFeed::default();
    let err = render::resolve_result_id(&feed, "deadbeef").unwrap_err();
    assert!(matches!(err, HieroglyphError::ResultNotFound(_)));
    assert!(format!("{}", err).contains("feed list"));
}

/// HieroglyphErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        HieroglyphError::Config("テスト設定エラー".to_string()),
        HieroglyphError::UnknownVariant("custom-x".to_string()),
        HieroglyphError::ResultNotFound("abc".to_string()),
        HieroglyphError::Common(hieroglyph_common::Error::MissingApiKey),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = HieroglyphError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: HieroglyphError = io_err.into();

    assert!(matches!(err, HieroglyphError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: HieroglyphError = json_err.into();

    assert!(matches!(err, HieroglyphError::JsonParse(_)));
}

/// common::Errorは透過的に表示される
#[test]
fn test_error_chain_transparent() {
    let common_err = hieroglyph_common::Error::MalformedResponse("AI 返回格式错误".to_string());
    let err: HieroglyphError = common_err.into();

    assert!(matches!(err, HieroglyphError::Common(_)));
    assert!(format!("{}", err).contains("AI 返回格式错误"));
}
