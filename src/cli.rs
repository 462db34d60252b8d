use clap::{Parser, Subcommand};
use hieroglyph_common::{FilterStyle, FilterSubject};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hieroglyph")]
#[command(about = "漢字ビジュアル連想ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// データ保存先（デフォルト: OSのデータディレクトリ/hieroglyph）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Gemini APIキー（保存済みキーより優先）
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 漢字（または語）から連想画像を検索
    Search {
        /// 入力テキスト（2文字以上なら語全体 + 各文字）
        #[arg(required = true)]
        text: Vec<String>,

        /// この検索だけ使うバリアント（保存中の選択は変えない）
        #[arg(long)]
        variant: Option<String>,
    },

    /// 結果フィードの管理
    Feed {
        #[command(subcommand)]
        action: FeedAction,
    },

    /// バリアントの管理
    Variants {
        #[command(subcommand)]
        action: VariantAction,
    },

    /// フィルタ設定の表示/変更
    Filters {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを保存
        #[arg(long)]
        set_api_key: Option<String>,

        /// 保存済みAPIキーを削除
        #[arg(long, conflicts_with = "set_api_key")]
        clear_api_key: bool,

        /// 既定の設定ファイルを書き出す
        #[arg(long)]
        init: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 結果の外部リンク（画像検索・来源）を表示
    Links {
        /// 結果ID（先頭一致）
        id: String,
    },
}

#[derive(Subcommand)]
pub enum FeedAction {
    /// 結果一覧
    List {
        /// お気に入りのみ
        #[arg(short, long)]
        favorites: bool,

        /// 表示件数
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// お気に入りを切り替え
    Favorite { id: String },
    /// 結果を削除
    Remove { id: String },
    /// 全結果を削除
    Clear {
        /// 確認をスキップ
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum VariantAction {
    /// 内蔵 + カスタムの一覧
    List,
    /// カスタムバリアントを作成して選択
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// キーワード（カンマ/空白区切り）
        #[arg(long)]
        keywords: String,
    },
    /// カスタムバリアントを編集
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        keywords: Option<String>,
    },
    /// カスタムバリアントを削除
    Delete { id: String },
    /// 使用するバリアントを選択
    Select { id: String },
}

#[derive(Subcommand)]
pub enum FilterAction {
    /// 現在のフィルタ
    Show,
    /// フィルタを変更（指定しない項目は現在値のまま）
    Set {
        /// 表現形式 (any/icon/illustration/photo/art)
        #[arg(long)]
        style: Option<FilterStyle>,

        /// 主体 (any/person/animal/abstract/place)
        #[arg(long)]
        subject: Option<FilterSubject>,

        /// 同音・字形連想を許可
        #[arg(long)]
        homophone: Option<bool>,

        /// 除外内容
        #[arg(long)]
        exclude: Option<String>,
    },
    /// 既定値に戻す
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from(["hieroglyph", "search", "德国", "--variant", "anime"]).unwrap();
        match cli.command {
            Commands::Search { text, variant } => {
                assert_eq!(text, vec!["德国"]);
                assert_eq!(variant.as_deref(), Some("anime"));
            }
            _ => panic!("search expected"),
        }
    }

    #[test]
    fn test_parse_filters_set() {
        let cli = Cli::try_parse_from([
            "hieroglyph",
            "filters",
            "set",
            "--style",
            "photo",
            "--subject",
            "动物",
            "--homophone",
            "false",
        ])
        .unwrap();
        match cli.command {
            Commands::Filters {
                action: FilterAction::Set { style, subject, homophone, exclude },
            } => {
                assert_eq!(style, Some(FilterStyle::Photo));
                assert_eq!(subject, Some(FilterSubject::Animal));
                assert_eq!(homophone, Some(false));
                assert!(exclude.is_none());
            }
            _ => panic!("filters set expected"),
        }
    }

    #[test]
    fn test_config_conflicting_key_flags() {
        let result = Cli::try_parse_from([
            "hieroglyph",
            "config",
            "--set-api-key",
            "k",
            "--clear-api-key",
        ]);
        assert!(result.is_err());
    }
}
