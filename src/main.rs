use anyhow::Context;
use clap::Parser;
use dialoguer::Confirm;
use hieroglyph::cli::{Cli, Commands, FeedAction, FilterAction, VariantAction};
use hieroglyph::config::{Config, BUILD_API_KEY};
use hieroglyph::error::HieroglyphError;
use hieroglyph::gemini::GeminiClient;
use hieroglyph::render;
use hieroglyph::store::FileStore;
use hieroglyph_common::{dispatch_batch, FilterSettings, VariantDraft, Workspace};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type App = Workspace<FileStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗")?;
    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => Config::default_data_dir()?,
    };
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let mut ws = Workspace::load(
        FileStore::new(data_dir),
        config.policy(),
        BUILD_API_KEY.map(String::from),
    );
    let runtime_key = cli.api_key.as_deref();

    match cli.command {
        Commands::Search { text, variant } => {
            let previous = enter_variant(&mut ws, variant)?;
            let outcome = run_search(&mut ws, &config, &text.join(" "), runtime_key).await;
            leave_variant(&mut ws, previous);
            outcome?;
        }

        Commands::Feed { action } => run_feed(&mut ws, action)?,

        Commands::Variants { action } => run_variants(&mut ws, action)?,

        Commands::Filters { action } => {
            let current = ws.filters().clone();
            match action {
                FilterAction::Show => {}
                FilterAction::Set { style, subject, homophone, exclude } => {
                    ws.replace_filters(FilterSettings {
                        style: style.unwrap_or(current.style),
                        subject: subject.unwrap_or(current.subject),
                        allow_homophone: homophone.unwrap_or(current.allow_homophone),
                        exclude_content: exclude.unwrap_or(current.exclude_content),
                    });
                    println!("✔ フィルタを更新しました");
                }
                FilterAction::Reset => {
                    ws.replace_filters(FilterSettings::default());
                    println!("✔ フィルタを既定値に戻しました");
                }
            }
            println!("{}", render::filters(ws.filters()));
        }

        Commands::Config { set_api_key, clear_api_key, init, show } => {
            if let Some(key) = set_api_key {
                ws.set_api_key(&key);
                println!("✔ APIキーを保存しました");
            }

            if clear_api_key {
                ws.set_api_key("");
                println!("✔ 保存済みAPIキーを削除しました");
            }

            if init {
                let path = Config::config_path()?;
                config.save_to(&path)?;
                println!("✔ 設定ファイルを書き出しました: {}", path.display());
            }

            if show {
                let key_source = if runtime_key.is_some_and(|k| !k.trim().is_empty()) {
                    "引数/環境変数"
                } else if ws.api_key().persisted().is_some() {
                    "保存済み"
                } else if BUILD_API_KEY.is_some() {
                    "ビルド時既定"
                } else {
                    "未設定"
                };
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  データ: {}", ws.store().dir().display());
                println!("  モデル: {}", config.model);
                println!("  容量: {}", config.capacity);
                println!("  除外ドメイン: {}", config.denylist.join(", "));
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", key_source);
            }
        }

        Commands::Links { id } => {
            let id = render::resolve_result_id(ws.feed(), &id)?;
            if let Some(result) = ws.feed().get(&id) {
                print!("{}", render::links(result));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `--variant` 指定時は一時的に選択し、元の選択IDを返す
fn enter_variant(ws: &mut App, variant: Option<String>) -> anyhow::Result<Option<String>> {
    let Some(id) = variant else {
        return Ok(None);
    };
    let previous = ws.variants().active_id().to_string();
    if !ws.select_variant(&id) {
        return Err(HieroglyphError::UnknownVariant(id).into());
    }
    Ok(Some(previous))
}

fn leave_variant(ws: &mut App, previous: Option<String>) {
    if let Some(id) = previous {
        ws.select_variant(&id);
    }
}

async fn run_search(
    ws: &mut App,
    config: &Config,
    text: &str,
    runtime_key: Option<&str>,
) -> anyhow::Result<()> {
    let client = GeminiClient::new(config)?;

    if ws.api_key().resolve(runtime_key).is_none() {
        println!("⚠ APIキーが未設定です。`hieroglyph config --set-api-key YOUR_KEY` で設定してください");
    }

    let Some(batch) = ws.submit(text, runtime_key) else {
        println!("入力が空です");
        return Ok(());
    };

    println!(
        "🔍 {} ({}件, {})\n",
        text.trim(),
        batch.len(),
        ws.variants().active().name
    );

    let pb = ProgressBar::new(batch.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:30}] {pos}/{len}")
            .context("progress template")?
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let denylist = ws.policy().denylist.clone();
    dispatch_batch(&client, &batch, &denylist, |id, patch| {
        ws.apply_settlement(id, &patch);
        if let Some(result) = ws.feed().get(id) {
            pb.println(render::card(result, ws.variants()));
        }
        pb.inc(1);
    })
    .await;
    ws.finish_batch();
    pb.finish_and_clear();

    let failed = batch
        .result_ids()
        .filter_map(|id| ws.feed().get(id))
        .filter(|r| r.error.is_some())
        .count();
    if failed > 0 {
        println!("✔ 完了（{}件失敗）", failed);
    } else {
        println!("✔ 完了");
    }
    Ok(())
}

fn run_feed(ws: &mut App, action: FeedAction) -> anyhow::Result<()> {
    match action {
        FeedAction::List { favorites, limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            let items: Vec<_> = ws
                .feed()
                .items()
                .iter()
                .filter(|r| !favorites || r.is_favorite)
                .take(limit)
                .collect();
            if items.is_empty() {
                println!("結果がありません");
            }
            for result in items {
                println!("{}", render::card(result, ws.variants()));
            }
        }
        FeedAction::Favorite { id } => {
            let id = render::resolve_result_id(ws.feed(), &id)?;
            if let Some(on) = ws.toggle_favorite(&id) {
                println!("{} {}", if on { "★" } else { "☆" }, render::short_id(&id));
            }
        }
        FeedAction::Remove { id } => {
            let id = render::resolve_result_id(ws.feed(), &id)?;
            if let Some(removed) = ws.remove_result(&id) {
                println!("✔ 削除しました: {}", removed.character);
            }
        }
        FeedAction::Clear { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("{}件の結果を全て削除しますか?", ws.feed().len()))
                    .default(false)
                    .interact()
                    .context("確認入力に失敗")?;
            if confirmed {
                ws.clear_results();
                println!("✔ 結果を全て削除しました");
            }
        }
    }
    Ok(())
}

fn run_variants(ws: &mut App, action: VariantAction) -> anyhow::Result<()> {
    match action {
        VariantAction::List => {
            let active = ws.variants().active_id().to_string();
            for variant in ws.variants().list_all() {
                println!("{}", render::variant_line(variant, variant.id == active));
            }
        }
        VariantAction::Create { name, description, keywords } => {
            let draft = VariantDraft::new(&name, &description, &keywords);
            match ws.create_variant(&draft) {
                Some(variant) => println!("✔ 作成して選択しました: {} ({})", variant.name, variant.id),
                None => anyhow::bail!("名前とキーワードは必須です"),
            }
        }
        VariantAction::Edit { id, name, description, keywords } => {
            let Some(existing) = ws.variants().custom().iter().find(|v| v.id == id) else {
                return Err(HieroglyphError::UnknownVariant(id).into());
            };
            let mut draft = VariantDraft::from_variant(existing);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(keywords) = keywords {
                draft.keywords = keywords;
            }
            if !ws.edit_variant(&id, &draft) {
                anyhow::bail!("名前とキーワードは空にできません");
            }
            println!("✔ 更新しました: {}", draft.name.trim());
        }
        VariantAction::Delete { id } => {
            if !ws.delete_variant(&id) {
                return Err(HieroglyphError::UnknownVariant(id).into());
            }
            println!("✔ 削除しました（選択中: {}）", ws.variants().active().name);
        }
        VariantAction::Select { id } => {
            if !ws.select_variant(&id) {
                return Err(HieroglyphError::UnknownVariant(id).into());
            }
            println!("✔ 選択しました: {}", ws.variants().active().name);
        }
    }
    Ok(())
}
