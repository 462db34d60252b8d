//! メインアプリケーションコンポーネント

use crate::api::FetchGemini;
use crate::components::{
    filter_panel::FilterPanel, header::Header, result_feed::ResultFeed, search_box::SearchBox,
    variant_manager::VariantManager,
};
use crate::local_store::LocalStore;
use hieroglyph_common::{dispatch_batch, FilterSettings, PipelinePolicy, VariantDraft, Workspace};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// ビルド時に埋め込む既定キー
const BUILD_API_KEY: Option<&str> = option_env!("GEMINI_API_KEY");

/// アプリケーションの状態（テーマと入力欄以外は永続化される）
pub type AppState = RwSignal<Workspace<LocalStore>>;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let state: AppState = RwSignal::new(Workspace::load(
        LocalStore,
        PipelinePolicy::default(),
        BUILD_API_KEY.map(String::from),
    ));
    let (dark, set_dark) = signal(false);
    let (input, set_input) = signal(String::new());

    let is_loading = Signal::derive(move || state.with(|ws| ws.is_loading()));
    let results = Memo::new(move |_| state.with(|ws| ws.feed().items().to_vec()));
    let variants = Memo::new(move |_| state.with(|ws| ws.variants().list_all().cloned().collect::<Vec<_>>()));
    let active_id = Memo::new(move |_| state.with(|ws| ws.variants().active_id().to_string()));
    let filters = Memo::new(move |_| state.with(|ws| ws.filters().clone()));
    let has_api_key = Signal::derive(move || state.with(|ws| ws.api_key().resolve(None).is_some()));

    // 検索ハンドラ
    let on_search = move |text: String| {
        let Some(batch) = state.try_update(|ws| ws.submit(&text, None)).flatten() else {
            return;
        };
        set_input.set(String::new());
        let denylist = state.with_untracked(|ws| ws.policy().denylist.clone());

        spawn_local(async move {
            let provider = FetchGemini::default();
            dispatch_batch(&provider, &batch, &denylist, |id, patch| {
                if patch.error.is_some() {
                    gloo::console::warn!(format!("association failed: {}", id));
                }
                state.update(|ws| {
                    ws.apply_settlement(id, &patch);
                });
            })
            .await;
            state.update(|ws| ws.finish_batch());
        });
    };

    let on_toggle_theme = move |_| set_dark.update(|d| *d = !*d);

    let on_filters_change = move |settings: FilterSettings| {
        state.update(|ws| ws.replace_filters(settings));
    };
    let on_save_api_key = move |key: String| {
        state.update(|ws| ws.set_api_key(&key));
    };

    let on_select_variant = move |id: String| {
        state.update(|ws| {
            ws.select_variant(&id);
        });
    };
    let on_create_variant = move |draft: VariantDraft| {
        state.update(|ws| {
            if ws.create_variant(&draft).is_none() {
                gloo::console::warn!("variant name and keywords are required");
            }
        });
    };
    let on_edit_variant = move |(id, draft): (String, VariantDraft)| {
        state.update(|ws| {
            ws.edit_variant(&id, &draft);
        });
    };
    let on_delete_variant = move |id: String| {
        state.update(|ws| {
            ws.delete_variant(&id);
        });
    };

    let on_favorite = move |id: String| {
        state.update(|ws| {
            ws.toggle_favorite(&id);
        });
    };
    let on_remove = move |id: String| {
        state.update(|ws| {
            ws.remove_result(&id);
        });
    };
    let on_clear = move |_| {
        state.update(|ws| ws.clear_results());
    };

    let variant_name = move |id: String| state.with(|ws| ws.variants().resolve(&id).name.clone());

    view! {
        <div class="app" class:dark=move || dark.get()>
            <Header dark=dark on_toggle_theme=on_toggle_theme />

            <main class="container">
                <SearchBox
                    input=input
                    set_input=set_input
                    is_loading=is_loading
                    on_search=on_search
                />

                <div class="side-panels">
                    <VariantManager
                        variants=variants
                        active_id=active_id
                        on_select=on_select_variant
                        on_create=on_create_variant
                        on_edit=on_edit_variant
                        on_delete=on_delete_variant
                    />

                    <FilterPanel
                        filters=filters
                        has_api_key=has_api_key
                        on_change=on_filters_change
                        on_save_api_key=on_save_api_key
                    />
                </div>

                <ResultFeed
                    results=results
                    variant_name=variant_name
                    on_favorite=on_favorite
                    on_remove=on_remove
                    on_clear=on_clear
                />
            </main>
        </div>
    }
}
