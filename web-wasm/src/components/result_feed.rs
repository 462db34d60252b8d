//! 結果フィードコンポーネント

use super::result_card::ResultCard;
use hieroglyph_common::SearchResult;
use leptos::prelude::*;

#[component]
pub fn ResultFeed<FN, FF, FR, FC>(
    results: Memo<Vec<SearchResult>>,
    variant_name: FN,
    on_favorite: FF,
    on_remove: FR,
    on_clear: FC,
) -> impl IntoView
where
    FN: Fn(String) -> String + 'static + Clone + Send + Sync,
    FF: Fn(String) + 'static + Clone + Send + Sync,
    FR: Fn(String) + 'static + Clone + Send + Sync,
    FC: Fn(()) + 'static + Clone + Send + Sync,
{
    let (favorites_only, set_favorites_only) = signal(false);

    let visible = move || {
        let only = favorites_only.get();
        results
            .get()
            .into_iter()
            .filter(|r| !only || r.is_favorite)
            .collect::<Vec<_>>()
    };

    view! {
        <section class="result-feed">
            <div class="feed-toolbar">
                <label class="select-pill">
                    <input
                        type="checkbox"
                        prop:checked=move || favorites_only.get()
                        on:change=move |ev| set_favorites_only.set(event_target_checked(&ev))
                    />
                    "只看收藏"
                </label>
                <span class="text-muted">{move || format!("{} 条", results.get().len())}</span>
                <button
                    class="btn btn-tertiary btn-small"
                    disabled=move || results.get().is_empty()
                    on:click=move |_| on_clear(())
                >
                    "清空"
                </button>
            </div>

            <Show
                when=move || !results.get().is_empty()
                fallback=|| view! { <p class="text-muted empty">"输入一个汉字，看看 AI 会联想到什么"</p> }
            >
                <div class="card-grid">
                    // 決着・お気に入りでキーが変わり、カードが描き直される
                    <For
                        each=visible
                        key=|r| (r.id.clone(), r.loading, r.is_favorite)
                        children={
                            let variant_name = variant_name.clone();
                            let on_favorite = on_favorite.clone();
                            let on_remove = on_remove.clone();
                            move |result: SearchResult| {
                                let name = variant_name(result.variant_id.clone());
                                view! {
                                    <ResultCard
                                        result=result
                                        variant_name=name
                                        on_favorite=on_favorite.clone()
                                        on_remove=on_remove.clone()
                                    />
                                }
                            }
                        }
                    />
                </div>
            </Show>
        </section>
    }
}
