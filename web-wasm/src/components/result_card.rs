//! 結果カード
//!
//! 直接画像があれば表示し、無ければ来源・画像検索へのリンクに切り替える

use hieroglyph_common::links::{bing_image_search_url, google_image_search_url, has_specific_source};
use hieroglyph_common::SearchResult;
use leptos::prelude::*;

#[component]
pub fn ResultCard<FF, FR>(
    result: SearchResult,
    variant_name: String,
    on_favorite: FF,
    on_remove: FR,
) -> impl IntoView
where
    FF: Fn(String) + 'static + Clone + Send + Sync,
    FR: Fn(String) + 'static + Clone + Send + Sync,
{
    let status_class = if result.loading {
        "loading"
    } else if result.error.is_some() {
        "error"
    } else {
        "done"
    };

    let body = if result.loading {
        view! {
            <div class="card-skeleton">
                <div class="skeleton-image"></div>
                <p class="text-muted">"AI 正在联想…"</p>
            </div>
        }
        .into_any()
    } else if result.error.is_some() {
        view! {
            <div class="card-error">
                <p>{result.explanation.clone()}</p>
            </div>
        }
        .into_any()
    } else {
        let query = result.link_query().to_string();
        let title = result
            .source_title
            .clone()
            .unwrap_or_else(|| hieroglyph_common::links::DEFAULT_SOURCE_TITLE.to_string());
        let source = result
            .source_url
            .clone()
            .filter(|url| has_specific_source(Some(url.as_str())));

        // 直リンクが画像として読めなかった場合もリンク表示に切り替える
        let (img_error, set_img_error) = signal(false);
        let card = result.clone();
        let visual = {
            let title = title.clone();
            let query = query.clone();
            move || match card.visible_image(img_error.get()).map(String::from) {
                Some(url) => view! {
                    <img
                        class="card-image"
                        src=url
                        alt=title.clone()
                        loading="lazy"
                        referrerpolicy="no-referrer"
                        on:error=move |_| set_img_error.set(true)
                    />
                }
                .into_any(),
                None => view! {
                    <div class="card-fallback">
                        <p class="fallback-query">{query.clone()}</p>
                        <p class="text-muted">"未找到直链图片，去搜索看看"</p>
                    </div>
                }
                .into_any(),
            }
        };

        view! {
            <div class="card-content">
                {visual}
                <p class="explanation">{result.explanation.clone()}</p>
                <div class="card-links">
                    {source.map(|url| view! {
                        <a href=url target="_blank" rel="noopener noreferrer">{format!("来源: {}", title)}</a>
                    })}
                    <a href=google_image_search_url(&query) target="_blank" rel="noopener noreferrer">
                        "Google 图片"
                    </a>
                    <a href=bing_image_search_url(&query) target="_blank" rel="noopener noreferrer">
                        "Bing 图片"
                    </a>
                </div>
            </div>
        }
        .into_any()
    };

    let favorite_id = result.id.clone();
    let remove_id = result.id.clone();

    view! {
        <div class=format!("result-card {}", status_class)>
            <div class="card-header">
                <span class="card-char">{result.character.clone()}</span>
                <span class="variant-badge">{variant_name}</span>
                <button
                    class="btn btn-small favorite"
                    class:active=result.is_favorite
                    on:click=move |_| on_favorite(favorite_id.clone())
                >
                    {if result.is_favorite { "★" } else { "☆" }}
                </button>
                <button
                    class="btn btn-small btn-tertiary"
                    on:click=move |_| on_remove(remove_id.clone())
                >
                    "✕"
                </button>
            </div>
            {body}
        </div>
    }
}
