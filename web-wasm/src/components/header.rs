//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header<F>(dark: ReadSignal<bool>, on_toggle_theme: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone + Send + Sync,
{
    view! {
        <header class="header">
            <h1>"Hieroglyph · 汉字视觉联想"</h1>
            <button
                class="btn btn-tertiary btn-small theme-toggle"
                on:click=move |_| on_toggle_theme(())
            >
                {move || if dark.get() { "☀ 浅色" } else { "☾ 墨色" }}
            </button>
        </header>
    }
}
