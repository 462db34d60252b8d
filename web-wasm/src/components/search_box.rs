//! 検索入力コンポーネント

use leptos::prelude::*;

#[component]
pub fn SearchBox<F>(
    input: ReadSignal<String>,
    set_input: WriteSignal<String>,
    is_loading: Signal<bool>,
    on_search: F,
) -> impl IntoView
where
    F: Fn(String) + 'static + Clone + Send + Sync,
{
    let submit = move || {
        let text = input.get_untracked();
        if !text.trim().is_empty() {
            on_search(text);
        }
    };
    let submit_on_enter = submit.clone();

    view! {
        <div class="search-box">
            <input
                type="text"
                class="search-input"
                placeholder="输入汉字，例如：德、火、中国"
                prop:value=move || input.get()
                on:input=move |ev| {
                    set_input.set(event_target_value(&ev));
                }
                on:keydown=move |ev| {
                    if ev.key() == "Enter" && !ev.is_composing() {
                        submit_on_enter();
                    }
                }
            />
            <button
                class="btn btn-primary"
                disabled=move || input.get().trim().is_empty()
                on:click=move |_| submit()
            >
                "联想"
            </button>
            <Show when=move || is_loading.get()>
                <span class="loading-indicator">"联想中…"</span>
            </Show>
        </div>
    }
}
