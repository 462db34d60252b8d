//! フィルタ設定パネル（APIキー入力を含む）

use hieroglyph_common::{FilterSettings, FilterStyle, FilterSubject};
use leptos::prelude::*;

#[component]
pub fn FilterPanel<FC, FK>(
    filters: Memo<FilterSettings>,
    has_api_key: Signal<bool>,
    on_change: FC,
    on_save_api_key: FK,
) -> impl IntoView
where
    FC: Fn(FilterSettings) + 'static + Clone + Send + Sync,
    FK: Fn(String) + 'static + Clone + Send + Sync,
{
    let (api_key_input, set_api_key_input) = signal(String::new());

    // 1項目を書き換えて丸ごと置き換える
    let replace_with = move |edit: &dyn Fn(&mut FilterSettings)| {
        let mut next = filters.get_untracked();
        edit(&mut next);
        on_change(next);
    };
    let on_style = replace_with.clone();
    let on_subject = replace_with.clone();
    let on_homophone = replace_with.clone();
    let on_exclude = replace_with;

    let on_save = on_save_api_key.clone();
    let on_clear = on_save_api_key;

    view! {
        <div class="settings-panel filter-panel">
            <h3>"筛选"</h3>
            <div class="settings-grid">
                <div class="form-group">
                    <label for="filter-style">"风格"</label>
                    <select
                        id="filter-style"
                        on:change=move |ev| {
                            if let Ok(style) = event_target_value(&ev).parse::<FilterStyle>() {
                                on_style(&|f: &mut FilterSettings| f.style = style);
                            }
                        }
                    >
                        {FilterStyle::ALL
                            .iter()
                            .map(|style| {
                                let style = *style;
                                view! {
                                    <option
                                        value=style.label()
                                        selected=move || filters.get().style == style
                                    >
                                        {style.label()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="form-group">
                    <label for="filter-subject">"主体"</label>
                    <select
                        id="filter-subject"
                        on:change=move |ev| {
                            if let Ok(subject) = event_target_value(&ev).parse::<FilterSubject>() {
                                on_subject(&|f: &mut FilterSettings| f.subject = subject);
                            }
                        }
                    >
                        {FilterSubject::ALL
                            .iter()
                            .map(|subject| {
                                let subject = *subject;
                                view! {
                                    <option
                                        value=subject.label()
                                        selected=move || filters.get().subject == subject
                                    >
                                        {subject.label()}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                <div class="form-group checkbox-group">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || filters.get().allow_homophone
                            on:change=move |ev| {
                                let allowed = event_target_checked(&ev);
                                on_homophone(&|f: &mut FilterSettings| f.allow_homophone = allowed);
                            }
                        />
                        "允许谐音 / 字形联想"
                    </label>
                </div>

                <div class="form-group">
                    <label for="filter-exclude">"排除内容"</label>
                    <input
                        type="text"
                        id="filter-exclude"
                        placeholder="例如：恐怖, 血腥"
                        prop:value=move || filters.get().exclude_content
                        on:change=move |ev| {
                            let text = event_target_value(&ev);
                            on_exclude(&|f: &mut FilterSettings| f.exclude_content = text.clone());
                        }
                    />
                </div>

                <div class="form-group">
                    <label for="api-key">"Gemini API Key"</label>
                    <input
                        type="password"
                        id="api-key"
                        placeholder="输入 API Key..."
                        prop:value=move || api_key_input.get()
                        on:input=move |ev| {
                            set_api_key_input.set(event_target_value(&ev));
                        }
                    />
                    <div class="api-actions">
                        <button
                            class="btn btn-primary btn-small"
                            on:click=move |_| {
                                on_save(api_key_input.get_untracked());
                                set_api_key_input.set(String::new());
                            }
                        >
                            "保存"
                        </button>
                        <button
                            class="btn btn-tertiary btn-small"
                            on:click=move |_| on_clear(String::new())
                        >
                            "删除"
                        </button>
                    </div>
                    <div class="api-key-status">
                        {move || if has_api_key.get() { "✔ 已设置" } else { "未设置" }}
                    </div>
                    <a
                        href="https://aistudio.google.com/app/apikey"
                        target="_blank"
                        rel="noopener noreferrer"
                        class="api-key-link"
                    >
                        "获取 API Key →"
                    </a>
                </div>
            </div>
        </div>
    }
}
