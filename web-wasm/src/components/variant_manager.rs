//! バリアント管理コンポーネント
//!
//! 一覧から選択、カスタムバリアントの作成・編集・削除

use hieroglyph_common::{Variant, VariantDraft};
use leptos::prelude::*;

#[component]
pub fn VariantManager<FS, FC, FE, FD>(
    variants: Memo<Vec<Variant>>,
    active_id: Memo<String>,
    on_select: FS,
    on_create: FC,
    on_edit: FE,
    on_delete: FD,
) -> impl IntoView
where
    FS: Fn(String) + 'static + Clone + Send + Sync,
    FC: Fn(VariantDraft) + 'static + Clone + Send + Sync,
    FE: Fn((String, VariantDraft)) + 'static + Clone + Send + Sync,
    FD: Fn(String) + 'static + Clone + Send + Sync,
{
    // None: 閉じている / Some(None): 新規 / Some(Some(id)): 編集
    let (editing, set_editing) = signal(None::<Option<String>>);
    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (keywords, set_keywords) = signal(String::new());

    let open_form = move |variant: Option<&Variant>| {
        let draft = variant.map(VariantDraft::from_variant).unwrap_or_default();
        set_name.set(draft.name);
        set_description.set(draft.description);
        set_keywords.set(draft.keywords);
        set_editing.set(Some(variant.map(|v| v.id.clone())));
    };

    let on_submit = move |_: leptos::ev::MouseEvent| {
        let draft = VariantDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
            keywords: keywords.get_untracked(),
        };
        match editing.get_untracked() {
            Some(Some(id)) => on_edit((id, draft)),
            Some(None) => on_create(draft),
            None => return,
        }
        set_editing.set(None);
    };

    let active_variant = move || {
        let id = active_id.get();
        variants.get().into_iter().find(|v| v.id == id)
    };

    view! {
        <div class="settings-panel variant-manager">
            <h3>"联想领域"</h3>
            <div class="variant-list">
                <For
                    each=move || variants.get()
                    key=|variant| (variant.id.clone(), variant.name.clone())
                    children=move |variant| {
                        let on_select = on_select.clone();
                        let id = variant.id.clone();
                        let is_active = {
                            let id = id.clone();
                            move || active_id.get() == id
                        };
                        view! {
                            <button
                                class="variant-chip"
                                class:active=is_active
                                class:custom=variant.is_custom
                                title=variant.description.clone()
                                on:click=move |_| on_select(id.clone())
                            >
                                {variant.name.clone()}
                            </button>
                        }
                    }
                />
                <button class="variant-chip add" on:click=move |_| open_form(None)>
                    "+ 自定义"
                </button>
            </div>

            {move || {
                active_variant().map(|variant| {
                    let on_delete = on_delete.clone();
                    let id = variant.id.clone();
                    let editable = variant.clone();
                    let is_custom = variant.is_custom;
                    view! {
                        <div class="variant-detail">
                            <p class="text-muted">{variant.description.clone()}</p>
                            <p class="keywords">{variant.keywords.join(" · ")}</p>
                            <Show when=move || is_custom>
                                <div class="api-actions">
                                    <button
                                        class="btn btn-secondary btn-small"
                                        on:click={
                                            let editable = editable.clone();
                                            move |_| open_form(Some(&editable))
                                        }
                                    >
                                        "编辑"
                                    </button>
                                    <button
                                        class="btn btn-tertiary btn-small"
                                        on:click={
                                            let on_delete = on_delete.clone();
                                            let id = id.clone();
                                            move |_| on_delete(id.clone())
                                        }
                                    >
                                        "删除"
                                    </button>
                                </div>
                            </Show>
                        </div>
                    }
                })
            }}

            <Show when=move || editing.get().is_some()>
                <div class="variant-form">
                    <input
                        type="text"
                        placeholder="名称（必填）"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="描述"
                        prop:value=move || description.get()
                        on:input=move |ev| set_description.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        placeholder="关键词，用逗号或空格分隔（必填）"
                        prop:value=move || keywords.get()
                        on:input=move |ev| set_keywords.set(event_target_value(&ev))
                    />
                    <div class="api-actions">
                        <button
                            class="btn btn-primary btn-small"
                            disabled=move || name.get().trim().is_empty() || keywords.get().trim().is_empty()
                            on:click=on_submit.clone()
                        >
                            {move || if matches!(editing.get(), Some(Some(_))) { "保存" } else { "创建" }}
                        </button>
                        <button
                            class="btn btn-tertiary btn-small"
                            on:click=move |_| set_editing.set(None)
                        >
                            "取消"
                        </button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
