//! アプリケーション状態コンテナ
//!
//! バリアント・フィルタ・APIキー・結果フィードを1か所で所有し、
//! 変更のたびに該当スライスだけをストアへ書き込む。
//! CLIはそのまま、Webはシグナルに包んでビューへ渡す。

use crate::feed::ResultFeed;
use crate::pipeline::{dispatch_batch, AssociationProvider, Batch, PipelinePolicy};
use crate::store::{keys, KeyValueStore, StoreAdapter};
use crate::types::{FilterSettings, ResultPatch, SearchResult, Variant};
use crate::variants::{VariantDraft, VariantRegistry};

/// APIキーの保持と解決
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeyHolder {
    persisted: Option<String>,
    build_default: Option<String>,
}

impl ApiKeyHolder {
    pub fn new(persisted: Option<String>, build_default: Option<String>) -> Self {
        Self {
            persisted: non_empty(persisted),
            build_default: non_empty(build_default),
        }
    }

    pub fn persisted(&self) -> Option<&str> {
        self.persisted.as_deref()
    }

    /// 実行時 → 保存済み → ビルド時既定 の順に解決
    pub fn resolve(&self, runtime: Option<&str>) -> Option<String> {
        non_empty(runtime.map(String::from))
            .or_else(|| self.persisted.clone())
            .or_else(|| self.build_default.clone())
    }

    fn set(&mut self, key: &str) {
        self.persisted = non_empty(Some(key.to_string()));
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 状態コンテナ
#[derive(Debug)]
pub struct Workspace<S> {
    store: StoreAdapter<S>,
    variants: VariantRegistry,
    filters: FilterSettings,
    api_key: ApiKeyHolder,
    feed: ResultFeed,
    policy: PipelinePolicy,
    pending_batches: usize,
}

impl<S: KeyValueStore> Workspace<S> {
    /// ストアから全スライスを読み込む（欠損・破損は既定値）
    pub fn load(store: S, policy: PipelinePolicy, default_key: Option<String>) -> Self {
        let store = StoreAdapter::new(store);

        let custom: Vec<Variant> = store.load_json(keys::CUSTOM_VARIANTS).unwrap_or_default();
        let active = store.load_string(keys::ACTIVE_VARIANT);
        let filters = store.load_json(keys::FILTERS).unwrap_or_default();
        let results: Vec<SearchResult> = store.load_json(keys::RESULTS).unwrap_or_default();
        let api_key = ApiKeyHolder::new(store.load_string(keys::API_KEY), default_key);

        tracing::debug!(
            custom = custom.len(),
            results = results.len(),
            "workspace loaded"
        );

        Self {
            variants: VariantRegistry::new(custom, active),
            filters,
            api_key,
            feed: ResultFeed::with_items(results, policy.capacity),
            policy,
            pending_batches: 0,
            store,
        }
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    pub fn variants(&self) -> &VariantRegistry {
        &self.variants
    }

    pub fn filters(&self) -> &FilterSettings {
        &self.filters
    }

    pub fn api_key(&self) -> &ApiKeyHolder {
        &self.api_key
    }

    pub fn feed(&self) -> &ResultFeed {
        &self.feed
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    /// 未決着のバッチがあるか
    pub fn is_loading(&self) -> bool {
        self.pending_batches > 0
    }

    // ---- バリアント ----

    pub fn select_variant(&mut self, id: &str) -> bool {
        let selected = self.variants.select(id);
        if selected {
            self.persist_active();
        }
        selected
    }

    /// 作成して選択する
    pub fn create_variant(&mut self, draft: &VariantDraft) -> Option<Variant> {
        let variant = self.variants.create(draft)?;
        self.variants.select(&variant.id);
        self.persist_custom();
        self.persist_active();
        Some(variant)
    }

    pub fn edit_variant(&mut self, id: &str, draft: &VariantDraft) -> bool {
        let edited = self.variants.edit(id, draft);
        if edited {
            self.persist_custom();
        }
        edited
    }

    pub fn delete_variant(&mut self, id: &str) -> bool {
        let deleted = self.variants.delete(id);
        if deleted {
            self.persist_custom();
            self.persist_active();
        }
        deleted
    }

    // ---- 設定 ----

    /// フィルタは丸ごと置き換え
    pub fn replace_filters(&mut self, filters: FilterSettings) {
        self.filters = filters;
        self.store.save_json(keys::FILTERS, &self.filters);
    }

    /// 空文字ならキーを消去
    pub fn set_api_key(&mut self, key: &str) {
        self.api_key.set(key);
        match self.api_key.persisted() {
            Some(key) => self.store.save_string(keys::API_KEY, key),
            None => self.store.remove(keys::API_KEY),
        }
    }

    // ---- フィード ----

    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let flipped = self.feed.toggle_favorite(id);
        if flipped.is_some() {
            self.persist_feed();
        }
        flipped
    }

    pub fn remove_result(&mut self, id: &str) -> Option<SearchResult> {
        let removed = self.feed.remove(id);
        if removed.is_some() {
            self.persist_feed();
        }
        removed
    }

    pub fn clear_results(&mut self) {
        self.feed.clear();
        self.store.remove(keys::RESULTS);
    }

    // ---- パイプライン ----

    /// 入力を計画し、スケルトンをフィード先頭に挿入する
    ///
    /// 空入力は`None`で、ローディング状態も変えない。
    /// 返したバッチは`dispatch_batch`で実行し、最後に`finish_batch`を呼ぶこと。
    pub fn submit(&mut self, input: &str, runtime_key: Option<&str>) -> Option<Batch> {
        let batch = Batch::plan(
            input,
            self.variants.active(),
            &self.filters,
            self.api_key.resolve(runtime_key),
        )?;

        let evicted = self.feed.prepend_batch(batch.skeletons().to_vec());
        if !evicted.is_empty() {
            tracing::debug!(evicted = evicted.len(), "feed capacity reached");
        }
        self.pending_batches += 1;
        self.persist_feed();
        Some(batch)
    }

    /// 決着した1件を反映。対象が既に無ければ何もしない
    pub fn apply_settlement(&mut self, id: &str, patch: &ResultPatch) -> bool {
        let updated = self.feed.update_by_id(id, patch);
        if updated {
            self.persist_feed();
        } else {
            tracing::debug!(id, "settled record no longer in feed");
        }
        updated
    }

    /// バッチ内の全件が決着した
    pub fn finish_batch(&mut self) {
        self.pending_batches = self.pending_batches.saturating_sub(1);
    }

    /// submit → 並行実行 → finish を一続きで行う
    pub async fn search<P>(
        &mut self,
        provider: &P,
        input: &str,
        runtime_key: Option<&str>,
    ) -> Option<Batch>
    where
        P: AssociationProvider + ?Sized,
    {
        let batch = self.submit(input, runtime_key)?;
        let denylist = self.policy.denylist.clone();
        dispatch_batch(provider, &batch, &denylist, |id, patch| {
            self.apply_settlement(id, &patch);
        })
        .await;
        self.finish_batch();
        Some(batch)
    }

    fn persist_feed(&self) {
        self.store.save_json(keys::RESULTS, self.feed.items());
    }

    fn persist_custom(&self) {
        self.store.save_json(keys::CUSTOM_VARIANTS, self.variants.custom());
    }

    fn persist_active(&self) {
        self.store
            .save_string(keys::ACTIVE_VARIANT, self.variants.active_id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::parser::AssociationPayload;
    use crate::pipeline::AssociationRequest;
    use crate::store::MemoryStore;
    use crate::types::{FilterStyle, ResultError, CONNECTION_ERROR_MESSAGE};
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// 受け取ったリクエストを記録し、固定の応答を返す
    struct MockProvider {
        reply: Option<AssociationPayload>,
        seen: RefCell<Vec<AssociationRequest>>,
    }

    impl MockProvider {
        fn replying(payload: AssociationPayload) -> Self {
            Self {
                reply: Some(payload),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn rejecting() -> Self {
            Self {
                reply: None,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl AssociationProvider for MockProvider {
        async fn associate(&self, request: &AssociationRequest) -> Result<AssociationPayload> {
            self.seen.borrow_mut().push(request.clone());
            self.reply
                .clone()
                .ok_or_else(|| Error::ProviderCall("connection refused".into()))
        }
    }

    fn workspace() -> Workspace<MemoryStore> {
        Workspace::load(MemoryStore::new(), PipelinePolicy::default(), None)
    }

    fn asuka() -> AssociationPayload {
        AssociationPayload {
            association_logic: "德->德国->明日香".to_string(),
            visual_subject: "惣流·明日香·兰格雷".to_string(),
            search_query: "Asuka Langley Evangelion".to_string(),
            explanation: "德国血统的 EVA 驾驶员".to_string(),
            source_page_url: "https://example.wiki/asuka".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_submit_inserts_n_plus_one() {
        let mut ws = workspace();
        let batch = ws.submit("汉字谜", None).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(ws.feed().len(), 4);
        assert!(ws.is_loading());
        assert_eq!(ws.feed().items()[0].query, "汉字谜");
        ws.finish_batch();
        assert!(!ws.is_loading());
    }

    #[test]
    fn test_submit_empty_input() {
        let mut ws = workspace();
        assert!(ws.submit("   ", None).is_none());
        assert!(ws.feed().is_empty());
        assert!(!ws.is_loading());
    }

    #[test]
    fn test_loading_until_all_batches_settle() {
        let mut ws = workspace();
        ws.submit("一", None).unwrap();
        ws.submit("二", None).unwrap();
        ws.finish_batch();
        assert!(ws.is_loading());
        ws.finish_batch();
        assert!(!ws.is_loading());
    }

    #[test]
    fn test_capacity_bound() {
        let policy = PipelinePolicy {
            capacity: 5,
            ..Default::default()
        };
        let mut ws = Workspace::load(MemoryStore::new(), policy, None);
        let first = ws.submit("一二", None).unwrap();
        ws.submit("三四五", None).unwrap();
        assert_eq!(ws.feed().len(), 5);
        // 最初のバッチの末尾2件が押し出された
        let evicted: Vec<&str> = first.result_ids().skip(1).collect();
        for id in evicted {
            assert!(ws.feed().get(id).is_none());
            assert!(!ws.apply_settlement(id, &ResultPatch::failure()));
        }
    }

    #[test]
    fn test_anime_scenario() {
        let mut ws = workspace();
        assert!(ws.select_variant("anime"));
        let provider = MockProvider::replying(asuka());

        let batch = block_on(ws.search(&provider, "德", Some("key"))).unwrap();
        assert!(!ws.is_loading());

        let seen = provider.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].variant.keywords.iter().any(|k| k == "二次元"));
        assert_eq!(seen[0].api_key.as_deref(), Some("key"));

        let id = batch.result_ids().next().unwrap();
        let record = ws.feed().get(id).unwrap();
        assert!(!record.loading);
        assert!(record.error.is_none());
        assert_eq!(record.image_url, None);
        assert_eq!(record.source_url.as_deref(), Some("https://example.wiki/asuka"));
        assert_eq!(record.variant_id, "anime");
        assert!(record.explanation.contains("德国血统的 EVA 驾驶员"));
        assert!(record.explanation.contains("德->德国->明日香"));
    }

    #[test]
    fn test_denylisted_image_dropped() {
        let mut ws = workspace();
        let provider = MockProvider::replying(AssociationPayload {
            image_url: "https://www.google.com/imgres?imgurl=x".to_string(),
            ..asuka()
        });
        let batch = block_on(ws.search(&provider, "德", Some("key"))).unwrap();
        let id = batch.result_ids().next().unwrap();
        assert_eq!(ws.feed().get(id).unwrap().image_url, None);
    }

    #[test]
    fn test_provider_rejection() {
        let mut ws = workspace();
        let provider = MockProvider::rejecting();
        block_on(ws.search(&provider, "中国", None));

        assert_eq!(ws.feed().len(), 3);
        for record in ws.feed().items() {
            assert!(!record.loading);
            assert_eq!(record.error, Some(ResultError::RetrievalFailed));
            assert_eq!(record.explanation, CONNECTION_ERROR_MESSAGE);
            assert!(record.image_url.is_none());
            assert!(record.source_url.is_none());
        }
        assert!(!ws.is_loading());
    }

    #[test]
    fn test_feed_persists_across_reload() {
        let mut ws = workspace();
        let provider = MockProvider::replying(asuka());
        block_on(ws.search(&provider, "德国", Some("key")));
        let id = ws.feed().items()[1].id.clone();
        assert_eq!(ws.toggle_favorite(&id), Some(true));
        let before = ws.feed().items().to_vec();

        let reloaded = Workspace::load(ws.store.into_inner(), PipelinePolicy::default(), None);
        assert_eq!(reloaded.feed().items(), before.as_slice());
    }

    #[test]
    fn test_corrupt_feed_loads_empty() {
        let store = MemoryStore::new();
        store.set(keys::RESULTS, "{{{").unwrap();
        store.set(keys::FILTERS, "[]").unwrap();
        let ws = Workspace::load(store, PipelinePolicy::default(), None);
        assert!(ws.feed().is_empty());
        assert_eq!(ws.filters(), &FilterSettings::default());
    }

    #[test]
    fn test_unavailable_store_still_works() {
        let mut ws = Workspace::load(MemoryStore::unavailable(), PipelinePolicy::default(), None);
        let provider = MockProvider::rejecting();
        block_on(ws.search(&provider, "火", None));
        assert_eq!(ws.feed().len(), 1);
        ws.set_api_key("k");
        assert_eq!(ws.api_key().resolve(None).as_deref(), Some("k"));
    }

    #[test]
    fn test_delete_active_custom_variant() {
        let mut ws = workspace();
        let created = ws
            .create_variant(&VariantDraft::new("咖啡", "咖啡文化", "拿铁，手冲 豆子"))
            .unwrap();
        assert_eq!(ws.variants().active_id(), created.id);
        assert_eq!(created.keywords, vec!["拿铁", "手冲", "豆子"]);

        assert!(ws.delete_variant(&created.id));
        assert_eq!(ws.variants().active_id(), "daily");

        let reloaded = Workspace::load(ws.store.into_inner(), PipelinePolicy::default(), None);
        assert!(reloaded.variants().custom().is_empty());
        assert_eq!(reloaded.variants().active_id(), "daily");
    }

    #[test]
    fn test_custom_variant_and_filters_persist() {
        let mut ws = workspace();
        let created = ws
            .create_variant(&VariantDraft::new("咖啡", "", "拿铁"))
            .unwrap();
        assert!(ws.edit_variant(&created.id, &VariantDraft::new("咖啡馆", "店", "拿铁, 摩卡")));
        assert!(!ws.edit_variant("daily", &VariantDraft::new("x", "", "y")));
        ws.replace_filters(FilterSettings {
            style: FilterStyle::Photo,
            allow_homophone: false,
            ..Default::default()
        });

        let reloaded = Workspace::load(ws.store.into_inner(), PipelinePolicy::default(), None);
        let variant = reloaded.variants().active();
        assert_eq!(variant.name, "咖啡馆");
        assert_eq!(variant.keywords, vec!["拿铁", "摩卡"]);
        assert_eq!(reloaded.filters().style, FilterStyle::Photo);
        assert!(!reloaded.filters().allow_homophone);
    }

    #[test]
    fn test_select_unknown_variant_rejected() {
        let mut ws = workspace();
        assert!(!ws.select_variant("nope"));
        assert_eq!(ws.variants().active_id(), "daily");
    }

    #[test]
    fn test_api_key_resolution_order() {
        let mut ws = Workspace::load(
            MemoryStore::new(),
            PipelinePolicy::default(),
            Some("build".to_string()),
        );
        assert_eq!(ws.api_key().resolve(None).as_deref(), Some("build"));
        ws.set_api_key("stored");
        assert_eq!(ws.api_key().resolve(None).as_deref(), Some("stored"));
        assert_eq!(ws.api_key().resolve(Some("runtime")).as_deref(), Some("runtime"));
        assert_eq!(ws.api_key().resolve(Some("  ")).as_deref(), Some("stored"));

        ws.set_api_key("");
        assert_eq!(ws.store().get(keys::API_KEY).unwrap(), None);
        assert_eq!(ws.api_key().resolve(None).as_deref(), Some("build"));
    }

    #[test]
    fn test_clear_results_removes_stored_feed() {
        let mut ws = workspace();
        ws.submit("火", None);
        assert!(ws.store().get(keys::RESULTS).unwrap().is_some());
        ws.clear_results();
        assert!(ws.feed().is_empty());
        assert_eq!(ws.store().get(keys::RESULTS).unwrap(), None);
    }
}
