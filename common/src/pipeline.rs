//! 連想リクエストパイプライン
//!
//! 入力1件 → クエリ計画 → スケルトン一括挿入 → 全件並行でAI呼び出し →
//! 決着した順にidで該当カードだけを更新する。
//!
//! 並行数の上限・キュー・リトライ・キャンセル・タイムアウトは持たない。

use crate::error::Result;
use crate::feed::DEFAULT_CAPACITY;
use crate::links::{self, DEFAULT_DENYLIST, DEFAULT_SOURCE_TITLE};
use crate::parser::AssociationPayload;
use crate::types::{FilterSettings, ResultPatch, SearchResult, Variant};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};

/// 連想ロジックが無いときのラベル
pub const FREE_ASSOCIATION_LABEL: &str = "自由联想";

/// 容量と拒否ドメイン（調整用のポリシー値）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePolicy {
    pub capacity: usize,
    pub denylist: Vec<String>,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            denylist: DEFAULT_DENYLIST.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// 外部AIへの1リクエスト分
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRequest {
    pub query: String,
    pub variant: Variant,
    pub filters: FilterSettings,
    pub api_key: Option<String>,
}

/// 連想を返す外部AI
///
/// ブラウザのfetchはSendでないため`?Send`
#[async_trait(?Send)]
pub trait AssociationProvider {
    async fn associate(&self, request: &AssociationRequest) -> Result<AssociationPayload>;
}

/// 入力 → クエリ列
///
/// 空白のみなら空。2文字以上なら語全体を先頭に追加する。
///
/// # Examples
/// ```
/// use hieroglyph_common::plan_queries;
///
/// assert_eq!(plan_queries(" 中国 "), vec!["中国", "中", "国"]);
/// assert_eq!(plan_queries("德"), vec!["德"]);
/// assert!(plan_queries("  ").is_empty());
/// ```
pub fn plan_queries(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chars: Vec<String> = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(String::from)
        .collect();

    if chars.len() > 1 {
        std::iter::once(trimmed.to_string()).chain(chars).collect()
    } else {
        chars
    }
}

/// 1回の送信で生成されるスケルトン群
#[derive(Debug, Clone)]
pub struct Batch {
    skeletons: Vec<SearchResult>,
    requests: Vec<(String, AssociationRequest)>,
}

impl Batch {
    /// クエリごとにスケルトンとリクエストを作る。クエリが無ければ`None`
    pub fn plan(
        input: &str,
        variant: &Variant,
        filters: &FilterSettings,
        api_key: Option<String>,
    ) -> Option<Self> {
        let queries = plan_queries(input);
        if queries.is_empty() {
            return None;
        }

        let mut skeletons = Vec::with_capacity(queries.len());
        let mut requests = Vec::with_capacity(queries.len());
        for query in queries {
            let skeleton = SearchResult::skeleton(&query, &variant.id);
            requests.push((
                skeleton.id.clone(),
                AssociationRequest {
                    query,
                    variant: variant.clone(),
                    filters: filters.clone(),
                    api_key: api_key.clone(),
                },
            ));
            skeletons.push(skeleton);
        }

        Some(Self {
            skeletons,
            requests,
        })
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn skeletons(&self) -> &[SearchResult] {
        &self.skeletons
    }

    pub fn result_ids(&self) -> impl Iterator<Item = &str> {
        self.requests.iter().map(|(id, _)| id.as_str())
    }

    pub fn requests(&self) -> &[(String, AssociationRequest)] {
        &self.requests
    }
}

/// 成功ペイロード → カードのパッチ
pub fn compose_patch<S: AsRef<str>>(
    request: &AssociationRequest,
    payload: &AssociationPayload,
    denylist: &[S],
) -> ResultPatch {
    let logic = if payload.association_logic.is_empty() {
        FREE_ASSOCIATION_LABEL
    } else {
        payload.association_logic.as_str()
    };
    let explanation = format!("{} (思路: {})", payload.explanation, logic);

    let fallback_query = if payload.search_query.is_empty() {
        links::default_fallback_query(&request.query, &request.variant.name)
    } else {
        payload.search_query.clone()
    };

    let image_url = Some(payload.image_url.trim())
        .filter(|url| !url.is_empty() && !links::is_search_page(url, denylist))
        .map(String::from);

    let source_url = if payload.source_page_url.is_empty() {
        links::web_search_url(&fallback_query)
    } else {
        payload.source_page_url.clone()
    };

    let source_title = if payload.visual_subject.is_empty() {
        DEFAULT_SOURCE_TITLE.to_string()
    } else {
        payload.visual_subject.clone()
    };

    ResultPatch {
        image_url,
        fallback_query: Some(fallback_query),
        explanation: Some(explanation),
        source_title: Some(source_title),
        source_url: Some(source_url),
        loading: Some(false),
        error: None,
    }
}

/// バッチの全リクエストを並行に実行
///
/// 決着した順に `on_settled(result_id, patch)` を呼ぶ。呼び出しは全て
/// 呼び出し元と同じタスク上で直列に行われる。1件の失敗は他に影響しない。
pub async fn dispatch_batch<P, S, F>(provider: &P, batch: &Batch, denylist: &[S], mut on_settled: F)
where
    P: AssociationProvider + ?Sized,
    S: AsRef<str>,
    F: FnMut(&str, ResultPatch),
{
    tracing::debug!(items = batch.len(), "dispatching association batch");

    let mut pending: FuturesUnordered<_> = batch
        .requests()
        .iter()
        .map(|(id, request)| async move { (id.as_str(), request, provider.associate(request).await) })
        .collect();

    while let Some((id, request, outcome)) = pending.next().await {
        let patch = match outcome {
            Ok(payload) => {
                tracing::debug!(query = %request.query, "association settled");
                compose_patch(request, &payload, denylist)
            }
            Err(e) => {
                tracing::warn!(query = %request.query, error = %e, "association failed");
                ResultPatch::failure()
            }
        };
        on_settled(id, patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{ResultError, CONNECTION_ERROR_MESSAGE};
    use crate::variants::VariantRegistry;
    use futures::executor::block_on;
    use std::collections::HashMap;

    struct ScriptedProvider {
        replies: HashMap<String, AssociationPayload>,
    }

    #[async_trait(?Send)]
    impl AssociationProvider for ScriptedProvider {
        async fn associate(&self, request: &AssociationRequest) -> Result<AssociationPayload> {
            self.replies
                .get(&request.query)
                .cloned()
                .ok_or_else(|| Error::ProviderCall(format!("no reply for {}", request.query)))
        }
    }

    fn anime() -> Variant {
        VariantRegistry::default().resolve("anime").clone()
    }

    fn request(query: &str) -> AssociationRequest {
        AssociationRequest {
            query: query.to_string(),
            variant: anime(),
            filters: FilterSettings::default(),
            api_key: None,
        }
    }

    #[test]
    fn test_plan_queries_multi_char() {
        assert_eq!(plan_queries("汉字"), vec!["汉字", "汉", "字"]);
    }

    #[test]
    fn test_plan_queries_inner_whitespace() {
        assert_eq!(plan_queries("中 国"), vec!["中 国", "中", "国"]);
    }

    #[test]
    fn test_plan_queries_count() {
        for input in ["一", "一二", "一二三四五"] {
            let n = input.chars().count();
            let expected = if n >= 2 { n + 1 } else { 1 };
            assert_eq!(plan_queries(input).len(), expected);
        }
    }

    #[test]
    fn test_plan_queries_empty() {
        assert!(plan_queries("").is_empty());
        assert!(plan_queries(" \t\n ").is_empty());
    }

    #[test]
    fn test_batch_plan_skeletons() {
        let batch = Batch::plan("中国", &anime(), &FilterSettings::default(), Some("k".into()))
            .expect("batch");
        assert_eq!(batch.len(), 3);
        let queries: Vec<&str> = batch.skeletons().iter().map(|s| s.query.as_str()).collect();
        assert_eq!(queries, vec!["中国", "中", "国"]);
        assert!(batch.skeletons().iter().all(|s| s.loading && s.variant_id == "anime"));
        let ids: Vec<&str> = batch.result_ids().collect();
        assert_eq!(ids[0], batch.skeletons()[0].id);
        assert_eq!(batch.requests()[2].1.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_batch_plan_empty_input() {
        assert!(Batch::plan("   ", &anime(), &FilterSettings::default(), None).is_none());
    }

    #[test]
    fn test_compose_patch_link_out() {
        let payload = AssociationPayload {
            explanation: "德国血统的驾驶员".to_string(),
            association_logic: "德->德国->明日香".to_string(),
            search_query: "Asuka Langley Evangelion".to_string(),
            source_page_url: "https://example.wiki/asuka".to_string(),
            ..Default::default()
        };
        let patch = compose_patch(&request("德"), &payload, DEFAULT_DENYLIST);
        assert_eq!(patch.image_url, None);
        assert_eq!(patch.source_url.as_deref(), Some("https://example.wiki/asuka"));
        assert_eq!(patch.fallback_query.as_deref(), Some("Asuka Langley Evangelion"));
        assert_eq!(patch.source_title.as_deref(), Some(DEFAULT_SOURCE_TITLE));
        let explanation = patch.explanation.unwrap();
        assert!(explanation.contains("德国血统的驾驶员"));
        assert!(explanation.contains("德->德国->明日香"));
        assert_eq!(patch.loading, Some(false));
    }

    #[test]
    fn test_compose_patch_denylisted_image() {
        let payload = AssociationPayload {
            image_url: "https://www.bing.com/images/search?q=asuka".to_string(),
            ..Default::default()
        };
        let patch = compose_patch(&request("德"), &payload, DEFAULT_DENYLIST);
        assert_eq!(patch.image_url, None);
    }

    #[test]
    fn test_compose_patch_defaults() {
        let payload = AssociationPayload {
            explanation: "解释".to_string(),
            image_url: "https://upload.wikimedia.org/asuka.png".to_string(),
            ..Default::default()
        };
        let patch = compose_patch(&request("德"), &payload, DEFAULT_DENYLIST);
        assert_eq!(patch.image_url.as_deref(), Some("https://upload.wikimedia.org/asuka.png"));
        assert_eq!(patch.explanation.as_deref(), Some("解释 (思路: 自由联想)"));
        assert_eq!(patch.fallback_query.as_deref(), Some("德 日本动漫 illustration"));
        assert_eq!(
            patch.source_url.as_deref(),
            Some(links::web_search_url("德 日本动漫 illustration").as_str())
        );
    }

    #[test]
    fn test_compose_patch_boolean_urls_fall_back() {
        let payload = crate::parser::parse_association_response(
            r#"{"explanation": "x", "imageUrl": false, "sourcePageUrl": false}"#,
        )
        .unwrap();
        let patch = compose_patch(&request("德"), &payload, DEFAULT_DENYLIST);
        assert_eq!(patch.image_url, None);
        assert_eq!(
            patch.source_url.as_deref(),
            Some(links::web_search_url("德 日本动漫 illustration").as_str())
        );
    }

    #[test]
    fn test_dispatch_isolates_failures() {
        let mut replies = HashMap::new();
        replies.insert(
            "中".to_string(),
            AssociationPayload {
                explanation: "中间".to_string(),
                ..Default::default()
            },
        );
        let provider = ScriptedProvider { replies };
        let batch = Batch::plan("中国", &anime(), &FilterSettings::default(), None).unwrap();

        let mut feed = crate::feed::ResultFeed::default();
        feed.prepend_batch(batch.skeletons().to_vec());

        let mut settled = 0;
        block_on(dispatch_batch(&provider, &batch, DEFAULT_DENYLIST, |id, patch| {
            settled += 1;
            feed.update_by_id(id, &patch);
        }));
        assert_eq!(settled, 3);

        let items = feed.items();
        assert!(items.iter().all(|r| !r.loading));
        assert_eq!(items[1].query, "中");
        assert!(items[1].error.is_none());
        assert!(items[1].explanation.starts_with("中间"));
        for failed in [&items[0], &items[2]] {
            assert_eq!(failed.error, Some(ResultError::RetrievalFailed));
            assert_eq!(failed.explanation, CONNECTION_ERROR_MESSAGE);
            assert!(failed.image_url.is_none());
            assert!(failed.source_url.is_none());
        }
    }
}
