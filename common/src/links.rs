//! 外部リンク生成（ネットワークアクセスなし）

/// 画像の代わりに検索ページURLが返ってきたとみなすドメイン
pub const DEFAULT_DENYLIST: &[&str] = &["google.com", "bing.com", "baidu.com"];

/// 来源ページが無いときの表示名
pub const DEFAULT_SOURCE_TITLE: &str = "来源页面";

fn encode(query: &str) -> String {
    urlencoding::encode(query).into_owned()
}

/// Google画像検索
pub fn google_image_search_url(query: &str) -> String {
    format!("https://www.google.com/search?tbm=isch&q={}", encode(query))
}

/// Bing画像検索
pub fn bing_image_search_url(query: &str) -> String {
    format!("https://www.bing.com/images/search?q={}", encode(query))
}

/// 来源ページが無いときのWeb検索
pub fn web_search_url(query: &str) -> String {
    format!("https://www.google.com/search?q={}", encode(query))
}

/// 検索結果ページか（大文字小文字を区別しない部分一致）
pub fn is_search_page<S: AsRef<str>>(url: &str, denylist: &[S]) -> bool {
    let url = url.to_lowercase();
    denylist
        .iter()
        .any(|domain| url.contains(&domain.as_ref().to_lowercase()))
}

/// 来源が具体的なページか（Google検索ページは除く）
pub fn has_specific_source(source_url: Option<&str>) -> bool {
    source_url.is_some_and(|url| !url.trim().is_empty() && !url.contains("google.com/search"))
}

/// 検索クエリが無いときの既定値
pub fn default_fallback_query(query: &str, variant_name: &str) -> String {
    format!("{} {} illustration", query, variant_name)
}
