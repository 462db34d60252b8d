//! 端末出力
//!
//! 結果カード・バリアント・フィルタを文字列に整形する。出力自体は呼び出し側が行う。

use crate::error::{HieroglyphError, Result};
use hieroglyph_common::{
    bing_image_search_url, google_image_search_url, has_specific_source, FilterSettings,
    ResultFeed, SearchResult, Variant, VariantRegistry,
};

/// 一覧表示用の短縮ID
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// 先頭一致でIDを解決（一意でなければエラー）
pub fn resolve_result_id(feed: &ResultFeed, prefix: &str) -> Result<String> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(HieroglyphError::ResultNotFound(prefix.to_string()));
    }
    let mut matches = feed.items().iter().filter(|r| r.id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found.id.clone()),
        _ => Err(HieroglyphError::ResultNotFound(prefix.to_string())),
    }
}

/// 結果カード
pub fn card(result: &SearchResult, registry: &VariantRegistry) -> String {
    let star = if result.is_favorite { "★" } else { "☆" };
    let variant = registry.resolve(&result.variant_id);
    let mut out = format!(
        "{} [{}] {}  ({})\n",
        star,
        short_id(&result.id),
        result.character,
        variant.name
    );

    if result.loading {
        out.push_str("  … 联想中\n");
        return out;
    }

    if result.error.is_some() {
        out.push_str(&format!("  ✗ {}\n", result.explanation));
        return out;
    }

    out.push_str(&format!("  {}\n", result.explanation));
    if let Some(title) = &result.source_title {
        out.push_str(&format!("  主体: {}\n", title));
    }
    if result.has_image() {
        if let Some(url) = &result.image_url {
            out.push_str(&format!("  图片: {}\n", url));
        }
    } else {
        out.push_str(&format!("  搜索: {}\n", result.link_query()));
    }
    out
}

/// 外部リンク一覧
pub fn links(result: &SearchResult) -> String {
    let query = result.link_query();
    let mut out = String::new();
    if let Some(url) = result.image_url.as_deref().filter(|_| result.has_image()) {
        out.push_str(&format!("图片:        {}\n", url));
    }
    if has_specific_source(result.source_url.as_deref()) {
        if let Some(url) = &result.source_url {
            out.push_str(&format!("来源:        {}\n", url));
        }
    }
    out.push_str(&format!("Google 图片: {}\n", google_image_search_url(query)));
    out.push_str(&format!("Bing 图片:   {}\n", bing_image_search_url(query)));
    out
}

/// バリアント1行
pub fn variant_line(variant: &Variant, active: bool) -> String {
    let mark = if active { "▶" } else { " " };
    let kind = if variant.is_custom { "自定义" } else { "内置" };
    format!(
        "{} {:<24} {} [{}] {}",
        mark,
        variant.id,
        variant.name,
        kind,
        variant.keywords.join(", ")
    )
}

pub fn filters(settings: &FilterSettings) -> String {
    let exclude = if settings.exclude_content.trim().is_empty() {
        "无"
    } else {
        settings.exclude_content.trim()
    };
    format!(
        "风格:     {}\n主体:     {}\n谐音联想: {}\n排除内容: {}",
        settings.style,
        settings.subject,
        if settings.allow_homophone { "允许" } else { "禁止" },
        exclude
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hieroglyph_common::{ResultPatch, DEFAULT_CAPACITY};

    fn finished(query: &str) -> SearchResult {
        let mut result = SearchResult::skeleton(query, "anime");
        result.loading = false;
        result.explanation = "德国血统 (思路: 德->德国)".to_string();
        result.fallback_query = Some("Asuka Langley".to_string());
        result.source_url = Some("https://example.wiki/asuka".to_string());
        result
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_resolve_result_id_prefix() {
        let mut feed = ResultFeed::new(DEFAULT_CAPACITY);
        let mut a = finished("德");
        a.id = "aaaa1111".to_string();
        let mut b = finished("国");
        b.id = "aaab2222".to_string();
        feed.prepend_batch(vec![a, b]);

        assert_eq!(resolve_result_id(&feed, "aaaa").unwrap(), "aaaa1111");
        assert!(matches!(
            resolve_result_id(&feed, "aaa"),
            Err(HieroglyphError::ResultNotFound(_))
        ));
        assert!(resolve_result_id(&feed, "zzz").is_err());
        assert!(resolve_result_id(&feed, "").is_err());
    }

    #[test]
    fn test_card_link_out() {
        let registry = VariantRegistry::default();
        let text = card(&finished("德"), &registry);
        assert!(text.contains("日本动漫"));
        assert!(text.contains("搜索: Asuka Langley"));
        assert!(!text.contains("图片:"));
    }

    #[test]
    fn test_card_failure() {
        let registry = VariantRegistry::default();
        let mut result = SearchResult::skeleton("德", "daily");
        ResultPatch::failure().apply_to(&mut result);
        assert!(card(&result, &registry).contains("✗ AI Connection Error"));
    }

    #[test]
    fn test_links() {
        let text = links(&finished("德"));
        assert!(text.contains("来源:        https://example.wiki/asuka"));
        assert!(text.contains("tbm=isch&q=Asuka%20Langley"));
        assert!(text.contains("bing.com/images/search?q=Asuka%20Langley"));

        let mut generic = finished("德");
        generic.source_url = Some("https://www.google.com/search?q=x".to_string());
        assert!(!links(&generic).contains("来源"));
    }

    #[test]
    fn test_filters_text() {
        let text = filters(&FilterSettings::default());
        assert!(text.contains("所有"));
        assert!(text.contains("允许"));
        assert!(text.contains("无"));
    }
}
