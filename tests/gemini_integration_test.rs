use hieroglyph::config::Config;
use hieroglyph::gemini::GeminiClient;
use hieroglyph_common::{AssociationProvider, AssociationRequest, FilterSettings, VariantRegistry};

#[tokio::test]
async fn gemini_association_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let config = Config {
        timeout_seconds: 120,
        ..Default::default()
    };
    let client = GeminiClient::new(&config).expect("client build failed");

    let request = AssociationRequest {
        query: "德".to_string(),
        variant: VariantRegistry::default().resolve("anime").clone(),
        filters: FilterSettings::default(),
        api_key: Some(api_key),
    };

    let payload = client
        .associate(&request)
        .await
        .expect("failed to get association");
    assert!(!payload.explanation.is_empty());
    assert!(!payload.search_query.is_empty());
}
