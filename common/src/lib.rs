//! Hieroglyph Common Library
//!
//! CLIとWeb(WASM)で共有される型・レジストリ・連想パイプライン

pub mod error;
pub mod feed;
pub mod gemini;
pub mod links;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod types;
pub mod variants;
pub mod workspace;

pub use error::{Error, Result};
pub use feed::{ResultFeed, DEFAULT_CAPACITY};
pub use links::{bing_image_search_url, google_image_search_url, has_specific_source, web_search_url};
pub use parser::{extract_json_object, parse_association_response, AssociationPayload};
pub use pipeline::{
    compose_patch, dispatch_batch, plan_queries, AssociationProvider, AssociationRequest, Batch,
    PipelinePolicy,
};
pub use prompts::{build_association_prompt, SYSTEM_INSTRUCTION};
pub use store::{keys, KeyValueStore, MemoryStore, StoreAdapter};
pub use types::{
    FilterSettings, FilterStyle, FilterSubject, ResultError, ResultPatch, SearchResult, Variant,
    CONNECTION_ERROR_MESSAGE,
};
pub use variants::{builtin_variants, parse_keywords, VariantDraft, VariantRegistry, DEFAULT_VARIANT_ID};
pub use workspace::{ApiKeyHolder, Workspace};
