//! Hieroglyph CLI
//!
//! ファイルストア・reqwest製Geminiクライアント・端末表示

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod render;
pub mod store;
