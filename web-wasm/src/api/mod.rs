pub mod gemini;

pub use gemini::FetchGemini;
