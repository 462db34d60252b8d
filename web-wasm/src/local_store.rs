//! localStorage ストア
//!
//! localStorageが使えない環境（プライベートモード等）では全操作が`Storage`エラーになり、
//! 上位のアダプタが握りつぶす。

use hieroglyph_common::{Error, KeyValueStore, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage(&self) -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| Error::Storage("localStorage unavailable".into()))
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> Error {
    Error::Storage(format!("{:?}", e))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_store_roundtrip() {
        let store = LocalStore;
        store.set("hieroglyph_test", "値").unwrap();
        assert_eq!(store.get("hieroglyph_test").unwrap().as_deref(), Some("値"));
        store.remove("hieroglyph_test").unwrap();
        assert_eq!(store.get("hieroglyph_test").unwrap(), None);
    }
}
