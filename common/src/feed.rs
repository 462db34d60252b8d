//! 結果フィード
//!
//! 新しい順、容量上限付き。容量を超えた分は末尾（最古）から捨てる

use crate::types::{ResultPatch, SearchResult};

/// デフォルト容量
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultFeed {
    items: Vec<SearchResult>,
    capacity: usize,
}

impl Default for ResultFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ResultFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// 永続化データから復元（容量超過分は切り捨て）
    pub fn with_items(mut items: Vec<SearchResult>, capacity: usize) -> Self {
        items.truncate(capacity);
        Self { items, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[SearchResult] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SearchResult> {
        self.items.iter().find(|r| r.id == id)
    }

    /// 順序を保ったまま先頭に挿入し、容量を超えた分を返す
    pub fn prepend_batch(&mut self, batch: Vec<SearchResult>) -> Vec<SearchResult> {
        let mut merged = batch;
        merged.append(&mut self.items);
        let evicted = if merged.len() > self.capacity {
            merged.split_off(self.capacity)
        } else {
            Vec::new()
        };
        self.items = merged;
        evicted
    }

    /// idが無ければ（追い出し済みなど）何もしない
    pub fn update_by_id(&mut self, id: &str, patch: &ResultPatch) -> bool {
        match self.items.iter_mut().find(|r| r.id == id) {
            Some(result) => {
                patch.apply_to(result);
                true
            }
            None => false,
        }
    }

    /// 反転後の値を返す
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let result = self.items.iter_mut().find(|r| r.id == id)?;
        result.is_favorite = !result.is_favorite;
        Some(result.is_favorite)
    }

    pub fn remove(&mut self, id: &str) -> Option<SearchResult> {
        let index = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn favorites(&self) -> impl Iterator<Item = &SearchResult> {
        self.items.iter().filter(|r| r.is_favorite)
    }
}
