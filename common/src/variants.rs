//! 連想バリアントレジストリ
//!
//! 内蔵バリアント（固定・順序付き）+ ユーザー定義バリアント（作成順）

use crate::types::Variant;
use std::collections::HashSet;

/// デフォルト（先頭の内蔵バリアント）
pub const DEFAULT_VARIANT_ID: &str = "daily";

struct Preset {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
}

const PRESETS: &[Preset] = &[
    Preset {
        id: "daily",
        name: "日常生活",
        description: "常见的物品、场景和概念",
        keywords: &["日常", "生活", "实物", "现实"],
    },
    Preset {
        id: "programmer",
        name: "程序员",
        description: "代码、极客文化、硬件、抽象逻辑",
        keywords: &["编程", "代码", "计算机", "黑客", "赛博朋克", "科技"],
    },
    Preset {
        id: "movie",
        name: "影视作品",
        description: "电影海报、经典镜头、演员",
        keywords: &["电影", "剧照", "名场面", "影视"],
    },
    Preset {
        id: "anime",
        name: "日本动漫",
        description: "二次元、漫画风格、经典角色",
        keywords: &["动漫", "二次元", "日本动画", "漫画"],
    },
    Preset {
        id: "game",
        name: "游戏世界",
        description: "电子游戏、像素风、游戏角色",
        keywords: &["游戏", "电子竞技", "像素", "3A大作", "RPG"],
    },
    Preset {
        id: "history",
        name: "历史文化",
        description: "古迹、文物、水墨画、书法",
        keywords: &["历史", "中国文化", "古风", "文物", "水墨"],
    },
];

/// 内蔵バリアント一覧
pub fn builtin_variants() -> Vec<Variant> {
    PRESETS
        .iter()
        .map(|p| Variant {
            id: p.id.to_string(),
            name: p.name.to_string(),
            description: p.description.to_string(),
            keywords: p.keywords.iter().map(|k| k.to_string()).collect(),
            is_custom: false,
        })
        .collect()
}

/// キーワード文字列を分割（半角/全角カンマ、空白）
///
/// # Examples
/// ```
/// use hieroglyph_common::parse_keywords;
///
/// let keywords = parse_keywords("红白机，像素, 8bit  复古");
/// assert_eq!(keywords, vec!["红白机", "像素", "8bit", "复古"]);
/// ```
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == '，' || c.is_whitespace())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// カスタムバリアントの編集フォーム
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantDraft {
    pub name: String,
    pub description: String,
    /// 未分割のキーワード文字列
    pub keywords: String,
}

impl VariantDraft {
    pub fn new(name: &str, description: &str, keywords: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            keywords: keywords.to_string(),
        }
    }

    /// 既存バリアント → フォーム（キーワードは ", " 区切り）
    pub fn from_variant(variant: &Variant) -> Self {
        Self {
            name: variant.name.clone(),
            description: variant.description.clone(),
            keywords: variant.keywords.join(", "),
        }
    }

    /// 名前とキーワードが共に空でなければ (名前, キーワード列)
    fn validated(&self) -> Option<(String, Vec<String>)> {
        let name = self.name.trim();
        let keywords = parse_keywords(&self.keywords);
        if name.is_empty() || keywords.is_empty() {
            return None;
        }
        Some((name.to_string(), keywords))
    }
}

#[derive(Debug, Clone)]
pub struct VariantRegistry {
    builtin: Vec<Variant>,
    custom: Vec<Variant>,
    active_id: String,
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl VariantRegistry {
    /// 永続化データから復元
    ///
    /// 内蔵・既存のidと衝突するカスタムは破棄。解決できないactive idはデフォルトに戻す
    pub fn new(custom: Vec<Variant>, active_id: Option<String>) -> Self {
        let builtin = builtin_variants();
        let mut seen: HashSet<String> = builtin.iter().map(|v| v.id.clone()).collect();

        let custom = custom
            .into_iter()
            .filter(|v| seen.insert(v.id.clone()))
            .map(|mut v| {
                v.is_custom = true;
                v
            })
            .collect();

        let mut registry = Self {
            builtin,
            custom,
            active_id: DEFAULT_VARIANT_ID.to_string(),
        };
        if let Some(id) = active_id {
            registry.select(&id);
        }
        registry
    }

    pub fn builtin(&self) -> &[Variant] {
        &self.builtin
    }

    pub fn custom(&self) -> &[Variant] {
        &self.custom
    }

    /// 内蔵 + カスタム
    pub fn list_all(&self) -> impl Iterator<Item = &Variant> {
        self.builtin.iter().chain(self.custom.iter())
    }

    pub fn find(&self, id: &str) -> Option<&Variant> {
        self.list_all().find(|v| v.id == id)
    }

    /// 一致しなければ先頭の内蔵バリアント
    pub fn resolve(&self, id: &str) -> &Variant {
        self.find(id).unwrap_or(&self.builtin[0])
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> &Variant {
        self.resolve(&self.active_id)
    }

    /// 存在しない id は拒否
    pub fn select(&mut self, id: &str) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.active_id = id.to_string();
        true
    }

    /// 名前かキーワードが空なら作成しない
    pub fn create(&mut self, draft: &VariantDraft) -> Option<Variant> {
        let (name, keywords) = draft.validated()?;

        let variant = Variant {
            id: self.fresh_id(),
            name,
            description: draft.description.trim().to_string(),
            keywords,
            is_custom: true,
        };
        self.custom.push(variant.clone());
        Some(variant)
    }

    /// 内蔵バリアントは編集不可。名前・キーワードが空になる編集も拒否
    pub fn edit(&mut self, id: &str, draft: &VariantDraft) -> bool {
        let Some((name, keywords)) = draft.validated() else {
            return false;
        };
        let Some(variant) = self.custom.iter_mut().find(|v| v.id == id) else {
            return false;
        };
        variant.name = name;
        variant.description = draft.description.trim().to_string();
        variant.keywords = keywords;
        true
    }

    /// 選択中のバリアントを削除したらデフォルトに戻す
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.custom.len();
        self.custom.retain(|v| v.id != id);
        if self.custom.len() == before {
            return false;
        }
        if self.active_id == id {
            self.active_id = self.builtin[0].id.clone();
        }
        true
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = format!("custom-{}", uuid::Uuid::new_v4().simple());
            if self.find(&id).is_none() {
                return id;
            }
        }
    }
}
