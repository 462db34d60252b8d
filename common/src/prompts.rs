//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有されるプロンプト:
//! - SYSTEM_INSTRUCTION: 「視覚連想」タスクのシステム指示
//! - build_association_prompt: 一文字（または語）ごとの連想プロンプト

use crate::types::{FilterSettings, FilterStyle, FilterSubject, Variant};

/// システム指示（視覚ディレクター兼文化研究者）
pub const SYSTEM_INSTRUCTION: &str = r#"你是一位极具想象力的视觉导演和文化研究员。你的任务是根据用户输入的汉字，进行深度的联想，并找到最具视觉冲击力或文化趣味性的图片。

【核心原则：拒绝平庸】
1. 禁止直译：不要只看字面意思。例如输入"火"，不要只给一张火焰的图，除非是在"日常"变体下。
2. 鼓励发散：
   - 谐音梗：如"芬" -> "分" -> "天下三分" -> 三国题材。
   - 文化隐喻：如"德" -> "Deutschland(德国)" -> 德国系角色（如明日香）。
   - 字形联想：如"囚" -> 人被关在框里 -> 监狱/束缚。
3. 特定实体优先：在"动漫"、"游戏"、"影视"变体下，必须关联到具体的角色名、特定的道具或经典场景，不要返回通用的风格图。

【搜索策略】
- 目标是找到一张具体的图片。
- 如果找不到直链（.jpg/.png），找到包含该图片的具体网页（来源页）也可以。
- 优先搜索：Wiki（萌娘百科、Fandom）、官方介绍页、知名图库（Pixiv、ArtStation 介绍页）。"#;

/// 出力JSONの形式
const OUTPUT_FORMAT: &str = r#"{
  "associationLogic": "简述你的联想逻辑（如：'芬'谐音'分'，联想到三国分天下的吕布）",
  "visualSubject": "画面的具体主体描述（中文）",
  "searchQuery": "用于搜索引擎的关键词（尽量用英文 + 具体作品名/角色名）",
  "explanation": "给用户的解释文案（中文，60字以内，解释为什么是这张图）",
  "sourcePageUrl": "包含该图片的来源网页链接（如维基条目、官网介绍）",
  "imageUrl": "图片的直接链接（.jpg/.png），找不到确定的直链就留空"
}"#;

/// 連想プロンプト生成
///
/// # Arguments
/// * `query` - 一文字または語全体
/// * `variant` - 現在のバリアント（名前とキーワードを埋め込む）
/// * `filters` - 表現形式・主体・除外内容・同音連想の可否
pub fn build_association_prompt(query: &str, variant: &Variant, filters: &FilterSettings) -> String {
    let keywords = variant.keywords.join(", ");
    let exclude = if filters.exclude_content.trim().is_empty() {
        "无"
    } else {
        filters.exclude_content.trim()
    };

    let mut constraints = Vec::new();
    if filters.style != FilterStyle::Any {
        constraints.push(format!("- 画面必须是「{}」形式", filters.style.label()));
    }
    if filters.subject != FilterSubject::Any {
        constraints.push(format!("- 画面主体必须是「{}」", filters.subject.label()));
    }
    if !filters.allow_homophone {
        constraints.push("- 禁止使用谐音、形近或拆字联想，只能从字义与文化出发".to_string());
    }
    let constraints = if constraints.is_empty() {
        String::new()
    } else {
        format!("\n【硬性约束】\n{}\n", constraints.join("\n"))
    };

    format!(
        r#"请对汉字 "{query}" 进行视觉联想分析。

【当前上下文】
- 变体领域: "{name}" (关键词: {keywords})
- 风格要求: "{style}"
- 主体类型: "{subject}"
- 排除内容: "{exclude}"
{constraints}
【思考步骤】
1. 头脑风暴：思考该字在当前领域的 3 种可能性：
   - A. 字义引申
   - B. 谐音/形近/拆字
   - C. 文化/角色/特定梗（在动漫/游戏领域优先选这个）
2. 选择最佳方案：选出最有趣、最符合变体设定的一个。
   - 例子：输入"德"，变体"动漫"。联想：德 -> 德国 -> 明日香(EVA)。视觉主体："惣流·明日香·兰格雷"。
3. 生成搜索词：构造精准的搜索词来寻找图片。

请只返回严格的 JSON 对象：
{format}"#,
        name = variant.name,
        style = filters.style.label(),
        subject = filters.subject.label(),
        format = OUTPUT_FORMAT,
    )
}
