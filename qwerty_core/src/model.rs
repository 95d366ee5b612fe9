use serde::{Deserialize, Serialize};

/// 单词（词典中的一条记录），加载后不再修改。
///
/// 字段名沿用词库 JSON：`name` / `trans` / `usphone` / `ukphone`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// 需要练习输入的单词本身
    pub name: String,
    /// 释义列表
    #[serde(default)]
    pub trans: Vec<String>,
    /// 美式音标
    #[serde(default, rename = "usphone", skip_serializing_if = "Option::is_none")]
    pub us_phone: Option<String>,
    /// 英式音标
    #[serde(default, rename = "ukphone", skip_serializing_if = "Option::is_none")]
    pub uk_phone: Option<String>,
}

impl Word {
    pub fn new(name: impl Into<String>, trans: &[&str]) -> Self {
        Self {
            name: name.into(),
            trans: trans.iter().map(|t| (*t).to_owned()).collect(),
            us_phone: None,
            uk_phone: None,
        }
    }

    /// 单词长度（按字符计，用于生成占位符）。
    pub fn char_count(&self) -> usize {
        self.name.chars().count()
    }
}

/// 词典元信息（用于词典选择菜单）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
}

/// 练习进度快照：宿主负责持久化，下次启动时恢复。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub dict_key: String,
    pub chapter: usize,
    pub order: usize,
}

/// 宿主播放的提示音。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    /// 每次有效按键
    Click,
    /// 单词输入完成
    Success,
    /// 输入错误
    Wrong,
}

/// 引擎给宿主的“快照视图”。
///
/// 宿主（状态栏）只读 `UiState`，不直接读写 `Context`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiState {
    /// 状态栏是否显示（即是否处于练习中）
    pub visible: bool,
    /// 单词栏：词典、章节、序号与单词（或占位符）
    pub word_bar: String,
    /// 输入栏：已输入部分 + 剩余占位符
    pub input_bar: String,
    /// 释义栏
    pub trans_bar: String,
    /// 输入错误时输入栏的高亮颜色
    pub input_color: Option<String>,
    pub dict_name: String,
    pub chapter: usize,
    pub total_chapters: usize,
    pub order: usize,
    pub chapter_len: usize,
    pub read_only: bool,
}

/// 快速选择菜单的一项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub detail: Option<String>,
    /// 选中后传回给命令的值（章节序号或词典 id）
    pub key: String,
}

/// 快速选择菜单：宿主负责展示并把选择结果作为命令参数传回。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPick {
    pub placeholder: String,
    pub items: Vec<PickItem>,
}
