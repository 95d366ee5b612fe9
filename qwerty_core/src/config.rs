//! `config`：插件配置项（占位符、章节长度、错误高亮、只读模式间隔、发音）。
//!
//! 配置的存储由宿主负责；core 只定义结构、默认值与单项修改/比较。

use serde::{Deserialize, Serialize};

/// 配置项所在的命名空间（宿主里的完整 key 为 `qwerty-learner.<key>`）。
pub const SECTION: &str = "qwerty-learner";

/// 发音口音；`Off` 表示关闭发音。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceAccent {
    #[default]
    Us,
    Uk,
    Off,
}

impl std::str::FromStr for VoiceAccent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "uk" => Ok(Self::Uk),
            "off" | "close" => Ok(Self::Off),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 隐藏单词/未输入部分使用的占位符
    pub placeholder: String,
    /// 每章单词数
    pub chapter_length: usize,
    /// 输入错误时输入栏的颜色
    pub highlight_wrong_color: String,
    /// 错误高亮持续时间（毫秒），结束后清空输入
    pub highlight_wrong_delay: u64,
    /// 只读模式自动切换单词的间隔（毫秒）
    pub read_only_interval: u64,
    #[serde(rename = "voiceType")]
    pub voice: VoiceAccent,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder: "_".to_owned(),
            chapter_length: 20,
            highlight_wrong_color: "#EE3D11".to_owned(),
            highlight_wrong_delay: 400,
            read_only_interval: 5_000,
            voice: VoiceAccent::Us,
        }
    }
}

/// 单个配置项。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Placeholder,
    ChapterLength,
    HighlightWrongColor,
    HighlightWrongDelay,
    ReadOnlyInterval,
    Voice,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Placeholder,
        ConfigKey::ChapterLength,
        ConfigKey::HighlightWrongColor,
        ConfigKey::HighlightWrongDelay,
        ConfigKey::ReadOnlyInterval,
        ConfigKey::Voice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Placeholder => "placeholder",
            ConfigKey::ChapterLength => "chapterLength",
            ConfigKey::HighlightWrongColor => "highlightWrongColor",
            ConfigKey::HighlightWrongDelay => "highlightWrongDelay",
            ConfigKey::ReadOnlyInterval => "readOnlyInterval",
            ConfigKey::Voice => "voiceType",
        }
    }

    /// 解析 key；允许带 `qwerty-learner.` 前缀。
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        let key = key
            .strip_prefix(SECTION)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(key);
        Self::ALL.into_iter().find(|k| k.name() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

impl Config {
    /// 章节长度（至少为 1）。
    pub fn chapter_length(&self) -> usize {
        self.chapter_length.max(1)
    }

    /// 占位符；配置为空时退回默认值。
    pub fn placeholder(&self) -> &str {
        if self.placeholder.is_empty() {
            "_"
        } else {
            &self.placeholder
        }
    }

    /// 修改单个配置项，返回被修改的 key。
    pub fn set(&mut self, key: &str, value: &str) -> Result<ConfigKey, ConfigError> {
        let parsed = ConfigKey::parse(key).ok_or_else(|| ConfigError::UnknownKey(key.to_owned()))?;
        let invalid = || ConfigError::InvalidValue {
            key: parsed.name(),
            value: value.to_owned(),
        };
        match parsed {
            ConfigKey::Placeholder => self.placeholder = value.to_owned(),
            ConfigKey::ChapterLength => {
                let n: usize = value.trim().parse().map_err(|_| invalid())?;
                if n == 0 {
                    return Err(invalid());
                }
                self.chapter_length = n;
            }
            ConfigKey::HighlightWrongColor => self.highlight_wrong_color = value.trim().to_owned(),
            ConfigKey::HighlightWrongDelay => {
                self.highlight_wrong_delay = value.trim().parse().map_err(|_| invalid())?;
            }
            ConfigKey::ReadOnlyInterval => {
                let ms: u64 = value.trim().parse().map_err(|_| invalid())?;
                if ms == 0 {
                    return Err(invalid());
                }
                self.read_only_interval = ms;
            }
            ConfigKey::Voice => self.voice = value.parse().map_err(|_| invalid())?,
        }
        Ok(parsed)
    }

    /// 与另一份配置比较，返回发生变化的 key。
    pub fn diff(&self, other: &Config) -> Vec<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| match key {
                ConfigKey::Placeholder => self.placeholder != other.placeholder,
                ConfigKey::ChapterLength => self.chapter_length() != other.chapter_length(),
                ConfigKey::HighlightWrongColor => self.highlight_wrong_color != other.highlight_wrong_color,
                ConfigKey::HighlightWrongDelay => self.highlight_wrong_delay != other.highlight_wrong_delay,
                ConfigKey::ReadOnlyInterval => self.read_only_interval != other.read_only_interval,
                ConfigKey::Voice => self.voice != other.voice,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{ "chapterLength": 10 }"#).unwrap();
        assert_eq!(config.chapter_length, 10);
        assert_eq!(config.placeholder, "_");
        assert_eq!(config.voice, VoiceAccent::Us);
    }

    #[test]
    fn voice_type_uses_lowercase_names() {
        let config: Config = serde_json::from_str(r#"{ "voiceType": "uk" }"#).unwrap();
        assert_eq!(config.voice, VoiceAccent::Uk);
    }

    #[test]
    fn set_accepts_section_prefix() {
        let mut config = Config::default();
        let key = config.set("qwerty-learner.chapterLength", "5").unwrap();
        assert_eq!(key, ConfigKey::ChapterLength);
        assert_eq!(config.chapter_length, 5);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::default();
        assert_eq!(
            config.set("chapterLength", "0"),
            Err(ConfigError::InvalidValue {
                key: "chapterLength",
                value: "0".to_owned()
            })
        );
        assert!(config.set("readOnlyInterval", "soon").is_err());
        assert_eq!(config.set("nope", "1"), Err(ConfigError::UnknownKey("nope".to_owned())));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn diff_lists_changed_keys() {
        let old = Config::default();
        let mut new = old.clone();
        new.placeholder = "*".to_owned();
        new.voice = VoiceAccent::Off;
        assert_eq!(old.diff(&new), vec![ConfigKey::Placeholder, ConfigKey::Voice]);
        assert!(old.diff(&old).is_empty());
    }

    #[test]
    fn zero_chapter_length_is_clamped() {
        let config = Config {
            chapter_length: 0,
            ..Config::default()
        };
        assert_eq!(config.chapter_length(), 1);
    }
}
