//! 词库：内置词典（编译期嵌入的 JSON）+ 从文件加载的自定义词典。

use std::{collections::BTreeMap, fs, io, path::Path, path::PathBuf};

use log::{debug, info};
use qwerty_core::{
    dictionary::WordLibrary,
    model::{DictionaryInfo, Word},
};

/// JSON 格式（沿用原始词库格式，不做扩展）：
///
/// ```json
/// [{ "name": "cancel", "trans": ["取消"], "usphone": "'kænsl", "ukphone": "'kænsl" }]
/// ```
///
/// `trans`/`usphone`/`ukphone` 可省略；`name` 不能为空。
pub fn parse_words(json: &str) -> Result<Vec<Word>, DictError> {
    let words: Vec<Word> = serde_json::from_str(json)?;
    if let Some(index) = words.iter().position(|w| w.name.trim().is_empty()) {
        return Err(DictError::EmptyWord { index });
    }
    Ok(words)
}

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid word list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dictionary `{0}` has no words")]
    Empty(String),
    #[error("word #{index} has an empty name")]
    EmptyWord { index: usize },
    #[error("dictionary `{0}` is already registered")]
    DuplicateId(String),
}

struct Builtin {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    language: &'static str,
    json: &'static str,
}

const BUILTIN: [Builtin; 3] = [
    Builtin {
        id: "cet4",
        name: "CET-4",
        description: "大学英语四级词库",
        language: "en",
        json: include_str!("../asset/cet4.json"),
    },
    Builtin {
        id: "cet6",
        name: "CET-6",
        description: "大学英语六级词库",
        language: "en",
        json: include_str!("../asset/cet6.json"),
    },
    Builtin {
        id: "coder",
        name: "Coder Dict",
        description: "程序员常见单词词库",
        language: "code",
        json: include_str!("../asset/coder.json"),
    },
];

/// 词库：保持注册顺序，第一个注册的词典是默认词典。
#[derive(Debug, Default)]
pub struct Library {
    infos: Vec<DictionaryInfo>,
    lists: BTreeMap<String, Vec<Word>>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载全部内置词典。
    pub fn builtin() -> Result<Self, DictError> {
        let mut library = Self::new();
        for b in &BUILTIN {
            let info = DictionaryInfo {
                id: b.id.to_owned(),
                name: b.name.to_owned(),
                description: b.description.to_owned(),
                language: b.language.to_owned(),
            };
            library.insert(info, parse_words(b.json)?)?;
        }
        Ok(library)
    }

    /// 注册词典；id 重复或单词列表为空时拒绝。
    pub fn insert(&mut self, info: DictionaryInfo, words: Vec<Word>) -> Result<(), DictError> {
        if self.lists.contains_key(&info.id) {
            return Err(DictError::DuplicateId(info.id));
        }
        if words.is_empty() {
            return Err(DictError::Empty(info.id));
        }
        debug!("registered dictionary {} ({} words)", info.id, words.len());
        self.lists.insert(info.id.clone(), words);
        self.infos.push(info);
        Ok(())
    }

    /// 从 JSON 文件加载自定义词典。
    pub fn load_file(&mut self, info: DictionaryInfo, path: impl AsRef<Path>) -> Result<(), DictError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| DictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let words = parse_words(&json)?;
        info!("loaded {} words for `{}` from {:?}", words.len(), info.id, path);
        self.insert(info, words)
    }
}

impl WordLibrary for Library {
    fn dictionaries(&self) -> &[DictionaryInfo] {
        &self.infos
    }

    fn words(&self, id: &str) -> Option<&[Word]> {
        self.lists.get(id).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn info(id: &str) -> DictionaryInfo {
        DictionaryInfo {
            id: id.to_owned(),
            name: id.to_uppercase(),
            description: String::new(),
            language: "en".to_owned(),
        }
    }

    #[test]
    fn builtin_dictionaries_load_in_order() {
        let library = Library::builtin().unwrap();
        let ids: Vec<&str> = library.dictionaries().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["cet4", "cet6", "coder"]);
        let cet4 = library.words("cet4").unwrap();
        assert_eq!(cet4[0].name, "cancel");
        assert_eq!(cet4[0].us_phone.as_deref(), Some("'kænsl"));
        assert!(library.words("coder").unwrap().iter().all(|w| w.us_phone.is_none()));
    }

    #[test]
    fn optional_fields_default() {
        let words = parse_words(r#"[{ "name": "rust" }]"#).unwrap();
        assert_eq!(words, vec![Word::new("rust", &[])]);
    }

    #[test]
    fn rejects_blank_names_and_bad_json() {
        assert!(matches!(
            parse_words(r#"[{ "name": "ok" }, { "name": " " }]"#),
            Err(DictError::EmptyWord { index: 1 })
        ));
        assert!(matches!(parse_words("{"), Err(DictError::Parse(_))));
    }

    #[test]
    fn rejects_duplicates_and_empty_lists() {
        let mut library = Library::new();
        library.insert(info("a"), vec![Word::new("x", &[])]).unwrap();
        assert!(matches!(
            library.insert(info("a"), vec![Word::new("y", &[])]),
            Err(DictError::DuplicateId(id)) if id == "a"
        ));
        assert!(matches!(library.insert(info("b"), Vec::new()), Err(DictError::Empty(_))));
        assert_eq!(library.dictionaries().len(), 1);
    }

    #[test]
    fn loads_custom_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{ "name": "alpha", "trans": ["阿尔法"] }}, {{ "name": "beta" }}]"#).unwrap();

        let mut library = Library::new();
        library.load_file(info("greek"), file.path()).unwrap();
        let words = library.words("greek").unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].trans, vec!["阿尔法".to_owned()]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Library::new().load_file(info("x"), &path).unwrap_err();
        assert!(matches!(err, DictError::Io { path: p, .. } if p == path));
    }
}
