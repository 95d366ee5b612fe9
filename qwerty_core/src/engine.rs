use crate::dictionary::WordLibrary;
use crate::model::{DictionaryInfo, Word};
use crate::processor::EngineFacade;

/// 引擎：持有词库，给 processors 提供只读的查词接口。
///
/// 练习状态不在这里，而在 `Context` 中；同一个词库可以被多个会话复用。
pub struct Engine<L> {
    library: L,
}

impl<L> Engine<L>
where
    L: WordLibrary,
{
    pub fn new(library: L) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    /// 默认词典：注册顺序中的第一个。
    pub fn default_key(&self) -> &str {
        self.library
            .dictionaries()
            .first()
            .map(|d| d.id.as_str())
            .unwrap_or("")
    }
}

impl<L> EngineFacade for Engine<L>
where
    L: WordLibrary,
{
    fn dictionaries(&self) -> &[DictionaryInfo] {
        self.library.dictionaries()
    }

    fn words(&self, dict_key: &str) -> Option<&[Word]> {
        self.library.words(dict_key)
    }

    fn default_key(&self) -> &str {
        Engine::<L>::default_key(self)
    }
}
