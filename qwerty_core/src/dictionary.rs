use crate::model::{DictionaryInfo, Word};

/// 词库抽象：core 不关心词典来自内置资源、文件还是网络。
///
/// 约定：
/// - `dictionaries()` 的第一项是默认词典
/// - `words(id)` 返回的列表非空（空词典由实现方在加载时拒绝）
pub trait WordLibrary {
    /// 所有可选词典（保持注册顺序）。
    fn dictionaries(&self) -> &[DictionaryInfo];

    /// 查询词典的单词列表；未知 id 返回 None。
    fn words(&self, id: &str) -> Option<&[Word]>;

    /// 查询词典元信息。
    fn info(&self, id: &str) -> Option<&DictionaryInfo> {
        self.dictionaries().iter().find(|d| d.id == id)
    }
}

/// 按章节长度切分后的章节总数（至少为 1，便于空词典时也有合法的章节 0）。
pub fn total_chapters(word_count: usize, chapter_length: usize) -> usize {
    word_count.div_ceil(chapter_length.max(1)).max(1)
}

/// 章节 `chapter` 对应的单词切片：`words[c*len .. min((c+1)*len, words.len())]`。
pub fn chapter_slice(words: &[Word], chapter: usize, chapter_length: usize) -> &[Word] {
    let len = chapter_length.max(1);
    let start = chapter.saturating_mul(len).min(words.len());
    let end = start.saturating_add(len).min(words.len());
    &words[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<Word> {
        (0..n).map(|i| Word::new(format!("w{i}"), &[])).collect()
    }

    #[test]
    fn chapters_round_up() {
        assert_eq!(total_chapters(45, 20), 3);
        assert_eq!(total_chapters(40, 20), 2);
        assert_eq!(total_chapters(0, 20), 1);
        assert_eq!(total_chapters(3, 0), 3);
    }

    #[test]
    fn last_chapter_is_short() {
        let list = words(45);
        assert_eq!(chapter_slice(&list, 0, 20).len(), 20);
        assert_eq!(chapter_slice(&list, 2, 20).len(), 5);
        assert_eq!(chapter_slice(&list, 2, 20)[0].name, "w40");
        assert!(chapter_slice(&list, 9, 20).is_empty());
    }
}
