/// 会话层的可恢复错误（主要来自宿主传入的选择结果越界）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("chapter {chapter} out of range (total {total})")]
    ChapterOutOfRange { chapter: usize, total: usize },
    #[error("unknown dictionary `{0}`")]
    UnknownDictionary(String),
}
