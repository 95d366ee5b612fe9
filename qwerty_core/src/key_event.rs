use crate::config::{Config, VoiceAccent};
use crate::model::Sound;

/// 宿主暴露的命令。
///
/// 说明：章节/词典选择菜单由宿主展示，选择结果作为参数放进命令里。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 开始/结束练习（切换）
    Start,
    /// 切换到第 n 章（从 0 开始）
    ChangeChapter(usize),
    /// 切换词典
    ChangeDict(String),
    ToggleWordVisibility,
    ToggleReadOnly,
    PlayVoice,
    NextWord,
    PrevWord,
}

impl Command {
    pub const START: &'static str = "qwerty-learner.start";
    pub const CHANGE_CHAPTER: &'static str = "qwerty-learner.changeChapter";
    pub const CHANGE_DICT: &'static str = "qwerty-learner.changeDict";
    pub const TOGGLE_WORD_VISIBILITY: &'static str = "qwerty-learner.toggleWordVisibility";
    pub const TOGGLE_READ_ONLY: &'static str = "qwerty-learner.toggleReadOnlyMode";
    pub const PLAY_VOICE: &'static str = "qwerty-learner.playVoice";
    pub const NEXT_WORD: &'static str = "qwerty-learner.nextWord";
    pub const PREV_WORD: &'static str = "qwerty-learner.prevWord";

    /// 命令 id（宿主注册命令时使用）。
    pub fn id(&self) -> &'static str {
        match self {
            Command::Start => Self::START,
            Command::ChangeChapter(_) => Self::CHANGE_CHAPTER,
            Command::ChangeDict(_) => Self::CHANGE_DICT,
            Command::ToggleWordVisibility => Self::TOGGLE_WORD_VISIBILITY,
            Command::ToggleReadOnly => Self::TOGGLE_READ_ONLY,
            Command::PlayVoice => Self::PLAY_VOICE,
            Command::NextWord => Self::NEXT_WORD,
            Command::PrevWord => Self::PREV_WORD,
        }
    }
}

/// 输入事件：Session/processor 只处理这些语义事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// 练习输入的一个字符
    Char(char),
    /// 时钟推进（毫秒，单调递增）；触发到期的定时器
    Tick(u64),
    Command(Command),
    /// 宿主配置发生变化（完整的新配置）
    ConfigChanged(Config),
    /// 宿主发音播放结束，释放发音锁
    VoiceFinished,
}

impl From<Command> for InputEvent {
    fn from(command: Command) -> Self {
        InputEvent::Command(command)
    }
}

/// 引擎输出动作（对宿主的“副作用”请求）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// 播放提示音
    Sound(Sound),
    /// 播放单词发音；播放结束后宿主应回送 `InputEvent::VoiceFinished`
    PlayVoice { word: String, accent: VoiceAccent },
}
