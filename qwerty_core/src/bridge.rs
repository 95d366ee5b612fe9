//! `bridge`：把宿主编辑器的事件接到 `Session` 上。
//!
//! 宿主没有“不经过文档的按键捕获”能力，所以练习输入走真实文档：
//! 字符插入后由桥接层立刻删掉（intercept-and-revert），再把字符交给会话，
//! 最后把 `UiState` 渲染回状态栏。

use log::{debug, trace};

use crate::{
    config::{Config, VoiceAccent},
    dictionary::WordLibrary,
    error::SessionError,
    key_event::{Action, Command, InputEvent},
    model::{QuickPick, Sound, UiState},
    session::Session,
};

/// 这些 scheme 的文档（设置、输出面板等）永远不拦截，避免改坏用户配置。
pub const PROTECTED_SCHEME_MARKERS: [&str; 2] = ["vscode", "settings"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// 文档内容变化（只取第一处变化）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    /// 文档 uri（含 scheme，例如 `file:///tmp/a.rs`）
    pub uri: String,
    /// 被替换的范围（纯插入时 start == end）
    pub range: Range,
    /// 插入的文本
    pub text: String,
}

impl TextChange {
    /// 在 `at` 处插入 `text`。
    pub fn insert(uri: impl Into<String>, at: Position, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            range: Range { start: at, end: at },
            text: text.into(),
        }
    }

    pub fn scheme(&self) -> &str {
        self.uri.split_once(':').map(|(scheme, _)| scheme).unwrap_or("")
    }

    fn is_protected(&self) -> bool {
        let scheme = self.scheme();
        PROTECTED_SCHEME_MARKERS.iter().any(|m| scheme.contains(m))
    }

    /// 单字符插入时返回该字符。
    fn single_char(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    /// 纯插入（没有替换已有文本）。
    pub fn is_insertion(&self) -> bool {
        self.range.start == self.range.end
    }

    /// 撤销单字符插入所需删除的范围：`start .. (start.line, start.character + 1)`。
    pub fn revert_range(&self) -> Range {
        let start = self.range.start;
        Range {
            start,
            end: Position::new(start.line, start.character + 1),
        }
    }
}

/// 状态栏上的各个区域。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBarItem {
    Word,
    Input,
    Trans,
    Prev,
    Next,
}

impl StatusBarItem {
    /// 从左到右的显示顺序
    pub const ALL: [StatusBarItem; 5] = [
        StatusBarItem::Word,
        StatusBarItem::Input,
        StatusBarItem::Trans,
        StatusBarItem::Prev,
        StatusBarItem::Next,
    ];

    /// 固定文本（Word/Input/Trans 的文本来自 `UiState`）。
    pub fn label(self) -> Option<&'static str> {
        match self {
            StatusBarItem::Prev => Some("<"),
            StatusBarItem::Next => Some(">"),
            _ => None,
        }
    }

    pub fn tooltip(self) -> Option<&'static str> {
        match self {
            StatusBarItem::Prev => Some("切换上一个单词"),
            StatusBarItem::Next => Some("切换下一个单词"),
            StatusBarItem::Trans => Some("播放发音"),
            _ => None,
        }
    }

    /// 点击时触发的命令。
    pub fn command(self) -> Option<Command> {
        match self {
            StatusBarItem::Prev => Some(Command::PrevWord),
            StatusBarItem::Next => Some(Command::NextWord),
            StatusBarItem::Trans => Some(Command::PlayVoice),
            _ => None,
        }
    }

    /// 当前 UI 快照下该区域显示的文本。
    pub fn text(self, ui: &UiState) -> &str {
        match self {
            StatusBarItem::Word => &ui.word_bar,
            StatusBarItem::Input => &ui.input_bar,
            StatusBarItem::Trans => &ui.trans_bar,
            StatusBarItem::Prev | StatusBarItem::Next => self.label().unwrap_or(""),
        }
    }
}

/// 宿主编辑器能力：删除文档内容、渲染状态栏、播放声音。
///
/// 声音/发音失败由宿主自行处理（记录日志即可），不回报给会话。
pub trait EditorHost {
    /// 删除 `uri` 文档中 `range` 范围内的文本。
    fn delete(&mut self, uri: &str, range: Range);
    /// 按快照刷新状态栏（`ui.visible` 为 false 时隐藏）。
    fn render(&mut self, ui: &UiState);
    fn play_sound(&mut self, sound: Sound);
    /// 开始播放发音；结束后宿主调用 `EditorBridge::voice_finished`。
    fn play_voice(&mut self, word: &str, accent: VoiceAccent);
}

/// 宿主向插件投递的事件（订阅接口）。
pub trait EditorEvents {
    fn on_text_change(&mut self, change: &TextChange);
    fn on_config_change(&mut self, config: Config);
    fn on_tick(&mut self, now_ms: u64);
}

pub struct EditorBridge<L, H> {
    session: Session<L>,
    host: H,
}

impl<L, H> EditorBridge<L, H>
where
    L: WordLibrary,
    H: EditorHost,
{
    pub fn new(session: Session<L>, host: H) -> Self {
        Self { session, host }
    }

    pub fn session(&self) -> &Session<L> {
        &self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// 执行命令；章节/词典选择越界时返回错误，状态不变。
    pub fn execute(&mut self, command: Command) -> Result<(), SessionError> {
        let (ui, actions) = match command {
            Command::ChangeChapter(chapter) => self.session.select_chapter(chapter)?,
            Command::ChangeDict(key) => self.session.select_dictionary(&key)?,
            other => self.session.handle(other),
        };
        self.apply(&ui, actions);
        Ok(())
    }

    pub fn chapter_picker(&self) -> QuickPick {
        self.session.chapter_picker()
    }

    pub fn dictionary_picker(&self) -> QuickPick {
        self.session.dictionary_picker()
    }

    /// 宿主发音播放结束。
    pub fn voice_finished(&mut self) {
        self.dispatch(InputEvent::VoiceFinished);
    }

    /// 插件停用：结束会话、隐藏状态栏，并把宿主交还给调用方。
    pub fn deactivate(mut self) -> H {
        self.session.shutdown();
        let ui = self.session.ui_state();
        self.host.render(&ui);
        self.host
    }

    fn dispatch(&mut self, ev: InputEvent) {
        let (ui, actions) = self.session.handle(ev);
        self.apply(&ui, actions);
    }

    fn apply(&mut self, ui: &UiState, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Sound(sound) => self.host.play_sound(sound),
                Action::PlayVoice { word, accent } => self.host.play_voice(&word, accent),
            }
        }
        self.host.render(ui);
    }
}

impl<L, H> EditorEvents for EditorBridge<L, H>
where
    L: WordLibrary,
    H: EditorHost,
{
    fn on_text_change(&mut self, change: &TextChange) {
        if !self.session.is_started() || change.is_protected() {
            return;
        }
        // 覆盖选区的输入会替换用户原有文本，无法只靠删除还原
        if !change.is_insertion() {
            trace!("ignore replacement over {:?}", change.range);
            return;
        }
        let Some(ch) = change.single_char() else {
            trace!("ignore multi-char change {:?}", change.text);
            return;
        };
        // 练习输入不能留在用户文档里
        self.host.delete(&change.uri, change.revert_range());
        debug!("typed {ch:?}");
        self.dispatch(InputEvent::Char(ch));
    }

    fn on_config_change(&mut self, config: Config) {
        self.dispatch(InputEvent::ConfigChanged(config));
    }

    fn on_tick(&mut self, now_ms: u64) {
        let before = self.session.ui_state();
        let (ui, actions) = self.session.handle(InputEvent::Tick(now_ms));
        // 时钟事件大多不改变界面，避免无谓的重绘
        if ui != before || !actions.is_empty() {
            self.apply(&ui, actions);
        }
    }
}
