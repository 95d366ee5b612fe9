//! `Session`：对上层（编辑器桥接/CLI）提供的会话对象。
//!
//! `Session` 自身不做业务逻辑判断，而是：
//! - 持有 `Context`（练习状态）
//! - 持有 processors 链（可插拔）
//! - 把每次 `InputEvent` 依次交给 processors，直到被消费
//! - 最后输出 `UiState` + `Action`
//!
//! 生命周期：`new` 对应插件激活，`shutdown` 对应插件停用（清理所有定时器）。

use log::info;

use crate::{
    config::Config,
    context::Context,
    dictionary::WordLibrary,
    engine::Engine,
    error::SessionError,
    key_event::{Action, Command, InputEvent},
    model::{PickItem, Progress, QuickPick, UiState, Word},
    processor::{
        ClockProcessor, ConfigProcessor, ModeProcessor, NavigationProcessor, ProcessStatus, Processor,
        TypingProcessor, VoiceProcessor,
    },
};

/// 练习会话（一次激活期间的状态机容器）。
pub struct Session<L> {
    /// 引擎（包含词库）
    engine: Engine<L>,
    /// 会话上下文（processors 共享）
    ctx: Context,
    /// processors 链（可配置/可扩展）
    processors: Vec<Box<dyn Processor>>,
}

impl<L> Session<L>
where
    L: WordLibrary,
{
    /// 创建会话，并组装默认 processors 链；初始位置为默认词典第 0 章第 0 个单词。
    pub fn new(engine: Engine<L>, config: Config) -> Self {
        let ctx = Context::new(engine.default_key(), config);
        Self {
            engine,
            ctx,
            processors: vec![
                Box::new(ClockProcessor),
                Box::new(TypingProcessor),
                Box::new(NavigationProcessor),
                Box::new(ModeProcessor),
                Box::new(VoiceProcessor),
                Box::new(ConfigProcessor),
            ],
        }
    }

    /// 恢复上次保存的进度。
    pub fn with_progress(mut self, progress: &Progress) -> Self {
        self.ctx.restore(&self.engine, progress);
        self
    }

    pub fn progress(&self) -> Progress {
        self.ctx.progress()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.ctx.config
    }

    pub fn is_started(&self) -> bool {
        self.ctx.started
    }

    pub fn total_chapters(&self) -> usize {
        self.ctx.total_chapters(&self.engine)
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.ctx.current_word(&self.engine)
    }

    /// 获取当前 UI 快照（只读）。
    pub fn ui_state(&self) -> UiState {
        self.ctx.ui_state(&self.engine)
    }

    /// 处理一个输入事件，返回最新 UI 快照与动作列表。
    pub fn handle(&mut self, ev: impl Into<InputEvent>) -> (UiState, Vec<Action>) {
        let ev = ev.into();
        let mut actions = Vec::new();
        for p in &mut self.processors {
            let (status, mut a) = p.process(&self.engine, &mut self.ctx, &ev);
            actions.append(&mut a);
            if status == ProcessStatus::Consume {
                break;
            }
        }
        (self.ctx.ui_state(&self.engine), actions)
    }

    /// 切换章节（先校验范围，越界时返回错误且不改变状态）。
    pub fn select_chapter(&mut self, chapter: usize) -> Result<(UiState, Vec<Action>), SessionError> {
        let total = self.total_chapters();
        if chapter >= total {
            return Err(SessionError::ChapterOutOfRange { chapter, total });
        }
        Ok(self.handle(Command::ChangeChapter(chapter)))
    }

    /// 切换词典（未知 id 返回错误且不改变状态）。
    pub fn select_dictionary(&mut self, key: &str) -> Result<(UiState, Vec<Action>), SessionError> {
        if self.engine.library().words(key).is_none() {
            return Err(SessionError::UnknownDictionary(key.to_owned()));
        }
        Ok(self.handle(Command::ChangeDict(key.to_owned())))
    }

    /// 章节选择菜单：`1..=total`，key 为从 0 开始的章节序号。
    pub fn chapter_picker(&self) -> QuickPick {
        let total = self.total_chapters();
        QuickPick {
            placeholder: format!("当前章节: {}   共 {} 章节", self.ctx.chapter + 1, total),
            items: (0..total)
                .map(|i| PickItem {
                    label: (i + 1).to_string(),
                    detail: None,
                    key: i.to_string(),
                })
                .collect(),
        }
    }

    /// 词典选择菜单。
    pub fn dictionary_picker(&self) -> QuickPick {
        let current = self
            .engine
            .library()
            .info(&self.ctx.dict_key)
            .map(|d| d.name.as_str())
            .unwrap_or(self.ctx.dict_key.as_str());
        QuickPick {
            placeholder: format!("当前字典: {current}"),
            items: self
                .engine
                .library()
                .dictionaries()
                .iter()
                .map(|d| PickItem {
                    label: d.name.clone(),
                    detail: (!d.description.is_empty()).then(|| d.description.clone()),
                    key: d.id.clone(),
                })
                .collect(),
        }
    }

    /// 结束会话：停止练习并清理所有定时器。
    pub fn shutdown(&mut self) {
        if self.ctx.started {
            info!("session shutdown while practicing");
        }
        self.ctx.started = false;
        self.ctx.timers.clear();
        self.ctx.reset_input();
    }
}
