//! `processor`：输入事件处理链。
//!
//! 按顺序处理 `InputEvent`，对 `Context` 做状态变更，并可产生 `Action`（提示音、发音）。
//!
//! 当前链路（`Session::new` 默认组装）：
//! - `ClockProcessor`：推进时钟，触发到期定时器（只读模式切词、错误高亮复位）
//! - `TypingProcessor`：练习输入（Char），比较并推进单词
//! - `NavigationProcessor`：上/下一个单词、切换章节、切换词典
//! - `ModeProcessor`：开始/结束、单词可见性、只读模式
//! - `VoiceProcessor`：播放发音、释放发音锁
//! - `ConfigProcessor`：应用配置变化

use log::{debug, info, warn};

use crate::{
    comparator::Comparison,
    context::Context,
    key_event::{Action, Command, InputEvent},
    model::{DictionaryInfo, Sound, Word},
    scheduler::TimerKind,
};

/// 给 processors 的对象安全引擎接口（避免在 processors 层引入泛型）。
pub trait EngineFacade {
    fn dictionaries(&self) -> &[DictionaryInfo];
    fn words(&self, dict_key: &str) -> Option<&[Word]>;
    fn default_key(&self) -> &str;

    fn info(&self, dict_key: &str) -> Option<&DictionaryInfo> {
        self.dictionaries().iter().find(|d| d.id == dict_key)
    }
}

/// Processor 执行结果：是否“消费”了本次事件。
///
/// - `Consume`：本 processor 已处理该事件，后续 processor 不再执行
/// - `Continue`：本 processor 不处理该事件，交给下一个 processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Consume,
    Continue,
}

/// Processor：处理输入事件并改变 Context；必要时产生输出动作。
pub trait Processor: Send + Sync {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>);
}

pub struct ClockProcessor;

impl Processor for ClockProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let InputEvent::Tick(now_ms) = *input_event else {
            return (ProcessStatus::Continue, Vec::new());
        };
        // 时钟只前进
        context.now_ms = context.now_ms.max(now_ms);
        let mut actions = Vec::new();
        for kind in context.timers.fire_due(context.now_ms) {
            match kind {
                TimerKind::WrongFlash => context.clear_wrong(),
                TimerKind::ReadOnly => {
                    if context.started && context.read_only {
                        context.finish_word(engine);
                        actions.extend(context.voice_action(engine));
                    }
                }
            }
        }
        (ProcessStatus::Consume, actions)
    }
}

/// 练习输入：只在练习中且不处于错误高亮阶段时接收字符。
pub struct TypingProcessor;

impl Processor for TypingProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let InputEvent::Char(ch) = *input_event else {
            return (ProcessStatus::Continue, Vec::new());
        };
        if !context.started || context.wrong || context.current_word(engine).is_none() {
            return (ProcessStatus::Consume, Vec::new());
        }

        let mut actions = vec![Action::Sound(Sound::Click)];
        match context.push_char(engine, ch) {
            Comparison::Continue => {}
            Comparison::Complete => {
                actions.push(Action::Sound(Sound::Success));
                context.finish_word(engine);
                actions.extend(context.voice_action(engine));
            }
            Comparison::Mismatch(at) => {
                debug!("mismatch at {at}: {:?}", context.input);
                context.mark_wrong();
                actions.push(Action::Sound(Sound::Wrong));
            }
        }
        (ProcessStatus::Consume, actions)
    }
}

pub struct NavigationProcessor;

impl Processor for NavigationProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let InputEvent::Command(command) = input_event else {
            return (ProcessStatus::Continue, Vec::new());
        };
        let result = match command {
            Command::NextWord => {
                context.next_word(engine);
                Ok(())
            }
            Command::PrevWord => {
                context.prev_word(engine);
                Ok(())
            }
            Command::ChangeChapter(chapter) => context.set_chapter(engine, *chapter),
            Command::ChangeDict(key) => context.set_dict(engine, key),
            _ => return (ProcessStatus::Continue, Vec::new()),
        };
        match result {
            Ok(()) => (ProcessStatus::Consume, context.voice_action(engine).into_iter().collect()),
            Err(err) => {
                warn!("{} ignored: {err}", command.id());
                (ProcessStatus::Consume, Vec::new())
            }
        }
    }
}

pub struct ModeProcessor;

impl Processor for ModeProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let InputEvent::Command(command) = input_event else {
            return (ProcessStatus::Continue, Vec::new());
        };
        let mut actions = Vec::new();
        match command {
            Command::Start => {
                context.started = !context.started;
                context.reset_input();
                if context.started {
                    info!("practice started: {}", context.dict_key);
                    context.arm_read_only();
                    actions.extend(context.voice_action(engine));
                } else {
                    info!("practice stopped");
                    context.timers.clear();
                }
            }
            Command::ToggleWordVisibility => {
                context.word_visibility = !context.word_visibility;
            }
            Command::ToggleReadOnly => {
                context.read_only = !context.read_only;
                if context.read_only {
                    context.arm_read_only();
                } else {
                    context.disarm_read_only();
                }
            }
            _ => return (ProcessStatus::Continue, Vec::new()),
        }
        (ProcessStatus::Consume, actions)
    }
}

pub struct VoiceProcessor;

impl Processor for VoiceProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        match input_event {
            InputEvent::Command(Command::PlayVoice) => (
                ProcessStatus::Consume,
                context.voice_action(engine).into_iter().collect(),
            ),
            InputEvent::VoiceFinished => {
                context.voice_lock = false;
                (ProcessStatus::Consume, Vec::new())
            }
            _ => (ProcessStatus::Continue, Vec::new()),
        }
    }
}

pub struct ConfigProcessor;

impl Processor for ConfigProcessor {
    fn process(
        &mut self,
        engine: &dyn EngineFacade,
        context: &mut Context,
        input_event: &InputEvent,
    ) -> (ProcessStatus, Vec<Action>) {
        let InputEvent::ConfigChanged(config) = input_event else {
            return (ProcessStatus::Continue, Vec::new());
        };
        let changed = context.apply_config(engine, config.clone());
        if !changed.is_empty() {
            debug!(
                "config changed: {:?}",
                changed.iter().map(|k| k.name()).collect::<Vec<_>>()
            );
        }
        (ProcessStatus::Consume, Vec::new())
    }
}
