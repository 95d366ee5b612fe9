//! `Context`：processor 链共享的唯一状态容器（练习会话的 plugin state）。
//!
//! 约定：
//! - `chapter/order`：当前章节与章节内单词序号，始终落在合法范围内
//! - `input`：当前单词已输入的部分；`wrong` 为真时不再接收输入，等待高亮结束
//! - `timers`：只读模式与错误高亮的定时器，随会话一起销毁
use log::{debug, info};

use crate::{
    comparator::{Comparison, compare},
    config::{Config, ConfigKey, VoiceAccent},
    dictionary::{chapter_slice, total_chapters},
    error::SessionError,
    key_event::Action,
    model::{Progress, UiState, Word},
    processor::EngineFacade,
    scheduler::{Scheduler, TimerKind},
};

#[derive(Debug, Clone)]
pub struct Context {
    /// 当前词典 id
    pub dict_key: String,
    /// 当前章节（从 0 开始）
    pub chapter: usize,
    /// 当前单词在章节内的序号（从 0 开始）
    pub order: usize,
    /// 已输入内容
    pub input: String,
    /// 是否处于输入错误的高亮阶段
    pub wrong: bool,
    /// 是否处于练习中（状态栏可见）
    pub started: bool,
    /// 是否显示单词（关闭时用占位符代替，即“默写”）
    pub word_visibility: bool,
    /// 只读模式：按固定间隔自动切换单词
    pub read_only: bool,
    /// 发音锁：避免同时播放多个发音
    pub voice_lock: bool,
    pub config: Config,
    /// 最近一次 Tick 的时间
    pub now_ms: u64,
    pub timers: Scheduler,
}

impl Context {
    pub fn new(dict_key: impl Into<String>, config: Config) -> Self {
        Self {
            dict_key: dict_key.into(),
            chapter: 0,
            order: 0,
            input: String::new(),
            wrong: false,
            started: false,
            word_visibility: true,
            read_only: false,
            voice_lock: false,
            config,
            now_ms: 0,
            timers: Scheduler::new(),
        }
    }

    pub fn words<'e>(&self, engine: &'e dyn EngineFacade) -> &'e [Word] {
        engine.words(&self.dict_key).unwrap_or(&[])
    }

    pub fn total_chapters(&self, engine: &dyn EngineFacade) -> usize {
        total_chapters(self.words(engine).len(), self.config.chapter_length())
    }

    pub fn chapter_words<'e>(&self, engine: &'e dyn EngineFacade) -> &'e [Word] {
        chapter_slice(self.words(engine), self.chapter, self.config.chapter_length())
    }

    pub fn current_word<'e>(&self, engine: &'e dyn EngineFacade) -> Option<&'e Word> {
        self.chapter_words(engine).get(self.order)
    }

    /// 当前单词在整本词典中的位置。
    fn position(&self) -> usize {
        self.chapter * self.config.chapter_length() + self.order
    }

    /// 把 chapter/order 拉回合法范围。
    fn clamp(&mut self, engine: &dyn EngineFacade) {
        let total = self.total_chapters(engine);
        if self.chapter >= total {
            self.chapter = total - 1;
        }
        let len = self.chapter_words(engine).len();
        if self.order >= len {
            self.order = len.saturating_sub(1);
        }
    }

    /// 清空输入并结束错误高亮。
    pub fn reset_input(&mut self) {
        self.input.clear();
        self.wrong = false;
        self.timers.cancel(TimerKind::WrongFlash);
    }

    /// 下一个单词：章节末尾进入下一章，最后一章之后回到第 0 章。
    pub fn next_word(&mut self, engine: &dyn EngineFacade) {
        let len = self.chapter_words(engine).len();
        if self.order + 1 < len {
            self.order += 1;
        } else {
            self.order = 0;
            self.chapter = (self.chapter + 1) % self.total_chapters(engine);
        }
        self.reset_input();
    }

    /// 上一个单词：章节开头回到上一章最后一个单词，第 0 章回到最后一章。
    pub fn prev_word(&mut self, engine: &dyn EngineFacade) {
        if self.order > 0 {
            self.order -= 1;
        } else {
            let total = self.total_chapters(engine);
            self.chapter = if self.chapter == 0 { total - 1 } else { self.chapter - 1 };
            self.order = self.chapter_words(engine).len().saturating_sub(1);
        }
        self.reset_input();
    }

    /// 完成当前单词（输入正确或只读模式到时）。
    pub fn finish_word(&mut self, engine: &dyn EngineFacade) {
        debug!("finish word {}:{}:{}", self.dict_key, self.chapter, self.order);
        self.next_word(engine);
    }

    pub fn set_chapter(&mut self, engine: &dyn EngineFacade, chapter: usize) -> Result<(), SessionError> {
        let total = self.total_chapters(engine);
        if chapter >= total {
            return Err(SessionError::ChapterOutOfRange { chapter, total });
        }
        self.chapter = chapter;
        self.order = 0;
        self.reset_input();
        Ok(())
    }

    pub fn set_dict(&mut self, engine: &dyn EngineFacade, dict_key: &str) -> Result<(), SessionError> {
        if engine.words(dict_key).is_none() {
            return Err(SessionError::UnknownDictionary(dict_key.to_owned()));
        }
        info!("switch dictionary {} -> {}", self.dict_key, dict_key);
        self.dict_key = dict_key.to_owned();
        self.chapter = 0;
        self.order = 0;
        self.reset_input();
        Ok(())
    }

    /// 追加一个字符并与当前单词比较。
    pub fn push_char(&mut self, engine: &dyn EngineFacade, ch: char) -> Comparison {
        self.input.push(ch);
        match self.current_word(engine) {
            Some(word) => compare(&self.input, &word.name),
            None => Comparison::Mismatch(0),
        }
    }

    /// 进入错误高亮阶段，`highlight_wrong_delay` 后由 `WrongFlash` 定时器复位。
    pub fn mark_wrong(&mut self) {
        self.wrong = true;
        self.timers
            .schedule_once(TimerKind::WrongFlash, self.now_ms, self.config.highlight_wrong_delay);
    }

    pub fn clear_wrong(&mut self) {
        self.wrong = false;
        self.input.clear();
    }

    /// 只读模式且练习中时挂上自动切词定时器（已存在则不重复挂）。
    pub fn arm_read_only(&mut self) {
        if self.read_only && self.started {
            let armed = self
                .timers
                .schedule_interval(TimerKind::ReadOnly, self.now_ms, self.config.read_only_interval);
            if armed {
                debug!("read-only timer armed every {}ms", self.config.read_only_interval);
            }
        }
    }

    pub fn disarm_read_only(&mut self) {
        if self.timers.cancel(TimerKind::ReadOnly) {
            debug!("read-only timer cancelled");
        }
    }

    /// 请求播放当前单词的发音；发音锁被占用或发音关闭时返回 None。
    pub fn voice_action(&mut self, engine: &dyn EngineFacade) -> Option<Action> {
        if !self.started || self.voice_lock || self.config.voice == VoiceAccent::Off {
            return None;
        }
        let word = self.current_word(engine)?;
        self.voice_lock = true;
        Some(Action::PlayVoice {
            word: word.name.clone(),
            accent: self.config.voice,
        })
    }

    /// 应用新配置，返回发生变化的配置项。
    ///
    /// 章节长度变化时保持当前单词在词典中的绝对位置不变。
    pub fn apply_config(&mut self, engine: &dyn EngineFacade, config: Config) -> Vec<ConfigKey> {
        let changed = self.config.diff(&config);
        let position = self.position();
        self.config = config;

        if changed.contains(&ConfigKey::ChapterLength) {
            let len = self.config.chapter_length();
            self.chapter = position / len;
            self.order = position % len;
            self.clamp(engine);
        }
        if changed.contains(&ConfigKey::ReadOnlyInterval) && self.timers.cancel(TimerKind::ReadOnly) {
            self.arm_read_only();
        }
        changed
    }

    pub fn progress(&self) -> Progress {
        Progress {
            dict_key: self.dict_key.clone(),
            chapter: self.chapter,
            order: self.order,
        }
    }

    /// 恢复进度；未知词典退回默认词典，越界的章节/序号被拉回范围内。
    pub fn restore(&mut self, engine: &dyn EngineFacade, progress: &Progress) {
        self.dict_key = if engine.words(&progress.dict_key).is_some() {
            progress.dict_key.clone()
        } else {
            engine.default_key().to_owned()
        };
        self.chapter = progress.chapter;
        self.order = progress.order;
        self.clamp(engine);
        self.reset_input();
    }

    /// 生成 UI 层只读快照。
    pub fn ui_state(&self, engine: &dyn EngineFacade) -> UiState {
        let dict_name = engine
            .info(&self.dict_key)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| self.dict_key.clone());
        let total = self.total_chapters(engine);
        let chapter_len = self.chapter_words(engine).len();
        let placeholder = self.config.placeholder();

        let (word_bar, input_bar, trans_bar) = match self.current_word(engine) {
            Some(word) => {
                let shown = if self.word_visibility {
                    word.name.clone()
                } else {
                    placeholder.repeat(word.char_count())
                };
                let remaining = word.char_count().saturating_sub(self.input.chars().count());
                (
                    format!(
                        "{dict_name} chp.{}/{total} {}/{chapter_len} {shown}",
                        self.chapter + 1,
                        self.order + 1
                    ),
                    format!("{}{}", self.input, placeholder.repeat(remaining)),
                    self.trans_text(word),
                )
            }
            None => (dict_name.clone(), String::new(), String::new()),
        };

        UiState {
            visible: self.started,
            word_bar,
            input_bar,
            trans_bar,
            input_color: self.wrong.then(|| self.config.highlight_wrong_color.clone()),
            dict_name,
            chapter: self.chapter,
            total_chapters: total,
            order: self.order,
            chapter_len,
            read_only: self.read_only,
        }
    }

    fn trans_text(&self, word: &Word) -> String {
        let phone = match self.config.voice {
            VoiceAccent::Uk => word.uk_phone.as_ref().or(word.us_phone.as_ref()),
            _ => word.us_phone.as_ref().or(word.uk_phone.as_ref()),
        };
        let trans = word.trans.join("; ");
        match phone {
            Some(p) if !p.is_empty() => format!("/{p}/ {trans}"),
            _ => trans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DictionaryInfo;

    struct Fixture {
        dicts: Vec<DictionaryInfo>,
        words: Vec<Word>,
    }

    impl EngineFacade for Fixture {
        fn dictionaries(&self) -> &[DictionaryInfo] {
            &self.dicts
        }
        fn words(&self, dict_key: &str) -> Option<&[Word]> {
            (dict_key == "t").then_some(self.words.as_slice())
        }
        fn default_key(&self) -> &str {
            "t"
        }
    }

    fn fixture(n: usize) -> Fixture {
        Fixture {
            dicts: vec![DictionaryInfo {
                id: "t".to_owned(),
                name: "Test".to_owned(),
                description: String::new(),
                language: "en".to_owned(),
            }],
            words: (0..n).map(|i| Word::new(format!("w{i}"), &["t"])).collect(),
        }
    }

    fn context(chapter_length: usize) -> Context {
        Context::new(
            "t",
            Config {
                chapter_length,
                ..Config::default()
            },
        )
    }

    #[test]
    fn next_crosses_into_next_chapter_and_wraps() {
        let f = fixture(5);
        let mut ctx = context(2);
        ctx.order = 1;
        ctx.next_word(&f);
        assert_eq!((ctx.chapter, ctx.order), (1, 0));

        ctx.chapter = 2;
        ctx.order = 0;
        ctx.next_word(&f);
        assert_eq!((ctx.chapter, ctx.order), (0, 0));
    }

    #[test]
    fn prev_goes_to_last_word_of_previous_chapter() {
        let f = fixture(5);
        let mut ctx = context(2);
        ctx.prev_word(&f);
        assert_eq!((ctx.chapter, ctx.order), (2, 0));
        ctx.prev_word(&f);
        assert_eq!((ctx.chapter, ctx.order), (1, 1));
    }

    #[test]
    fn chapter_length_change_keeps_absolute_position() {
        let f = fixture(50);
        let mut ctx = context(20);
        ctx.chapter = 1;
        ctx.order = 3;
        let changed = ctx.apply_config(
            &f,
            Config {
                chapter_length: 10,
                ..Config::default()
            },
        );
        assert_eq!(changed, vec![ConfigKey::ChapterLength]);
        assert_eq!((ctx.chapter, ctx.order), (2, 3));
    }

    #[test]
    fn restore_clamps_and_falls_back() {
        let f = fixture(5);
        let mut ctx = context(2);
        ctx.restore(
            &f,
            &Progress {
                dict_key: "gone".to_owned(),
                chapter: 7,
                order: 9,
            },
        );
        assert_eq!(ctx.dict_key, "t");
        assert_eq!((ctx.chapter, ctx.order), (2, 0));
    }

    #[test]
    fn ui_state_hides_word_with_placeholders() {
        let f = fixture(3);
        let mut ctx = context(20);
        ctx.started = true;
        ctx.word_visibility = false;
        ctx.input.push('w');
        let ui = ctx.ui_state(&f);
        assert!(ui.visible);
        assert_eq!(ui.word_bar, "Test chp.1/1 1/3 __");
        assert_eq!(ui.input_bar, "w_");
        assert_eq!(ui.trans_bar, "t");
        assert_eq!(ui.input_color, None);
    }

    #[test]
    fn trans_bar_prefers_accent_phonetic() {
        let mut f = fixture(1);
        f.words[0].us_phone = Some("ʌs".to_owned());
        f.words[0].uk_phone = Some("juːkeɪ".to_owned());
        let mut ctx = context(20);
        assert_eq!(ctx.ui_state(&f).trans_bar, "/ʌs/ t");
        ctx.config.voice = VoiceAccent::Uk;
        assert_eq!(ctx.ui_state(&f).trans_bar, "/juːkeɪ/ t");
    }

    #[test]
    fn voice_respects_lock() {
        let f = fixture(2);
        let mut ctx = context(20);
        assert_eq!(ctx.voice_action(&f), None);
        ctx.started = true;
        assert!(ctx.voice_action(&f).is_some());
        assert!(ctx.voice_action(&f).is_none());
        ctx.voice_lock = false;
        ctx.config.voice = VoiceAccent::Off;
        assert!(ctx.voice_action(&f).is_none());
    }
}
