//! 终端宿主：模拟编辑器的草稿文档与状态栏。
//!
//! 每个输入字符先插入草稿文档，再作为 `TextChange` 交给桥接层；
//! 桥接层会通过 `EditorHost::delete` 把它删掉，草稿文档因此保持干净。

use std::io::{self, Write};

use log::{debug, info, warn};
use qwerty_core::{
    bridge::{EditorHost, Position, Range, StatusBarItem, TextChange},
    config::VoiceAccent,
    model::{Sound, UiState},
};

pub const SCRATCH_URI: &str = "untitled:qwerty-scratch";

/// 有道词典发音地址（type=1 英音，type=2 美音）。
pub fn voice_url(word: &str, accent: VoiceAccent) -> String {
    let kind = match accent {
        VoiceAccent::Uk => 1,
        _ => 2,
    };
    format!(
        "https://dict.youdao.com/dictvoice?audio={}&type={kind}",
        word.replace(' ', "%20")
    )
}

pub struct TerminalHost<W> {
    out: W,
    /// 草稿文档（按行存储）
    document: Vec<String>,
    cursor: Position,
    last_status: Option<String>,
    /// 发音已“播放完”，等待主循环通知桥接层
    voice_done: bool,
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            document: vec![String::new()],
            cursor: Position::new(0, 0),
            last_status: None,
            voice_done: false,
        }
    }

    /// 在光标处插入一个字符，返回对应的文档变化事件。
    pub fn insert(&mut self, ch: char) -> TextChange {
        let at = self.cursor;
        let line = &mut self.document[at.line];
        let byte = char_to_byte(line, at.character);
        line.insert(byte, ch);
        self.cursor.character += 1;
        TextChange::insert(SCRATCH_URI, at, ch.to_string())
    }

    #[cfg(test)]
    pub fn document_text(&self) -> String {
        self.document.join("\n")
    }

    pub fn take_voice_done(&mut self) -> bool {
        std::mem::take(&mut self.voice_done)
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn status_line(ui: &UiState) -> String {
        let mut parts: Vec<&str> = StatusBarItem::ALL
            .iter()
            .map(|item| item.text(ui))
            .filter(|text| !text.is_empty())
            .collect();
        if ui.input_color.is_some() {
            parts.insert(2, "✗");
        }
        if ui.read_only {
            parts.push("[只读]");
        }
        parts.join(" | ")
    }
}

fn char_to_byte(line: &str, character: usize) -> usize {
    line.char_indices()
        .nth(character)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl<W: Write> EditorHost for TerminalHost<W> {
    fn delete(&mut self, uri: &str, range: Range) {
        if uri != SCRATCH_URI || range.start.line != range.end.line {
            warn!("unexpected delete {uri} {range:?}");
            return;
        }
        let Some(line) = self.document.get_mut(range.start.line) else {
            return;
        };
        let start = char_to_byte(line, range.start.character);
        let end = char_to_byte(line, range.end.character);
        line.replace_range(start..end, "");
        if self.cursor.line == range.start.line && self.cursor.character > range.start.character {
            let removed = range.end.character - range.start.character;
            self.cursor.character = self.cursor.character.saturating_sub(removed).max(range.start.character);
        }
    }

    fn render(&mut self, ui: &UiState) {
        let status = if ui.visible {
            Self::status_line(ui)
        } else {
            "(练习已隐藏)".to_owned()
        };
        if self.last_status.as_deref() == Some(status.as_str()) {
            return;
        }
        if let Err(err) = writeln!(self.out, "{status}").and_then(|_| self.out.flush()) {
            warn!("render failed: {err}");
        }
        self.last_status = Some(status);
    }

    fn play_sound(&mut self, sound: Sound) {
        match sound {
            Sound::Wrong => {
                if let Err(err) = write!(self.out, "\x07").and_then(|_| self.out.flush()) {
                    warn!("bell failed: {err}");
                }
            }
            other => debug!("sound {other:?}"),
        }
    }

    fn play_voice(&mut self, word: &str, accent: VoiceAccent) {
        info!("voice {}", voice_url(word, accent));
        self.voice_done = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui(visible: bool) -> UiState {
        UiState {
            visible,
            word_bar: "CET-4 chp.1/2 1/20 cancel".to_owned(),
            input_bar: "ca____".to_owned(),
            trans_bar: "取消".to_owned(),
            input_color: None,
            dict_name: "CET-4".to_owned(),
            chapter: 0,
            total_chapters: 2,
            order: 0,
            chapter_len: 20,
            read_only: false,
        }
    }

    fn output(host: TerminalHost<Vec<u8>>) -> String {
        String::from_utf8(host.into_inner()).unwrap()
    }

    #[test]
    fn insert_then_revert_leaves_document_clean() {
        let mut host = TerminalHost::new(Vec::new());
        let change = host.insert('é');
        assert_eq!(host.document_text(), "é");
        host.delete(&change.uri, change.revert_range());
        assert_eq!(host.document_text(), "");
        let change = host.insert('a');
        assert_eq!(change.range.start, Position::new(0, 0));
    }

    #[test]
    fn renders_only_on_change() {
        let mut host = TerminalHost::new(Vec::new());
        host.render(&ui(true));
        host.render(&ui(true));
        host.render(&ui(false));
        assert_eq!(
            output(host),
            "CET-4 chp.1/2 1/20 cancel | ca____ | 取消 | < | >\n(练习已隐藏)\n"
        );
    }

    #[test]
    fn wrong_input_is_marked() {
        let mut host = TerminalHost::new(Vec::new());
        let mut state = ui(true);
        state.input_color = Some("#EE3D11".to_owned());
        host.render(&state);
        assert!(output(host).starts_with("CET-4 chp.1/2 1/20 cancel | ca____ | ✗ | 取消"));
    }

    #[test]
    fn voice_completion_is_reported_once() {
        let mut host = TerminalHost::new(Vec::new());
        host.play_voice("a lot", VoiceAccent::Uk);
        assert!(host.take_voice_done());
        assert!(!host.take_voice_done());
        assert_eq!(
            voice_url("a lot", VoiceAccent::Uk),
            "https://dict.youdao.com/dictvoice?audio=a%20lot&type=1"
        );
    }
}
