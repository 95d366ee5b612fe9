mod host;
mod store;

use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use log::{info, warn};
use qwerty_core::{
    bridge::{EditorBridge, EditorEvents},
    engine::Engine,
    key_event::Command,
    model::{DictionaryInfo, QuickPick},
    session::Session,
};
use qwerty_dict::{DictError, Library};

use crate::{
    host::TerminalHost,
    store::{ProgressStore, StoreError},
};

const TICK: Duration = Duration::from_millis(100);
const DEFAULT_PROGRESS_FILE: &str = "qwerty-progress.json";

type Bridge = EditorBridge<Library, TerminalHost<io::Stdout>>;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Dict(#[from] DictError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Session(#[from] qwerty_core::SessionError),
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    progress: Option<PathBuf>,
    dict: Option<String>,
    /// (id, path)
    dict_files: Vec<(String, PathBuf)>,
}

/// 主循环收到的事件：按到达顺序串行处理。
enum HostEvent {
    Line(String),
    Tick,
    Eof,
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => store::load_config(path)?,
        None => Default::default(),
    };

    let mut library = Library::builtin()?;
    for (id, path) in &args.dict_files {
        let info = DictionaryInfo {
            id: id.clone(),
            name: id.clone(),
            description: path.display().to_string(),
            language: String::new(),
        };
        library.load_file(info, path)?;
    }

    let progress_store = ProgressStore::new(
        args.progress
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRESS_FILE)),
    );
    let mut session = Session::new(Engine::new(library), config);
    match progress_store.load() {
        Ok(Some(progress)) => session = session.with_progress(&progress),
        Ok(None) => {}
        Err(err) => warn!("ignoring saved progress: {err}"),
    }
    if let Some(key) = &args.dict {
        session.select_dictionary(key)?;
    }

    let mut bridge = EditorBridge::new(session, TerminalHost::new(io::stdout()));
    bridge.host_mut().message("qwerty-rs 单词打字练习 | 输入 :help 查看命令，:start 开始")?;

    let result = run(&mut bridge);

    let progress = bridge.session().progress();
    if let Err(err) = progress_store.save(&progress) {
        warn!("failed to save progress: {err}");
    } else {
        info!("progress saved to {:?}", progress_store.path());
    }
    bridge.deactivate();
    result
}

fn parse_args() -> Args {
    let mut out = Args::default();
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--config" => out.config = args.next().map(PathBuf::from),
            "--progress" => out.progress = args.next().map(PathBuf::from),
            "--dict" => out.dict = args.next(),
            "--dict-file" => {
                if let (Some(id), Some(path)) = (args.next(), args.next()) {
                    out.dict_files.push((id, PathBuf::from(path)));
                }
            }
            "--help" | "-h" => print_help(),
            other => warn!("unknown argument {other}"),
        }
    }
    out
}

fn print_help() -> ! {
    println!(
        "用法：qwerty_cli [--config <json>] [--progress <json>] [--dict <id>] [--dict-file <id> <json>]\n\
         交互：输入一行文字即逐字符练习；以 : 开头的是命令（:help 查看）"
    );
    std::process::exit(0);
}

const COMMANDS_HELP: &str = "\
:start            开始/结束练习
:next / :prev     下一个/上一个单词
:chapter [n]      查看/切换章节
:dict [id]        查看/切换词典
:visible          显示/隐藏单词（默写）
:readonly         只读模式（自动切换单词）
:voice            播放发音
:set <key> <val>  修改配置（placeholder/chapterLength/highlightWrongColor/highlightWrongDelay/readOnlyInterval/voiceType）
:q                退出";

fn run(bridge: &mut Bridge) -> Result<(), AppError> {
    let (tx, rx) = mpsc::channel();

    let stdin_tx = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if stdin_tx.send(HostEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = stdin_tx.send(HostEvent::Eof);
    });
    thread::spawn(move || {
        loop {
            thread::sleep(TICK);
            if tx.send(HostEvent::Tick).is_err() {
                break;
            }
        }
    });

    let started_at = Instant::now();
    let now_ms = || started_at.elapsed().as_millis() as u64;
    for event in rx {
        match event {
            HostEvent::Tick => bridge.on_tick(now_ms()),
            HostEvent::Line(line) => {
                bridge.on_tick(now_ms());
                if !handle_line(bridge, &line)? {
                    break;
                }
            }
            HostEvent::Eof => break,
        }
        if bridge.host_mut().take_voice_done() {
            bridge.voice_finished();
        }
    }
    Ok(())
}

/// 处理一行输入；返回 false 表示退出。
fn handle_line(bridge: &mut Bridge, line: &str) -> Result<bool, AppError> {
    let Some(command) = line.trim().strip_prefix(':') else {
        type_text(bridge, line)?;
        return Ok(true);
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();
    match name {
        "q" | "quit" | "exit" => return Ok(false),
        "help" | "h" => bridge.host_mut().message(COMMANDS_HELP)?,
        "start" => bridge.execute(Command::Start)?,
        "next" => bridge.execute(Command::NextWord)?,
        "prev" => bridge.execute(Command::PrevWord)?,
        "visible" => bridge.execute(Command::ToggleWordVisibility)?,
        "readonly" => bridge.execute(Command::ToggleReadOnly)?,
        "voice" => bridge.execute(Command::PlayVoice)?,
        "chapter" => match arg.map(str::parse::<usize>) {
            None => {
                let pick = bridge.chapter_picker();
                show_pick(bridge, &pick)?;
            }
            Some(Ok(n)) if n >= 1 => execute_picked(bridge, Command::ChangeChapter(n - 1))?,
            Some(_) => bridge.host_mut().message("章节序号应为正整数")?,
        },
        "dict" => match arg {
            None => {
                let pick = bridge.dictionary_picker();
                show_pick(bridge, &pick)?;
            }
            Some(key) => execute_picked(bridge, Command::ChangeDict(key.to_owned()))?,
        },
        "set" => {
            let value = parts.collect::<Vec<_>>().join(" ");
            let Some(key) = arg else {
                bridge.host_mut().message("用法：:set <key> <value>")?;
                return Ok(true);
            };
            let mut config = bridge.session().config().clone();
            match config.set(key, &value) {
                Ok(_) => bridge.on_config_change(config),
                Err(err) => bridge.host_mut().message(&err.to_string())?,
            }
        }
        other => bridge.host_mut().message(&format!("未知命令 :{other}，输入 :help 查看命令"))?,
    }
    Ok(true)
}

/// 逐字符输入到草稿文档；未开始练习时不写入，草稿不会越积越多。
fn type_text<W: Write>(bridge: &mut EditorBridge<Library, TerminalHost<W>>, text: &str) -> io::Result<()> {
    if !bridge.session().is_started() {
        if !text.is_empty() {
            bridge.host_mut().message("练习尚未开始，输入 :start 开始")?;
        }
        return Ok(());
    }
    for ch in text.chars() {
        let change = bridge.host_mut().insert(ch);
        bridge.on_text_change(&change);
    }
    Ok(())
}

/// 菜单选择的结果可能越界：提示后继续。
fn execute_picked(bridge: &mut Bridge, command: Command) -> io::Result<()> {
    if let Err(err) = bridge.execute(command) {
        bridge.host_mut().message(&err.to_string())?;
    }
    Ok(())
}

fn show_pick(bridge: &mut Bridge, pick: &QuickPick) -> io::Result<()> {
    let host = bridge.host_mut();
    host.message(&pick.placeholder)?;
    for item in &pick.items {
        match &item.detail {
            Some(detail) => host.message(&format!("  {} [{}]  {detail}", item.label, item.key))?,
            None => host.message(&format!("  {}", item.label))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwerty_core::config::{Config, VoiceAccent};

    fn bridge() -> EditorBridge<Library, TerminalHost<Vec<u8>>> {
        let config = Config {
            voice: VoiceAccent::Off,
            ..Config::default()
        };
        let session = Session::new(Engine::new(Library::builtin().unwrap()), config);
        EditorBridge::new(session, TerminalHost::new(Vec::new()))
    }

    #[test]
    fn scratch_stays_clean_before_and_after_start() {
        let mut bridge = bridge();
        type_text(&mut bridge, "abc").unwrap();
        assert_eq!(bridge.host().document_text(), "");

        bridge.execute(Command::Start).unwrap();
        type_text(&mut bridge, "xyz").unwrap();
        assert_eq!(bridge.host().document_text(), "");
        assert_eq!(bridge.session().context().input, "x");
    }
}
