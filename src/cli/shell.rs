//! Line-oriented interactive shell over a [`ChatStore`].
//!
//! Each input line is parsed into a [`ShellCommand`], run against the store,
//! and answered with a plain-text rendering of the resulting state.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::models::{Message, Thread, ThreadId};
use crate::store::{ChatState, ChatStore};
use crate::traits::ChatApi;

const PROMPT: &str = "> ";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Load,
    Threads,
    /// Show a thread; the current one when no id is given
    Show(Option<ThreadId>),
    /// Select a thread, or clear the selection with `none`
    Select(Option<ThreadId>),
    New { title: String, first_message: String },
    Send(String),
    Toggle(ThreadId),
    Refresh(ThreadId),
    Messages(ThreadId),
    Stats,
    Help,
    Quit,
    /// Blank line
    Empty,
}

/// Why a shell line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid thread id: {0}")]
    InvalidId(String),
}

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit,
}

/// Parse one line of shell input.
pub fn parse_line(line: &str) -> Result<ShellCommand, ShellError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => ShellCommand::Empty,
        "load" => ShellCommand::Load,
        "threads" | "ls" => ShellCommand::Threads,
        "show" if rest.is_empty() => ShellCommand::Show(None),
        "show" => ShellCommand::Show(Some(parse_id(rest)?)),
        "select" => match rest {
            "" => return Err(ShellError::Usage("select <id>|none")),
            "none" => ShellCommand::Select(None),
            id => ShellCommand::Select(Some(parse_id(id)?)),
        },
        "new" => {
            let (title, first_message) = rest
                .split_once('|')
                .map(|(title, first)| (title.trim(), first.trim()))
                .filter(|(title, first)| !title.is_empty() && !first.is_empty())
                .ok_or(ShellError::Usage("new <title> | <first message>"))?;
            ShellCommand::New {
                title: title.to_string(),
                first_message: first_message.to_string(),
            }
        }
        "send" if rest.is_empty() => return Err(ShellError::Usage("send <text>")),
        "send" => ShellCommand::Send(rest.to_string()),
        "toggle" => ShellCommand::Toggle(required_id(rest, "toggle <id>")?),
        "refresh" => ShellCommand::Refresh(required_id(rest, "refresh <id>")?),
        "messages" => ShellCommand::Messages(required_id(rest, "messages <id>")?),
        "stats" => ShellCommand::Stats,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn parse_id(raw: &str) -> Result<ThreadId, ShellError> {
    raw.parse()
        .map_err(|_| ShellError::InvalidId(raw.to_string()))
}

fn required_id(raw: &str, usage: &'static str) -> Result<ThreadId, ShellError> {
    if raw.is_empty() {
        return Err(ShellError::Usage(usage));
    }
    parse_id(raw)
}

/// Run one command against the store and render the result.
pub async fn execute<A: ChatApi + 'static>(store: &ChatStore<A>, command: ShellCommand) -> Step {
    let output = match command {
        ShellCommand::Empty => String::new(),
        ShellCommand::Quit => return Step::Quit,
        ShellCommand::Help => help_text(),
        ShellCommand::Load => match store.load_threads().await {
            Ok(()) => store.read(render_threads),
            Err(err) => format!("error: {}", err),
        },
        ShellCommand::Threads => store.read(render_threads),
        ShellCommand::Stats => store.read(render_stats),
        ShellCommand::Show(id) => store.read(|state| {
            let thread = match id {
                Some(id) => state.thread(id),
                None => state.current_thread(),
            };
            match (thread, id) {
                (Some(thread), _) => render_thread(thread),
                (None, Some(id)) => format!("no thread {}", id),
                (None, None) => "no thread selected".to_string(),
            }
        }),
        ShellCommand::Select(Some(id)) => {
            store.set_current_thread(Some(id));
            if store.read(|state| state.contains_thread(id)) {
                format!("selected thread {}", id)
            } else {
                format!("selected thread {} (not loaded)", id)
            }
        }
        ShellCommand::Select(None) => {
            store.set_current_thread(None);
            "selection cleared".to_string()
        }
        ShellCommand::New {
            title,
            first_message,
        } => match store.create_thread(&title, &first_message).await {
            Ok(id) => render_by_id(store, id),
            Err(err) => format!("error: {}", err),
        },
        ShellCommand::Send(text) => match store.send_message(&text).await {
            Ok(Some(message)) => render_message(&message),
            Ok(None) => "no thread selected".to_string(),
            Err(err) => format!("error: {}", err),
        },
        ShellCommand::Toggle(id) => match store.toggle_thread(id) {
            Some(true) => format!("thread {} is now active", id),
            Some(false) => format!("thread {} is now inactive", id),
            None => format!("no thread {}", id),
        },
        ShellCommand::Refresh(id) => match store.reload_thread(id).await {
            Ok(()) => render_by_id(store, id),
            Err(err) => format!("error: {}", err),
        },
        ShellCommand::Messages(id) => match store.load_messages(id).await {
            Ok(true) => render_by_id(store, id),
            Ok(false) => format!("no thread {} loaded; run `load` first", id),
            Err(err) => format!("error: {}", err),
        },
    };
    Step::Continue(output)
}

/// Read commands from `reader` until EOF or `quit`, writing replies to `writer`.
pub async fn run_shell<A, R, W>(store: &ChatStore<A>, reader: R, mut writer: W) -> std::io::Result<()>
where
    A: ChatApi + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match parse_line(&line) {
            Ok(command) => match execute(store, command).await {
                Step::Continue(output) => output,
                Step::Quit => break,
            },
            Err(err) => err.to_string(),
        };

        if !output.is_empty() {
            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
    }
    writer.flush().await
}

fn render_by_id<A: ChatApi + 'static>(store: &ChatStore<A>, id: ThreadId) -> String {
    store.read(|state| {
        state
            .thread(id)
            .map(render_thread)
            .unwrap_or_else(|| format!("no thread {}", id))
    })
}

/// One line per thread; `*` marks the current one.
pub fn render_threads(state: &ChatState) -> String {
    let mut lines: Vec<String> = state
        .all_threads()
        .iter()
        .map(|thread| {
            let marker = if state.current_thread_id() == Some(thread.id) {
                '*'
            } else {
                ' '
            };
            let status = if thread.is_active { "" } else { " [inactive]" };
            format!(
                "{} {:>4}  {}  ({} messages){}",
                marker,
                thread.id,
                thread.title,
                thread.message_count(),
                status
            )
        })
        .collect();

    if lines.is_empty() {
        lines.push("no threads".to_string());
    }
    if let Some(error) = state.error() {
        lines.push(format!("error: {}", error));
    }
    lines.join("\n")
}

/// Thread header followed by its messages.
pub fn render_thread(thread: &Thread) -> String {
    let mut out = format!("#{} {}", thread.id, thread.title);
    if !thread.is_active {
        out.push_str(" [inactive]");
    }
    for message in &thread.messages {
        out.push('\n');
        out.push_str(&render_message(message));
    }
    out
}

pub fn render_message(message: &Message) -> String {
    format!(
        "  {} [{}] {}",
        message.timestamp.format("%H:%M:%S"),
        message.sender,
        message.text
    )
}

pub fn render_stats(state: &ChatState) -> String {
    let mut out = format!(
        "threads: {} ({} active)\nmessages: {}\nloading: {}",
        state.total_thread_count(),
        state.active_thread_count(),
        state.total_message_count(),
        state.is_loading()
    );
    if let Some(error) = state.error() {
        out.push_str(&format!("\nerror: {}", error));
    }
    out
}

pub fn help_text() -> String {
    [
        "load                          fetch threads from the server",
        "threads                       list threads (* = current)",
        "show [id]                     show a thread, default the current one",
        "select <id>|none              change the current thread",
        "new <title> | <first message> create a thread",
        "send <text>                   send to the current thread",
        "toggle <id>                   flip a thread's active flag",
        "refresh <id>                  re-fetch one thread",
        "messages <id>                 re-fetch one thread's messages",
        "stats                         counts, loading flag and last error",
        "quit                          leave",
    ]
    .join("\n")
}
