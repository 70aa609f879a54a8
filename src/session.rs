//! Demonstration driver: a key-handler thread and a render thread sharing one
//! [`State`].
//!
//! Each input line is one editing session. Its characters are replayed as key
//! events into the handler thread while the render thread pops snapshots on a
//! fixed interval. The session ends with a finalized frame and a reset.

use crate::frame::Frame;
use anyhow::{anyhow, Context};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use lineedit_core::{Config, HandlerAction, Key, KeyCode, Mode, State};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// The only mode the demo installs.
#[derive(Debug, Default, Clone, Copy)]
pub struct InsertMode;

impl Mode for InsertMode {
    fn name(&self) -> &str {
        "insert"
    }
}

/// Outcome of feeding one input line through a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Accepted(String),
    Eof,
    /// Input ran out before the handler asked to end the session.
    Abandoned,
}

/// Translate a line of input into the key events a terminal would deliver.
///
/// DEL (`\x7f`) becomes Backspace, other control bytes become Ctrl chords, and
/// an Enter is appended.
pub fn keys_for_line(line: &str) -> Vec<Key> {
    let mut keys: Vec<Key> = line
        .chars()
        .map(|c| match c {
            '\u{7f}' | '\u{8}' => Key::plain(KeyCode::Backspace),
            '\t' => Key::plain(KeyCode::Tab),
            '\u{1}'..='\u{1a}' => Key::ctrl(char::from(b'a' + (c as u8 - 1))),
            _ => Key::char(c),
        })
        .collect();
    keys.push(Key::plain(KeyCode::Enter));
    keys
}

fn prev_boundary(code: &str, dot: usize) -> usize {
    code[..dot]
        .char_indices()
        .next_back()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn next_boundary(code: &str, dot: usize) -> usize {
    code[dot..]
        .chars()
        .next()
        .map(|c| dot + c.len_utf8())
        .unwrap_or(dot)
}

/// Apply one key to the shared state.
///
/// Cursor movement and deletion step over whole chars so dot stays on a char
/// boundary.
pub fn handle_key(state: &State, key: Key) {
    state.set_last_key(key);

    if let Some(c) = key.printable() {
        state.update(|raw| {
            raw.code.insert(raw.dot, c);
            raw.dot += c.len_utf8();
        });
        return;
    }

    match (key.code, key.mods.ctrl) {
        (KeyCode::Enter, false) => state.set_next_action(HandlerAction::ReturnLine),
        (KeyCode::Char('d'), true) => state.update(|raw| {
            if raw.code.is_empty() {
                raw.next_action = HandlerAction::ReturnEof;
            } else {
                raw.notes.push("Ctrl-D ignored on a non-empty line".to_string());
            }
        }),
        (KeyCode::Backspace, false) => state.update(|raw| {
            if raw.dot > 0 {
                let start = prev_boundary(&raw.code, raw.dot);
                raw.code.replace_range(start..raw.dot, "");
                raw.dot = start;
            }
        }),
        (KeyCode::Delete, false) => state.update(|raw| {
            let end = next_boundary(&raw.code, raw.dot);
            raw.code.replace_range(raw.dot..end, "");
        }),
        (KeyCode::Left, false) => state.update(|raw| raw.dot = prev_boundary(&raw.code, raw.dot)),
        (KeyCode::Right, false) => state.update(|raw| raw.dot = next_boundary(&raw.code, raw.dot)),
        (KeyCode::Home, false) => state.set_dot(0),
        (KeyCode::End, false) => state.update(|raw| raw.dot = raw.code.len()),
        _ => state.add_note(format!("unbound key {key}")),
    }
}

/// Handle to a running render thread.
pub struct RendererHandle {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

impl RendererHandle {
    /// Ask the render thread for a last pop and wait for it to exit.
    ///
    /// # Errors
    /// Returns an error when the render thread panicked.
    pub fn stop(self) -> anyhow::Result<()> {
        drop(self.stop_tx);
        self.thread
            .join()
            .map_err(|_| anyhow!("render thread panicked"))
    }
}

/// Spawn the render thread.
///
/// Every `interval` it pops the state and sends the frame when it differs
/// from the previous one. Stopping performs one final pop so notes added just
/// before the stop are still delivered.
///
/// # Errors
/// Returns an error if the thread cannot be spawned.
pub fn spawn_renderer(
    state: Arc<State>,
    interval: Duration,
    frame_tx: Sender<Frame>,
) -> anyhow::Result<RendererHandle> {
    let (stop_tx, stop_rx) = bounded::<()>(0);
    let thread = thread::Builder::new()
        .name("lineedit-render".to_string())
        .spawn(move || render_loop(&state, interval, &stop_rx, &frame_tx))
        .context("failed to spawn render thread")?;
    Ok(RendererHandle { stop_tx, thread })
}

fn render_loop(state: &State, interval: Duration, stop_rx: &Receiver<()>, frame_tx: &Sender<Frame>) {
    let mut last: Option<Frame> = None;
    loop {
        let stopping = match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        };
        let frame = Frame::from_snapshot(&state.pop_for_redraw());
        if last.as_ref() != Some(&frame) {
            if frame_tx.send(frame.clone()).is_err() {
                debug!("frame receiver dropped; stopping render loop");
                return;
            }
            last = Some(frame);
        }
        if stopping {
            return;
        }
    }
}

fn write_frame<W: Write>(output: &mut W, config: &Config, frame: &Frame) -> anyhow::Result<()> {
    if config.json_frames {
        serde_json::to_writer(&mut *output, frame).context("failed to encode frame")?;
        writeln!(output)?;
    } else {
        writeln!(output, "{}", frame.to_text(&config.prompt))?;
    }
    Ok(())
}

/// Run one editing session over `keys`.
///
/// # Errors
/// Returns an error when a worker thread panics or the output fails.
pub fn run_line<W: Write>(
    state: &Arc<State>,
    config: &Config,
    keys: Vec<Key>,
    output: &mut W,
) -> anyhow::Result<SessionOutcome> {
    state.reset();
    state.set_mode(Some(Arc::new(InsertMode)));

    let (key_tx, key_rx) = unbounded::<Key>();
    let (frame_tx, frame_rx) = unbounded::<Frame>();

    let handler = {
        let state = Arc::clone(state);
        thread::Builder::new()
            .name("lineedit-keys".to_string())
            .spawn(move || {
                for key in key_rx {
                    handle_key(&state, key);
                    if state.next_action().ends_session() {
                        break;
                    }
                }
            })
            .context("failed to spawn key handler thread")?
    };
    let renderer = spawn_renderer(Arc::clone(state), config.redraw_interval(), frame_tx)?;

    for key in keys {
        // The handler stops reading once the session ends; drop the rest.
        if key_tx.send(key).is_err() {
            break;
        }
    }
    drop(key_tx);
    handler
        .join()
        .map_err(|_| anyhow!("key handler thread panicked"))?;
    renderer.stop()?;

    for frame in frame_rx.try_iter() {
        write_frame(output, config, &frame)?;
    }
    write_frame(output, config, &Frame::from_snapshot(&state.finalize()))?;

    let outcome = match state.next_action() {
        HandlerAction::ReturnLine => SessionOutcome::Accepted(state.code()),
        HandlerAction::ReturnEof => SessionOutcome::Eof,
        HandlerAction::NoAction => SessionOutcome::Abandoned,
    };
    state.reset();
    Ok(outcome)
}

/// Run one session per input line until input or a Ctrl-D ends it.
///
/// # Returns
/// The accepted lines, in input order.
///
/// # Errors
/// Returns an error when reading input, writing frames or a worker thread
/// fails.
pub fn run_session<R: BufRead, W: Write>(
    config: &Config,
    input: R,
    mut output: W,
) -> anyhow::Result<Vec<String>> {
    let state = Arc::new(State::new());
    let mut accepted = Vec::new();
    for line in input.lines() {
        let line = line.context("failed to read input line")?;
        match run_line(&state, config, keys_for_line(&line), &mut output)? {
            SessionOutcome::Accepted(code) => {
                info!(len = code.len(), "line accepted");
                accepted.push(code);
            }
            SessionOutcome::Eof => {
                info!("end of input requested");
                break;
            }
            SessionOutcome::Abandoned => debug!("session ended without an action"),
        }
    }
    output.flush()?;
    Ok(accepted)
}
