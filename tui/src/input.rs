//! Input handling for the rota TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use rota_engine::{App, InputMode};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads crossterm events on a blocking task and queues them for the frame
/// loop to drain without blocking.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop2, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    fn try_next(&mut self) -> Option<InputMsg> {
        self.rx.try_recv().ok()
    }

    pub async fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

fn input_loop(stop: &AtomicBool, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "terminal event read failed");
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                tracing::debug!(error = %e, "terminal event poll failed");
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drains queued input events and applies them to the app.
///
/// Returns `Ok(true)` when the user asked to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let Some(msg) = input.try_next() else {
            break;
        };
        match msg {
            InputMsg::Error(e) => return Err(anyhow!("input error: {e}")),
            InputMsg::Event(Event::Key(
                key @ KeyEvent {
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                },
            )) => {
                if handle_key(app, key) {
                    return Ok(true);
                }
            }
            InputMsg::Event(_) => {}
        }
    }
    Ok(false)
}

fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.input_mode() {
        InputMode::Normal => handle_key_normal(app, key),
        InputMode::Insert => {
            handle_key_insert(app, key);
            false
        }
    }
}

fn handle_key_normal(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('i') | KeyCode::Char('a') => app.set_input_mode(InputMode::Insert),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
    false
}

fn handle_key_insert(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('w') => app.draft_mut().delete_word_backwards(),
            KeyCode::Char('u') => app.draft_mut().clear(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.set_input_mode(InputMode::Normal),
        KeyCode::Enter => app.add_task(),
        KeyCode::Backspace => app.draft_mut().delete_char(),
        KeyCode::Delete => app.draft_mut().delete_char_forward(),
        KeyCode::Left => app.draft_mut().move_cursor_left(),
        KeyCode::Right => app.draft_mut().move_cursor_right(),
        KeyCode::Home => app.draft_mut().move_cursor_start(),
        KeyCode::End => app.draft_mut().move_cursor_end(),
        KeyCode::Char(c) => app.draft_mut().enter_char(c),
        _ => {}
    }
}
