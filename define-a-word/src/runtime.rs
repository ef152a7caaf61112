use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use dictionary::{DictionaryError, Lookup, Word};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::controller::{Controller, Resolution};
use crate::ui::{self, Focus, UiState};
use crate::view::View;

const PAGE: i32 = 10;

/// Outcome of one lookup, tagged with its ticket sequence number.
pub type Resolved = (u64, Result<Vec<Word>, DictionaryError>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

pub struct App {
    controller: Controller,
    ui: UiState,
    lookup: Arc<dyn Lookup>,
    show_errors: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(lookup: Arc<dyn Lookup>, show_errors: bool, tick_rate: Duration) -> Self {
        Self {
            controller: Controller::new(),
            ui: UiState::new(),
            lookup,
            show_errors,
            tick_rate,
        }
    }

    /// Take over the terminal and pump events until the user quits.
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal).await;
        ratatui::restore();
        result
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let event_loop_running = Arc::new(AtomicBool::new(true));
        let event_loop_flag = Arc::clone(&event_loop_running);
        let event_thread = thread::spawn(move || -> Result<()> {
            while event_loop_flag.load(Ordering::Relaxed) {
                if event::poll(Duration::from_millis(50))? {
                    let event = event::read()?;
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
            Ok(())
        });

        let (resolved_tx, mut resolved_rx) = mpsc::unbounded_channel::<Resolved>();
        let mut ticker = tokio::time::interval(self.tick_rate);

        let result: Result<()> = loop {
            let view = View::from_controller(&self.controller, self.show_errors);
            if let Err(err) = terminal.draw(|frame| ui::draw(frame, &view, &mut self.ui)) {
                break Err(err.into());
            }

            tokio::select! {
                _ = ticker.tick() => {
                    if self.controller.is_pending() {
                        self.ui.throbber.calc_next();
                    }
                }
                event = event_rx.recv() => match event {
                    Some(event) => {
                        if self.handle_event(event, &resolved_tx) == Control::Quit {
                            break Ok(());
                        }
                    }
                    None => break Err(anyhow!("input event channel disconnected")),
                },
                Some((seq, outcome)) = resolved_rx.recv() => self.apply(seq, outcome),
            }
        };

        event_loop_running.store(false, Ordering::Relaxed);
        match event_thread.join() {
            Ok(join_result) => join_result?,
            Err(err) => std::panic::resume_unwind(err),
        }

        result
    }

    fn handle_event(&mut self, event: Event, resolved_tx: &mpsc::UnboundedSender<Resolved>) -> Control {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, resolved_tx),
            _ => Control::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, resolved_tx: &mpsc::UnboundedSender<Resolved>) -> Control {
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Control::Quit,
            KeyCode::Enter => self.activate(resolved_tx),
            KeyCode::Char(' ') if self.ui.focus == Focus::Button => self.activate(resolved_tx),
            KeyCode::Tab | KeyCode::BackTab => self.ui.toggle_focus(),
            KeyCode::Up => self.ui.scroll_by(-1),
            KeyCode::Down => self.ui.scroll_by(1),
            KeyCode::PageUp => self.ui.scroll_by(-PAGE),
            KeyCode::PageDown => self.ui.scroll_by(PAGE),
            _ if self.ui.focus == Focus::Input => {
                if self.ui.input.input(key) {
                    self.controller.on_text_change(self.ui.query());
                }
            }
            _ => {}
        }
        Control::Continue
    }

    /// Enter in the input, or a press of the focused button.
    fn activate(&mut self, resolved_tx: &mpsc::UnboundedSender<Resolved>) {
        // a loading button does not take clicks, the input still submits
        if self.ui.focus == Focus::Button && self.controller.is_pending() {
            return;
        }
        self.submit(resolved_tx);
    }

    fn submit(&mut self, resolved_tx: &mpsc::UnboundedSender<Resolved>) {
        let Some(ticket) = self.controller.on_submit_requested() else {
            return;
        };
        let lookup = Arc::clone(&self.lookup);
        let resolved_tx = resolved_tx.clone();
        tokio::spawn(async move {
            let outcome = lookup.lookup(&ticket.word).await;
            // the receiver is gone only once the page has been closed
            let _ = resolved_tx.send((ticket.seq, outcome));
        });
    }

    fn apply(&mut self, seq: u64, outcome: Result<Vec<Word>, DictionaryError>) {
        if self.controller.resolve(seq, outcome) != Resolution::Stale {
            self.ui.scroll = 0;
        }
    }
}
