use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// No input arrived within the tick rate. Carries the time the tick was
    /// produced so timers are fired against a single clock reading.
    Tick(Instant),
    Resize,
}

/// Polls crossterm on a background thread and forwards events over a channel.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        // Release/repeat reports would double-type digits.
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                        Ok(Event::Resize(_, _)) => AppEvent::Resize,
                        Ok(_) => continue,
                        Err(e) => {
                            tracing::error!(error = %e, "terminal event read failed");
                            return;
                        }
                    },
                    Ok(false) => AppEvent::Tick(Instant::now()),
                    Err(e) => {
                        tracing::error!(error = %e, "terminal event poll failed");
                        return;
                    }
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    /// Errors once the polling thread has stopped.
    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
