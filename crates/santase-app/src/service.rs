use parking_lot::{Mutex, RwLock};
use santase_core::error::GameError;
use santase_core::game::event::GameEvent;
use santase_core::game::state::GameState;
use santase_core::game::table::{Ack, Table};
use santase_core::model::moves::Move;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("the game service has stopped")]
    Stopped,
}

type Reply = Sender<Result<Ack, GameError>>;

enum Command {
    Submit { mv: Move, reply: Reply },
    Shutdown,
}

/// Subscribers whose receiver was dropped are pruned on the next publish.
#[derive(Default)]
struct Broadcast {
    subscribers: Mutex<Vec<Sender<GameEvent>>>,
}

impl Broadcast {
    fn subscribe(&self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    fn publish(&self, events: &[GameEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| events.iter().all(|event| tx.send(event.clone()).is_ok()));
    }
}

/// Runs a [`Table`] on its own thread. Moves go through a single command
/// queue; readers see the state published after each transition.
pub struct GameService {
    commands: Sender<Command>,
    published: Arc<RwLock<Published>>,
    broadcast: Arc<Broadcast>,
    worker: Option<JoinHandle<()>>,
}

/// What readers see between transitions.
struct Published {
    state: GameState,
    fault: Option<GameError>,
}

impl GameService {
    /// Takes over a freshly dealt (or resumed) table. The table thread lets
    /// the opponent open if it holds the lead; the returned receiver is
    /// subscribed first, so it sees that opening lead. Completed tricks stay
    /// on the table for `reveal_delay` before they are settled.
    pub fn spawn(table: Table, reveal_delay: Duration) -> (Self, Receiver<GameEvent>) {
        let (commands, inbox) = mpsc::channel();
        let published = Arc::new(RwLock::new(Published {
            state: table.state().clone(),
            fault: table.fault().cloned(),
        }));
        let broadcast = Arc::new(Broadcast::default());
        let events = broadcast.subscribe();
        let worker = Worker {
            table,
            inbox,
            published: Arc::clone(&published),
            broadcast: Arc::clone(&broadcast),
            reveal_delay,
            backlog: VecDeque::new(),
            resolve_at: None,
        };
        let worker = thread::Builder::new()
            .name("santase-table".to_string())
            .spawn(move || worker.run())
            .ok();
        if worker.is_none() {
            error!(target: "santase_app::service", "failed to spawn table thread");
        }
        let service = Self {
            commands,
            published,
            broadcast,
            worker,
        };
        (service, events)
    }

    /// Queues a human move and waits for its outcome.
    pub fn submit_move(&self, mv: Move) -> Result<Ack, ServiceError> {
        let (reply, outcome) = mpsc::channel();
        self.commands
            .send(Command::Submit { mv, reply })
            .map_err(|_| ServiceError::Stopped)?;
        match outcome.recv() {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Stopped),
        }
    }

    /// Consistent copy of the state as of the last transition.
    pub fn snapshot(&self) -> GameState {
        self.published.read().state.clone()
    }

    /// The fatal error that ended the hand, if any.
    pub fn fault(&self) -> Option<GameError> {
        self.published.read().fault.clone()
    }

    /// State and fault read together under one lock.
    pub fn status(&self) -> (GameState, Option<GameError>) {
        let published = self.published.read();
        (published.state.clone(), published.fault.clone())
    }

    pub fn subscribe(&self) -> Receiver<GameEvent> {
        self.broadcast.subscribe()
    }

    /// Stops the table thread. A trick still waiting to be settled is dropped.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.commands.send(Command::Shutdown);
        if worker.join().is_err() {
            error!(target: "santase_app::service", "table thread panicked");
        }
    }
}

impl Drop for GameService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    table: Table,
    inbox: Receiver<Command>,
    published: Arc<RwLock<Published>>,
    broadcast: Arc<Broadcast>,
    reveal_delay: Duration,
    backlog: VecDeque<(Move, Reply)>,
    resolve_at: Option<Instant>,
}

impl Worker {
    fn run(mut self) {
        debug!(target: "santase_app::service", delay_ms = self.reveal_delay.as_millis() as u64, "table thread started");
        match self.table.start() {
            Ok(events) => self.publish(&events),
            Err(err) => {
                error!(target: "santase_app::service", error = %err, "opening lead failed");
                self.publish(&[]);
            }
        }
        loop {
            if self.table.needs_resolution() {
                let deadline = *self
                    .resolve_at
                    .get_or_insert_with(|| Instant::now() + self.reveal_delay);
                let wait = deadline.saturating_duration_since(Instant::now());
                match self.inbox.recv_timeout(wait) {
                    Ok(Command::Submit { mv, reply }) => {
                        debug!(target: "santase_app::service", %mv, "move queued behind pending trick");
                        self.backlog.push_back((mv, reply));
                    }
                    Ok(Command::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => self.settle(),
                }
                continue;
            }

            if let Some((mv, reply)) = self.backlog.pop_front() {
                self.submit(mv, reply);
                continue;
            }

            match self.inbox.recv() {
                Ok(Command::Submit { mv, reply }) => self.submit(mv, reply),
                Ok(Command::Shutdown) | Err(_) => break,
            }
        }
        if self.table.needs_resolution() {
            info!(target: "santase_app::service", "shutting down with an unsettled trick");
        }
        debug!(target: "santase_app::service", queued = self.backlog.len(), "table thread stopped");
    }

    fn submit(&mut self, mv: Move, reply: Reply) {
        let result = self.table.submit_human(mv);
        match &result {
            Ok(ack) => self.publish(&ack.events),
            Err(err) if err.is_fatal() => {
                error!(target: "santase_app::service", %mv, error = %err, "hand aborted");
                self.publish(&[]);
            }
            Err(err) => warn!(target: "santase_app::service", %mv, error = %err, "move refused"),
        }
        let _ = reply.send(result);
    }

    fn settle(&mut self) {
        self.resolve_at = None;
        match self.table.resolve() {
            Ok(events) => self.publish(&events),
            Err(err) => {
                error!(target: "santase_app::service", error = %err, "resolution failed");
                self.publish(&[]);
            }
        }
    }

    /// Events go out before the snapshot, so a reader that sees the new
    /// state has already been sent everything leading up to it.
    fn publish(&self, events: &[GameEvent]) {
        self.broadcast.publish(events);
        let mut published = self.published.write();
        published.state = self.table.state().clone();
        published.fault = self.table.fault().cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::Broadcast;
    use santase_core::game::event::GameEvent;
    use santase_core::model::player::Player;

    #[test]
    fn dropped_subscribers_are_pruned() {
        let broadcast = Broadcast::default();
        let kept = broadcast.subscribe();
        let dropped = broadcast.subscribe();
        drop(dropped);

        let event = GameEvent::StockClosed {
            player: Player::Human,
        };
        broadcast.publish(std::slice::from_ref(&event));
        assert_eq!(broadcast.subscribers.lock().len(), 1);
        assert_eq!(kept.try_recv().unwrap(), event);
    }
}
