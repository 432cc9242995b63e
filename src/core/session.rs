//! Debounced request handling on top of [`Controller`].
//!
//! A slider drag fires many term-count events in quick succession; only the
//! last one of a burst is worth computing.  [`Session`] queues ticketed
//! events, collapses consecutive term-count requests, and only emits an
//! [`Update`] whose ticket is still the newest when its computation ends.
//!
//! Events are screened with [`Event::check`] before they get a ticket.  A
//! rejected event is reported straight away and never supersedes anything,
//! so the last valid request of a burst is still served.
//!
//! [`spawn`] runs a session on a worker thread.  Sending a valid event bumps
//! the shared generation immediately, so a long extension running for an
//! older ticket notices and stops early.

use std::{
    collections::VecDeque,
    mem,
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
};

use tracing::{debug, trace, warn};

use crate::core::{
    cancel::{Generations, Interrupt},
    config::Config,
    controller::{Controller, Event, Update},
    error::{AppError, ControllerError},
};

/// What a flush produced for one ticket.
///
/// A rejection carries the ticket of the request it left in effect.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Updated { ticket: u64, update: Update },
    Rejected { ticket: u64, error: ControllerError },
}

pub struct Session {
    controller: Controller,
    queue: VecDeque<(u64, Event)>,
    rejected: Vec<Outcome>,
    generations: Generations,
}

impl Session {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_generations(config, Generations::new())
    }

    #[must_use]
    pub fn with_generations(config: Config, generations: Generations) -> Self {
        Self {
            controller: Controller::new(config),
            queue: VecDeque::new(),
            rejected: Vec::new(),
            generations,
        }
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    /// Events still waiting to be computed.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue `event` under a fresh ticket and return that ticket.
    ///
    /// An event that can never be accepted is recorded as a rejection for
    /// the next flush instead; it gets no ticket and returns `None`.
    pub fn submit(&mut self, event: Event) -> Option<u64> {
        if let Err(error) = event.check(self.controller.config()) {
            self.reject(self.generations.latest(), error);
            return None;
        }
        let ticket = self.generations.next();
        self.enqueue(ticket, event);
        Some(ticket)
    }

    /// Record a rejection to be reported by the next flush.
    pub fn reject(&mut self, ticket: u64, error: ControllerError) {
        warn!(ticket, "rejected: {error}");
        self.rejected.push(Outcome::Rejected { ticket, error });
    }

    /// Queue an already screened event whose ticket was issued elsewhere.
    ///
    /// A term-count request replaces a term-count request directly before
    /// it; range-limit events are never merged because they reset state.
    pub fn enqueue(&mut self, ticket: u64, event: Event) {
        if let (Event::TermCount(_), Some((old, Event::TermCount(_)))) = (event, self.queue.back()) {
            trace!(superseded = *old, ticket, "coalesced term-count request");
            self.queue.pop_back();
        }
        self.queue.push_back((ticket, event));
    }

    /// Report pending rejections, then process everything queued, in order.
    ///
    /// * a term-count request that is already stale is skipped outright;
    /// * a stale range-limit selection still resets state, silently;
    /// * rejections are always reported.
    pub fn flush(&mut self) -> Vec<Outcome> {
        let mut out = mem::take(&mut self.rejected);
        while let Some((ticket, event)) = self.queue.pop_front() {
            let token = self.generations.token(ticket);
            if matches!(event, Event::TermCount(_)) && token.is_superseded() {
                debug!(ticket, "skipping superseded request");
                continue;
            }
            match self.controller.handle_with(event, &token) {
                Ok(_) if token.is_superseded() => {
                    debug!(ticket, "dropping stale update");
                }
                Ok(update) => out.push(Outcome::Updated { ticket, update }),
                Err(ControllerError::Superseded { reached }) => {
                    debug!(ticket, reached, "request abandoned");
                }
                Err(error) => out.push(Outcome::Rejected { ticket, error }),
            }
        }
        out
    }
}

/// Worker mailbox entry.
enum Message {
    Event(u64, Event),
    Rejected(u64, ControllerError),
}

fn admit(session: &mut Session, message: Message) {
    match message {
        Message::Event(ticket, event) => session.enqueue(ticket, event),
        Message::Rejected(ticket, error) => session.reject(ticket, error),
    }
}

/// Producer side of a worker session.
#[derive(Clone)]
pub struct SessionSender {
    tx: Sender<Message>,
    generations: Generations,
    config: Arc<Config>,
}

impl SessionSender {
    /// Ticket and send `event`; a valid event supersedes everything sent
    /// before.
    ///
    /// An event that fails [`Event::check`] is forwarded as a rejection
    /// without a ticket of its own and returns `Ok(None)`.
    ///
    /// # Errors
    /// [`AppError::WorkerDisconnected`] once the worker has exited.
    pub fn send(&self, event: Event) -> Result<Option<u64>, AppError> {
        let (message, ticket) = match event.check(&self.config) {
            Ok(()) => {
                let ticket = self.generations.next();
                (Message::Event(ticket, event), Some(ticket))
            }
            Err(error) => (Message::Rejected(self.generations.latest(), error), None),
        };
        self.tx.send(message).map_err(|_| AppError::WorkerDisconnected)?;
        Ok(ticket)
    }
}

/// Run a [`Session`] on its own thread.
///
/// The worker drains every message already waiting before it computes, so
/// a burst collapses to its last request.  It exits once every
/// [`SessionSender`] is dropped, or when the outcome receiver goes away.
#[must_use]
pub fn spawn(config: Config) -> (SessionSender, Receiver<Outcome>, JoinHandle<()>) {
    let generations = Generations::new();
    let (tx, rx) = mpsc::channel::<Message>();
    let (out_tx, out_rx) = mpsc::channel::<Outcome>();
    let mut session = Session::with_generations(config.clone(), generations.clone());

    let handle = thread::spawn(move || {
        while let Ok(message) = rx.recv() {
            admit(&mut session, message);
            while let Ok(message) = rx.try_recv() {
                admit(&mut session, message);
            }
            for outcome in session.flush() {
                if out_tx.send(outcome).is_err() {
                    return;
                }
            }
        }
        debug!("session worker finished");
    });

    let sender = SessionSender {
        tx,
        generations,
        config: Arc::new(config),
    };
    (sender, out_rx, handle)
}
