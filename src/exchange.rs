//! Single-writer exchange facade.
//!
//! ## Threading model
//!
//! All state (order book, ledger, processed-event set) is owned by one
//! engine thread; callers hold a cloneable [`Exchange`] handle and talk to
//! it over a command channel. Each request carries its own bounded(1) reply
//! channel, so a call is a send + blocking recv and observes a consistent
//! snapshot: no reads interleave with a partially applied submission.
//!
//! Funding events are the one asynchronous path. [`Exchange::submit_funding_event`]
//! performs the freshness check synchronously, enqueues the credit, and
//! returns an [`EventTicket`] immediately; the caller can acknowledge the
//! delivery before the ledger mutation happens and later wait on the ticket
//! to observe the outcome.

use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::engine::{self, MatchingEngine, SubmitReport};
use crate::error::{ExchangeError, ValidationError};
use crate::events::{ApplyOutcome, EventApplier, FreshnessPolicy, FundingEvent};
use crate::ledger::{Balances, Ledger};
use crate::orderbook::{DepthSnapshot, OrderBook};
use crate::types::{Side, UserId};

/// Engine thread configuration.
#[derive(Debug, Default)]
pub struct ExchangeConfig {
    /// Freshness window for external funding events
    pub freshness: FreshnessPolicy,

    /// Accounts provisioned before the engine starts serving
    pub accounts: Vec<(UserId, Balances)>,
}

/// Requests served by the engine thread.
enum Command {
    Submit {
        user: UserId,
        side: Side,
        price: u64,
        quantity: u64,
        reply: Sender<Result<SubmitReport, ValidationError>>,
    },
    Depth {
        reply: Sender<DepthSnapshot>,
    },
    Balance {
        user: UserId,
        reply: Sender<Balances>,
    },
    Quote {
        side: Side,
        quantity: u64,
        reply: Sender<Result<Decimal, ValidationError>>,
    },
    Credit {
        event: FundingEvent,
        now_ms: u64,
        done: Sender<ApplyOutcome>,
    },
}

/// Completion handle for an asynchronously applied funding event.
///
/// The event was admitted and enqueued when the ticket was created; waiting
/// is optional and only needed to observe the apply outcome.
#[derive(Debug)]
pub struct EventTicket {
    done: Receiver<ApplyOutcome>,
}

impl EventTicket {
    /// Block until the engine thread has applied the event.
    pub fn wait(self) -> Result<ApplyOutcome, ExchangeError> {
        self.done.recv().map_err(|_| ExchangeError::Closed)
    }
}

/// Cloneable handle to the engine thread.
#[derive(Debug, Clone)]
pub struct Exchange {
    commands: Sender<Command>,
    freshness: FreshnessPolicy,
}

impl Exchange {
    /// Spawn the engine thread and return a handle to it.
    pub fn start(config: ExchangeConfig) -> Self {
        let (commands, inbox) = unbounded();
        let freshness = config.freshness;

        let mut worker = Worker {
            book: OrderBook::new(),
            ledger: Ledger::with_accounts(config.accounts),
            matcher: MatchingEngine::new(),
            applier: EventApplier::new(freshness),
        };

        info!(
            accounts = worker.ledger.account_count(),
            window_ms = freshness.window_ms,
            "exchange engine starting"
        );

        thread::Builder::new()
            .name("exchange-engine".into())
            .spawn(move || worker.run(inbox))
            .expect("failed to spawn engine thread");

        Self { commands, freshness }
    }

    /// Submit a limit order; blocks until matched and settled.
    pub fn submit_order(
        &self,
        user: UserId,
        side: Side,
        price: u64,
        quantity: u64,
    ) -> Result<SubmitReport, ExchangeError> {
        let (reply, outcome) = bounded(1);
        self.send(Command::Submit {
            user,
            side,
            price,
            quantity,
            reply,
        })?;
        self.recv(outcome)?.map_err(ExchangeError::from)
    }

    /// Aggregated resting quantity per price level.
    pub fn depth(&self) -> Result<DepthSnapshot, ExchangeError> {
        let (reply, snapshot) = bounded(1);
        self.send(Command::Depth { reply })?;
        self.recv(snapshot)
    }

    /// Holdings for a user (zero for unknown users).
    pub fn balance_of(&self, user: UserId) -> Result<Balances, ExchangeError> {
        let (reply, balances) = bounded(1);
        self.send(Command::Balance { user, reply })?;
        self.recv(balances)
    }

    /// Top-of-book cost estimate for the given size.
    pub fn quote(&self, side: Side, quantity: u64) -> Result<Decimal, ExchangeError> {
        let (reply, estimate) = bounded(1);
        self.send(Command::Quote {
            side,
            quantity,
            reply,
        })?;
        self.recv(estimate)?.map_err(ExchangeError::from)
    }

    /// Admit a funding event and enqueue its application.
    ///
    /// Freshness is checked here, synchronously, so stale deliveries are
    /// rejected before acknowledgement. On success the credit is queued
    /// behind any in-flight commands and the returned ticket resolves once
    /// it has been applied.
    pub fn submit_funding_event(&self, event: FundingEvent) -> Result<EventTicket, ExchangeError> {
        self.submit_funding_event_at(event, unix_millis())
    }

    /// [`Self::submit_funding_event`] with an explicit clock reading.
    pub fn submit_funding_event_at(
        &self,
        event: FundingEvent,
        now_ms: u64,
    ) -> Result<EventTicket, ExchangeError> {
        self.freshness.admit(&event.id, event.timestamp_ms, now_ms)?;

        let (done_tx, done) = bounded(1);
        debug!(event_id = %event.id, "funding event admitted");
        self.send(Command::Credit {
            event,
            now_ms,
            done: done_tx,
        })?;
        Ok(EventTicket { done })
    }

    /// Admit a funding event and block until it has been applied.
    pub fn apply_funding_event(&self, event: FundingEvent) -> Result<ApplyOutcome, ExchangeError> {
        self.submit_funding_event(event)?.wait()
    }

    fn send(&self, command: Command) -> Result<(), ExchangeError> {
        self.commands.send(command).map_err(|_| ExchangeError::Closed)
    }

    fn recv<T>(&self, reply: Receiver<T>) -> Result<T, ExchangeError> {
        reply.recv().map_err(|_| ExchangeError::Closed)
    }
}

/// The engine thread: sole owner of book, ledger and event state.
struct Worker {
    book: OrderBook,
    ledger: Ledger,
    matcher: MatchingEngine,
    applier: EventApplier,
}

impl Worker {
    fn run(&mut self, inbox: Receiver<Command>) {
        // Exits when every handle (and every pending ticket sender) is gone
        while let Ok(command) = inbox.recv() {
            self.handle(command);
        }
        info!("exchange engine stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Submit {
                user,
                side,
                price,
                quantity,
                reply,
            } => {
                let report = self
                    .matcher
                    .submit(&mut self.book, &mut self.ledger, user, side, price, quantity);
                let _ = reply.send(report);
            }
            Command::Depth { reply } => {
                let _ = reply.send(self.book.depth());
            }
            Command::Balance { user, reply } => {
                let _ = reply.send(self.ledger.balance_of(&user));
            }
            Command::Quote {
                side,
                quantity,
                reply,
            } => {
                let estimate = if quantity == 0 {
                    Err(ValidationError::NonPositiveQuantity)
                } else {
                    Ok(engine::quote(&self.book, side, quantity))
                };
                let _ = reply.send(estimate);
            }
            Command::Credit { event, now_ms, done } => {
                let outcome = self.applier.apply(&mut self.ledger, &event, now_ms);
                // Caller may have dropped the ticket; the apply still counts
                let _ = done.send(outcome);
            }
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Unit Tests
// ============================================================================
