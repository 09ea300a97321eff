//! Per-connection scheduler multiplexing one-shot and repeating events.
//!
//! Lifecycle:
//!
//! 1. **Inactive** until first polled.
//! 2. On activation every item is rendered once, in list order, and one
//!    interval timer is armed per repeating item.
//! 3. **Armed** while at least one timer exists; each tick renders its item
//!    again. With no timers the stream drains the initial frames and closes.
//! 4. **Cancelled** by [`EventStream::cancel`], by drop, or by the shutdown
//!    token. All timers are dropped at that transition; nothing is emitted
//!    afterwards.
//!
//! Timers belong to the stream itself and are polled from `poll_next`, so a
//! stream is driven by a single task and needs no locking.

use crate::item::StreamItem;
use bytes::Bytes;
use futures::stream::{FusedStream, Stream};
use log::*;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Inactive,
    Armed,
    Closing,
    Closed,
    Cancelled,
}

struct ArmedTimer {
    item: StreamItem,
    interval: Interval,
}

pub struct EventStream {
    state: State,
    items: Vec<StreamItem>,
    timers: Vec<ArmedTimer>,
    pending: VecDeque<Bytes>,
    shutdown: Option<Pin<Box<WaitForCancellationFutureOwned>>>,
}

impl EventStream {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StreamItem>,
    {
        Self {
            state: State::Inactive,
            items: items.into_iter().map(Into::into).collect(),
            timers: Vec::new(),
            pending: VecDeque::new(),
            shutdown: None,
        }
    }

    /// Ends the stream when `token` is cancelled, e.g. on server shutdown.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(Box::pin(token.cancelled_owned()));
        self
    }

    pub fn armed_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == State::Cancelled
    }

    /// Disarms every timer and ends the stream. Calling it again is a no-op.
    pub fn cancel(&mut self) {
        if self.state == State::Cancelled {
            return;
        }

        let disarmed = self.timers.len();
        self.timers.clear();
        self.items.clear();
        self.pending.clear();
        self.shutdown = None;
        self.state = State::Cancelled;

        if disarmed > 0 {
            debug!("Event stream cancelled, disarmed {disarmed} timer(s)");
        }
    }

    fn activate(&mut self) {
        let items = std::mem::take(&mut self.items);

        for item in &items {
            Self::emit(&mut self.pending, item);
        }

        let start = Instant::now();
        self.timers = items
            .into_iter()
            .filter_map(|item| {
                let period = item.frequency()?;
                let mut interval = interval_at(start + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Some(ArmedTimer { item, interval })
            })
            .collect();

        debug!(
            "Event stream activated with {} initial frame(s) and {} timer(s)",
            self.pending.len(),
            self.timers.len()
        );

        self.state = if self.timers.is_empty() {
            State::Closing
        } else {
            State::Armed
        };
    }

    /// Renders `item` onto the pending queue. A failed render drops only this
    /// emission.
    fn emit(pending: &mut VecDeque<Bytes>, item: &StreamItem) {
        match item.render() {
            Ok(text) => pending.push_back(Bytes::from(text)),
            Err(e) => warn!("Dropping {} emission: {e}", item.label()),
        }
    }
}

impl Stream for EventStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(shutdown) = this.shutdown.as_mut() {
            if shutdown.as_mut().poll(cx).is_ready() {
                this.cancel();
            }
        }

        match this.state {
            State::Cancelled | State::Closed => return Poll::Ready(None),
            State::Inactive => this.activate(),
            State::Armed | State::Closing => {}
        }

        // Timers are only polled once the queue is drained, so a slow reader
        // holds at most one frame per timer. Each timer is polled until
        // Pending so its waker stays registered.
        if this.pending.is_empty() {
            for timer in this.timers.iter_mut() {
                while timer.interval.poll_tick(cx).is_ready() {
                    Self::emit(&mut this.pending, &timer.item);
                }
            }
        }

        if let Some(frame) = this.pending.pop_front() {
            return Poll::Ready(Some(Ok(frame)));
        }

        if this.state == State::Closing {
            this.state = State::Closed;
            return Poll::Ready(None);
        }

        Poll::Pending
    }
}

impl FusedStream for EventStream {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Closed | State::Cancelled)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.cancel();
    }
}
