//! Group mutual exclusion with representatives
//!
//! Every operation belongs to a [`Group`]. Any number of operations of the
//! working group may run at once; a different group starts only after the
//! working group has fully drained.
//!
//! ## Admission
//!
//! ```text
//! enter(g):
//!   no working group                      -> g becomes working, admitted
//!   g is working and
//!     (let_in < limit or nobody waiting)  -> admitted, let_in += 1
//!   otherwise                             -> wait
//!       first waiter of g                 -> representative of g (FIFO queue)
//!       later waiters of g                -> queued behind the representative
//!
//! exit():
//!   running -= 1
//!   running == 0:
//!     let_in = 0
//!     representative queued  -> hand off to the oldest one
//!     none                   -> no working group
//! ```
//!
//! A handoff installs the representative's group as the working group and
//! admits the representative, then admits its queued group-mates one by one
//! while `waiting[g] > 0 && (let_in < limit || waiting_groups == 0)` holds.
//! The whole handoff happens in a single critical section, so no arrival
//! can observe a half-installed episode.
//!
//! ## Starvation bound
//!
//! Once another group has a representative waiting, the working group admits
//! at most `limit - let_in` further callers; everyone after that queues and
//! the working group drains.
//!
//! ## Cancellation
//!
//! A waiter whose token fires before it is admitted removes its ticket and
//! undoes its counters. A cancelled representative hands its slot in the
//! representative queue to the oldest queued group-mate, if any.

use crate::cancel::CancellationToken;
use crate::config::CoordinatorConfig;
use cube_core::{Error, Group, Result};
use parking_lot::{Condvar, Mutex, MutexGuard};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    id: u64,
    group: Group,
}

/// Bookkeeping guarded by the coordination lock.
#[derive(Debug, Default)]
struct CoordinatorState {
    working: Option<Group>,
    running: usize,
    let_in: usize,
    /// Waiting callers per group, representative included
    waiting: [usize; Group::COUNT],
    waiting_groups: usize,
    representatives: VecDeque<Ticket>,
    queued: [VecDeque<Ticket>; Group::COUNT],
    /// Tickets admitted by a handoff whose owners have not woken yet
    admitted: FxHashSet<u64>,
    next_ticket: u64,
    metrics: CoordinatorMetrics,
}

/// Point-in-time view of the coordinator's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatorStatus {
    /// Group currently allowed to run
    pub working_group: Option<Group>,
    /// Admitted operations that have not exited
    pub running: usize,
    /// Direct admissions in the current episode
    pub let_in: usize,
    /// Waiting callers per group id
    pub waiting: [usize; Group::COUNT],
    /// Groups with a representative waiting
    pub waiting_groups: usize,
    /// Admission limit per episode
    pub limit: usize,
}

impl CoordinatorStatus {
    /// No working group and nobody waiting.
    pub fn is_idle(&self) -> bool {
        self.working_group.is_none()
            && self.running == 0
            && self.waiting_groups == 0
            && self.waiting.iter().all(|w| *w == 0)
    }
}

/// Cumulative counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorMetrics {
    /// Working-group episodes started
    pub episodes: u64,
    /// Callers admitted without waiting
    pub immediate_admissions: u64,
    /// Callers admitted by a handoff
    pub queued_admissions: u64,
    /// Waits abandoned through a cancellation token
    pub cancellations: u64,
    /// Queued callers promoted after their representative was cancelled
    pub promotions: u64,
}

/// Admission control for the four operation groups.
#[derive(Debug)]
pub struct GroupCoordinator {
    state: Mutex<CoordinatorState>,
    representatives: Condvar,
    groups: [Condvar; Group::COUNT],
    limit: usize,
    poll_interval: Duration,
}

/// Proof of admission. Dropping it (or calling [`release`](Admission::release))
/// exits the coordinator exactly once.
#[must_use = "dropping an admission exits the coordinator immediately"]
#[derive(Debug)]
pub struct Admission<'a> {
    coordinator: &'a GroupCoordinator,
    group: Group,
}

impl Admission<'_> {
    /// Group this admission was granted to.
    pub fn group(&self) -> Group {
        self.group
    }

    /// Exit the coordinator now.
    pub fn release(self) {}
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        self.coordinator.exit(self.group);
    }
}

impl GroupCoordinator {
    /// Create a coordinator with no working group.
    ///
    /// The configuration is assumed valid; see [`CoordinatorConfig::validate`].
    pub fn new(config: &CoordinatorConfig) -> Self {
        Self {
            state: Mutex::new(CoordinatorState::default()),
            representatives: Condvar::new(),
            groups: std::array::from_fn(|_| Condvar::new()),
            limit: config.group_limit(),
            poll_interval: config.poll_interval,
        }
    }

    /// Admission limit per episode.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Block until an operation of `group` may run.
    ///
    /// Returns [`Error::Cancelled`] if `token` fires before admission; the
    /// coordinator's counters are then exactly as if the call never happened.
    pub fn enter(&self, group: Group, token: &CancellationToken) -> Result<Admission<'_>> {
        let mut state = self.state.lock();
        let working = state.working;
        match working {
            None => {
                state.working = Some(group);
                state.let_in = 1;
                state.running += 1;
                state.metrics.episodes += 1;
                state.metrics.immediate_admissions += 1;
                tracing::debug!(%group, "episode started");
            }
            Some(working)
                if working == group
                    && (state.let_in < self.limit || state.waiting_groups == 0) =>
            {
                state.let_in += 1;
                state.running += 1;
                state.metrics.immediate_admissions += 1;
                tracing::trace!(%group, let_in = state.let_in, "joined working group");
            }
            Some(_) => self.wait(state, group, token)?,
        }
        Ok(Admission {
            coordinator: self,
            group,
        })
    }

    fn wait(
        &self,
        mut state: MutexGuard<'_, CoordinatorState>,
        group: Group,
        token: &CancellationToken,
    ) -> Result<()> {
        let g = group.index();
        let ticket = Ticket {
            id: state.next_ticket,
            group,
        };
        state.next_ticket += 1;
        state.waiting[g] += 1;
        if state.waiting[g] == 1 {
            state.waiting_groups += 1;
            state.representatives.push_back(ticket);
            tracing::trace!(%group, ticket = ticket.id, "waiting as representative");
        } else {
            state.queued[g].push_back(ticket);
            tracing::trace!(%group, ticket = ticket.id, "waiting behind representative");
        }

        loop {
            if state.admitted.remove(&ticket.id) {
                return Ok(());
            }
            if token.is_cancelled() {
                self.withdraw(&mut state, ticket);
                return Err(Error::Cancelled);
            }
            let is_representative = state.representatives.iter().any(|t| t.id == ticket.id);
            let condvar = if is_representative {
                &self.representatives
            } else {
                &self.groups[g]
            };
            condvar.wait_for(&mut state, self.poll_interval);
        }
    }

    /// Undo the registration of a cancelled ticket.
    fn withdraw(&self, state: &mut CoordinatorState, ticket: Ticket) {
        let g = ticket.group.index();
        state.waiting[g] -= 1;
        state.metrics.cancellations += 1;

        if let Some(pos) = state.representatives.iter().position(|t| t.id == ticket.id) {
            match state.queued[g].pop_front() {
                Some(successor) => {
                    state.representatives[pos] = successor;
                    state.metrics.promotions += 1;
                    tracing::debug!(
                        group = %ticket.group,
                        cancelled = ticket.id,
                        promoted = successor.id,
                        "representative cancelled, group-mate promoted"
                    );
                }
                None => {
                    state.representatives.remove(pos);
                    state.waiting_groups -= 1;
                    tracing::debug!(group = %ticket.group, ticket = ticket.id, "representative cancelled");
                }
            }
        } else if let Some(pos) = state.queued[g].iter().position(|t| t.id == ticket.id) {
            state.queued[g].remove(pos);
            tracing::debug!(group = %ticket.group, ticket = ticket.id, "queued waiter cancelled");
        }
    }

    fn exit(&self, group: Group) {
        let mut state = self.state.lock();
        debug_assert_eq!(state.working, Some(group));
        state.running -= 1;
        tracing::trace!(%group, running = state.running, "exited");
        if state.running > 0 {
            return;
        }

        state.let_in = 0;
        match state.representatives.pop_front() {
            Some(representative) => self.hand_off(&mut state, representative),
            None => {
                state.working = None;
                tracing::trace!(%group, "episode finished, cube idle");
            }
        }
    }

    /// Start the representative's episode and admit its queued group-mates.
    fn hand_off(&self, state: &mut CoordinatorState, representative: Ticket) {
        let group = representative.group;
        let g = group.index();

        state.working = Some(group);
        state.waiting_groups -= 1;
        state.waiting[g] -= 1;
        state.running += 1;
        state.admitted.insert(representative.id);

        let mut admitted = 1;
        while state.waiting[g] > 0 && (state.let_in < self.limit || state.waiting_groups == 0) {
            let Some(next) = state.queued[g].pop_front() else {
                break;
            };
            state.waiting[g] -= 1;
            state.running += 1;
            state.admitted.insert(next.id);
            admitted += 1;
        }

        state.metrics.episodes += 1;
        state.metrics.queued_admissions += admitted;
        tracing::debug!(%group, admitted, "episode handed off");

        self.representatives.notify_all();
        self.groups[g].notify_all();
    }

    /// Current counters.
    pub fn status(&self) -> CoordinatorStatus {
        let state = self.state.lock();
        CoordinatorStatus {
            working_group: state.working,
            running: state.running,
            let_in: state.let_in,
            waiting: state.waiting,
            waiting_groups: state.waiting_groups,
            limit: self.limit,
        }
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> CoordinatorMetrics {
        self.state.lock().metrics
    }
}
