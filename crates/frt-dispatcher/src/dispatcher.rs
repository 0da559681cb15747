// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Flow Runtime Authors

//! The dispatcher: the single-threaded cooperative core of the runtime.
//!
//! One worker thread owns the node table and the priority inbox. At most
//! one node callback runs at a time; a node never sees a second callback
//! reenter it while the first is still running. Callbacks run with no
//! dispatcher lock held — the target instance is checked out of the table
//! for the duration of the call — so a node is free to send messages and
//! events back through the dispatcher from inside its own callback.
//!
//! Foreign threads (the timer wheel, stream I/O threads) post into the
//! inbox through the same send paths the worker uses; [`Dispatcher::lock`]
//! additionally lets them make several coordinated calls while observing a
//! consistent view of dispatcher state.

use crate::factory::NodeFactory;
use crate::inbox::{Delivery, Inbox};
use crate::status_bus::StatusBus;
use crate::table::NodeTable;
use crate::timer_wheel::{Fired, TimerWheel};
use frt_core::{Clock, CoreError, EventMask, Message, NodeContext, NodeId, NodeIdentity, NodeState, StatusCode};
use parking_lot::{Condvar, Mutex, ReentrantMutex};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// The at-most-one pending event record per node. Posts that arrive before
/// the node consumes the record OR-merge into `mask`; `priority` tracks the
/// highest priority any contributing post asked for.
struct PendingEvent {
    mask: EventMask,
    priority: i8,
}

struct Inner {
    table: Mutex<NodeTable>,
    inbox: Mutex<Inbox>,
    inbox_ready: Condvar,
    pending_events: Mutex<HashMap<NodeId, PendingEvent>>,
    factory: NodeFactory,
    critical_section: ReentrantMutex<()>,
    status_bus: StatusBus,
    stopping: AtomicBool,
    timer_wheel: Mutex<Option<TimerWheel>>,
}

/// The cooperative core. Cheap to clone (an `Arc` around shared state), so
/// the worker thread and timer-fired callbacks can each hold their own
/// handle.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(factory: NodeFactory) -> Self {
        Self {
            inner: Arc::new(Inner {
                table: Mutex::new(NodeTable::new()),
                inbox: Mutex::new(Inbox::new()),
                inbox_ready: Condvar::new(),
                pending_events: Mutex::new(HashMap::new()),
                factory,
                critical_section: ReentrantMutex::new(()),
                status_bus: StatusBus::new(),
                stopping: AtomicBool::new(false),
                timer_wheel: Mutex::new(None),
            }),
        }
    }

    /// Start the dedicated timer-wheel scanning thread, wiring fired timers
    /// straight back into `send_evt`.
    pub fn start_timers<C: Clock + 'static>(&self, clock: C, resolution: Duration) {
        let dispatcher = self.clone();
        let wheel = TimerWheel::spawn(clock, resolution, move |fired: Fired| {
            if dispatcher.send_evt(fired.target.as_str(), fired.mask, fired.priority).is_err() {
                tracing::debug!(node = %fired.target, "dropping timer event: target no longer exists");
            }
        });
        *self.inner.timer_wheel.lock() = Some(wheel);
    }

    /// Schedule a one-shot timer. Returns `None` if `start_timers` was never
    /// called — scheduling against a dispatcher with no running wheel is a
    /// caller error, not a silent drop.
    pub fn schedule_timer(
        &self,
        delay: Duration,
        target: &str,
        mask: EventMask,
        priority: i8,
    ) -> Option<frt_core::TimerHandle> {
        let wheel = self.inner.timer_wheel.lock();
        wheel.as_ref().map(|w| w.after(delay, NodeId::new(target), mask, priority))
    }

    pub fn cancel_timer(&self, handle: frt_core::TimerHandle) -> bool {
        self.inner.timer_wheel.lock().as_ref().is_some_and(|w| w.cancel(handle))
    }

    pub fn status_bus(&self) -> &StatusBus {
        &self.inner.status_bus
    }

    /// Publish a status update through the status bus to every listener
    /// whose group matches.
    pub fn set_status(&self, group: &str, kind: frt_core::StatusKind, text: &str, priority: i8) -> Result<(), CoreError> {
        self.inner.status_bus.set(self, group, kind, text, priority)
    }

    /// Construct a node via the factory, register it, and run it through
    /// `init` (`Created` → `Initialised`). An `init` failure leaves the node
    /// registered but in its terminal `Error` state; the rest of the flow is
    /// unaffected.
    pub fn node_alloc(&self, identity: NodeIdentity) -> Result<(), CoreError> {
        let node = self.inner.factory.build(&identity)?;
        let cfg_id = identity.cfg_id.clone();
        self.inner.table.lock().register(identity, node)?;

        let mut table = self.inner.table.lock();
        let identity = table.identity(cfg_id.as_str())?.clone();
        let ctx = NodeContext { identity: &identity };
        let status = table.node_mut(cfg_id.as_str())?.init(&ctx);
        if status == StatusCode::Ok {
            table.set_state(cfg_id.as_str(), NodeState::Initialised)?;
        } else if status != StatusCode::NotSupported {
            tracing::warn!(node = %cfg_id, %status, "node failed to initialise");
            table.set_state(cfg_id.as_str(), NodeState::Error)?;
        }
        Ok(())
    }

    pub fn node_state(&self, id: &str) -> Result<NodeState, CoreError> {
        self.inner.table.lock().state(id)
    }

    /// Resolve a configuration id to the live node's identity, or `None`.
    pub fn node_get(&self, id: &str) -> Option<NodeIdentity> {
        self.inner.table.lock().identity(id).ok().cloned()
    }

    /// Start a node: `Initialised`/`Deinitialised` → `Started`. A failing
    /// `start` moves the node to `Error`, like a failing `init`.
    pub fn start_node(&self, id: &str) -> Result<StatusCode, CoreError> {
        let mut table = self.inner.table.lock();
        let identity = table.identity(id)?.clone();
        let ctx = NodeContext { identity: &identity };
        let status = table.node_mut(id)?.start(&ctx);
        if status == StatusCode::Ok {
            table.set_state(id, NodeState::Started)?;
        } else if status != StatusCode::NotSupported {
            tracing::warn!(node = %id, %status, "node failed to start");
            table.set_state(id, NodeState::Error)?;
        }
        Ok(status)
    }

    /// Stop a node: `Started` → `Initialised` (a permitted reverse transition).
    pub fn stop_node(&self, id: &str) -> Result<StatusCode, CoreError> {
        let mut table = self.inner.table.lock();
        let identity = table.identity(id)?.clone();
        let ctx = NodeContext { identity: &identity };
        let status = table.node_mut(id)?.stop(&ctx);
        if status == StatusCode::Ok {
            table.set_state(id, NodeState::Initialised)?;
        }
        Ok(status)
    }

    /// Enqueue a message for `target` at `priority`. The dispatcher takes
    /// ownership of `msg` until it hands it to `recv_msg`; an unknown
    /// target frees the message and reports `NodeNotFound`.
    pub fn send_msg_to(&self, target: &str, msg: Message, priority: i8) -> Result<(), CoreError> {
        if !self.inner.table.lock().contains(target) {
            return Err(CoreError::NodeNotFound(target.to_string()));
        }
        self.inner.inbox.lock().push(NodeId::new(target), priority, Delivery::Message(msg));
        self.inner.inbox_ready.notify_one();
        Ok(())
    }

    /// Fan a message out from `source` to every one of its configured
    /// wires. A node with zero wires is a sink: `msg` is simply freed and
    /// nothing enters the inbox. With more than one wire, every wire but
    /// the last gets a validated deep copy — the last wire inherits the
    /// original allocation, so exactly one copy of the chain survives per
    /// wire and no copy leaks.
    pub fn send_msg_from(&self, source: &str, msg: Message, priority: i8) -> Result<(), CoreError> {
        let wires = self.inner.table.lock().identity(source)?.wires.clone();
        let Some((last, rest)) = wires.split_last() else {
            return msg.free();
        };
        for wire in rest {
            let copy = msg.deep_clone()?;
            self.send_msg_to(wire.as_str(), copy, priority)?;
        }
        self.send_msg_to(last.as_str(), msg, priority)
    }

    /// Post an event to `target`. Posts that arrive before the node has
    /// consumed its pending record OR-merge into it instead of queuing a
    /// second entry; a merge at a higher priority re-queues the record at
    /// that priority (the overtaken entry becomes a no-op at dequeue). An
    /// empty mask creates no inbox entry at all.
    pub fn send_evt(&self, target: &str, mask: EventMask, priority: i8) -> Result<(), CoreError> {
        if !self.inner.table.lock().contains(target) {
            return Err(CoreError::NodeNotFound(target.to_string()));
        }
        if mask.is_empty() {
            return Ok(());
        }
        let node_id = NodeId::new(target);
        let mut pending = self.inner.pending_events.lock();
        match pending.get_mut(&node_id) {
            Some(existing) => {
                existing.mask.merge(mask);
                if priority <= existing.priority {
                    return Ok(());
                }
                existing.priority = priority;
            }
            None => {
                pending.insert(node_id.clone(), PendingEvent { mask, priority });
            }
        }
        drop(pending);

        self.inner.inbox.lock().push(node_id, priority, Delivery::Event);
        self.inner.inbox_ready.notify_one();
        Ok(())
    }

    /// Hold the cross-thread critical section. Foreign threads (timer,
    /// stream I/O) take this around multi-step sequences that must observe
    /// a consistent view; the worker holds it for each dequeue+mutate step
    /// but releases it before invoking the node callback. Reentrant, so a
    /// caller that already holds it cannot deadlock itself.
    pub fn lock(&self) -> parking_lot::ReentrantMutexGuard<'_, ()> {
        self.inner.critical_section.lock()
    }

    /// Pop and handle exactly one inbox entry, blocking up to `timeout`
    /// (or forever if `None`) for one to arrive. Returns `true` when an
    /// entry was consumed — delivered, or discarded because its target is
    /// gone — and `false` when the inbox stayed empty.
    pub fn dispatch_one(&self, timeout: Option<Duration>) -> bool {
        let entry = {
            let mut inbox = self.inner.inbox.lock();
            if inbox.is_empty() {
                if self.inner.stopping.load(Ordering::Acquire) {
                    return false;
                }
                match timeout {
                    Some(t) => {
                        let result = self.inner.inbox_ready.wait_for(&mut inbox, t);
                        if result.timed_out() && inbox.is_empty() {
                            return false;
                        }
                    }
                    None => {
                        self.inner.inbox_ready.wait(&mut inbox);
                    }
                }
            }
            match inbox.pop() {
                Some(entry) => entry,
                None => return false,
            }
        };

        // The dequeue+mutate step runs inside the critical section; the
        // callback itself runs with no dispatcher lock held.
        let cs = self.lock();
        let target = entry.target.clone();

        let deliverable = matches!(
            self.inner.table.lock().state(target.as_str()),
            Ok(NodeState::Created | NodeState::Initialised | NodeState::Started)
        );
        if !deliverable {
            if matches!(entry.delivery, Delivery::Event) {
                self.inner.pending_events.lock().remove(&target);
            }
            tracing::debug!(node = %target, "discarding delivery: target is gone, stopped, or errored");
            return true;
        }

        let mask = match entry.delivery {
            Delivery::Event => match self.inner.pending_events.lock().remove(&target) {
                Some(pending) => Some(pending.mask),
                // A no-op entry left behind when the record was re-queued
                // at a higher priority and already consumed there.
                None => return true,
            },
            Delivery::Message(_) => None,
        };

        let Ok((identity, mut node)) = self.inner.table.lock().checkout(target.as_str()) else {
            return true;
        };
        drop(cs);

        let ctx = NodeContext { identity: &identity };
        match (entry.delivery, mask) {
            (Delivery::Message(msg), _) => {
                node.recv_msg(&ctx, msg);
            }
            (Delivery::Event, mask) => {
                node.recv_evt(&ctx, mask.unwrap_or(EventMask::NONE));
            }
        }
        self.inner.table.lock().checkin(target.as_str(), node);
        true
    }

    /// Run `dispatch_one` in a loop on the calling thread until `stop` is
    /// called. Intended to be driven from a dedicated worker thread.
    pub fn run_forever(&self) {
        while !self.inner.stopping.load(Ordering::Acquire) {
            self.dispatch_one(Some(Duration::from_millis(100)));
        }
    }

    // Failure to spawn the worker is unrecoverable at bootstrap.
    #[allow(clippy::expect_used)]
    pub fn spawn_worker(&self) -> std::thread::JoinHandle<()> {
        let dispatcher = self.clone();
        std::thread::Builder::new()
            .name("frt-dispatcher".into())
            .spawn(move || dispatcher.run_forever())
            .expect("failed to spawn dispatcher worker thread")
    }

    pub fn stop(&self) {
        self.inner.stopping.store(true, Ordering::Release);
        self.inner.inbox_ready.notify_all();
    }

    pub fn node_count(&self) -> usize {
        self.inner.table.lock().len()
    }

    /// Deinitialise a node: `Initialised`/`Error` → `Deinitialised`.
    pub fn deinit_node(&self, id: &str) -> Result<StatusCode, CoreError> {
        let mut table = self.inner.table.lock();
        let identity = table.identity(id)?.clone();
        let ctx = NodeContext { identity: &identity };
        let status = table.node_mut(id)?.deinit(&ctx);
        table.set_state(id, NodeState::Deinitialised)?;
        Ok(status)
    }

    /// Tear down every node currently registered: stop, deinit, drop, in
    /// configuration order. Entries still queued for a torn-down node are
    /// discarded at dequeue once the dispatcher observes it gone. A no-op
    /// on an empty table, so a fresh flow's first install can call this
    /// unconditionally.
    pub fn shutdown_flow(&self) {
        let ids: Vec<_> = self.inner.table.lock().ids_in_registration_order().cloned().collect();
        for id in &ids {
            let _ = self.stop_node(id.as_str());
            let _ = self.deinit_node(id.as_str());
            self.inner.pending_events.lock().remove(id);
            self.inner.table.lock().remove(id.as_str());
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
