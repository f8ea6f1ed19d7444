//! Handler registration and synchronous event dispatch.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;

use crate::edge::{EventKind, TouchEvent};
use crate::electrode::{Electrode, TouchMask};

/// Callback run on the sampler's context for every matching event.
pub type Handler<'a> = &'a dyn Fn(&TouchContext);

/// Which electrode a handler listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    /// Fires for every electrode.
    Any,
    /// Fires for one electrode only.
    Electrode(Electrode),
}

impl From<Electrode> for Sensor {
    fn from(electrode: Electrode) -> Self {
        Sensor::Electrode(electrode)
    }
}

/// What a handler sees while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchContext {
    event: TouchEvent,
    mask: TouchMask,
}

impl TouchContext {
    pub(crate) fn new(event: TouchEvent, mask: TouchMask) -> Self {
        Self { event, mask }
    }

    pub fn event(&self) -> TouchEvent {
        self.event
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind
    }

    /// Electrode of the event being handled.
    pub fn last_touched_electrode(&self) -> Electrode {
        self.event.electrode
    }

    /// Whether `electrode` was set in the sample that raised this event.
    pub fn is_touched(&self, electrode: Electrode) -> bool {
        self.mask.is_touched(electrode)
    }

    pub fn mask(&self) -> TouchMask {
        self.mask
    }
}

#[derive(Clone, Copy)]
struct Registration<'a> {
    kind: EventKind,
    sensor: Sensor,
    handler: Handler<'a>,
}

/// Ordered list of handlers keyed by event kind and sensor.
pub struct HandlerTable<'a, const N: usize> {
    entries: Vec<Registration<'a>, N>,
}

impl<'a, const N: usize> HandlerTable<'a, N> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a handler. Gives the handler back when the table is full.
    pub fn register(
        &mut self,
        kind: EventKind,
        sensor: Sensor,
        handler: Handler<'a>,
    ) -> Result<(), Handler<'a>> {
        self.entries
            .push(Registration {
                kind,
                sensor,
                handler,
            })
            .map_err(|registration| registration.handler)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handlers for `event`: those bound to its electrode first, then the
    /// wildcard ones, each group in registration order.
    pub fn matching(&self, event: TouchEvent) -> impl Iterator<Item = Handler<'a>> + '_ {
        let specific = Sensor::Electrode(event.electrode);
        let of_kind = move |r: &&Registration<'a>| r.kind == event.kind;

        let exact = self
            .entries
            .iter()
            .filter(of_kind)
            .filter(move |r| r.sensor == specific);
        let wildcard = self
            .entries
            .iter()
            .filter(of_kind)
            .filter(|r| r.sensor == Sensor::Any);

        exact.chain(wildcard).map(|r| r.handler)
    }
}

impl<const N: usize> Default for HandlerTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handler table plus the dispatch loop.
///
/// Handlers are copied out of the table before they run, so a handler is free
/// to query the controller while it executes.
pub struct Dispatcher<'a, M: RawMutex, const N: usize> {
    table: Mutex<M, RefCell<HandlerTable<'a, N>>>,
}

impl<'a, M: RawMutex, const N: usize> Dispatcher<'a, M, N> {
    pub const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new(HandlerTable::new())),
        }
    }

    pub fn register(
        &self,
        kind: EventKind,
        sensor: Sensor,
        handler: Handler<'a>,
    ) -> Result<(), Handler<'a>> {
        self.table
            .lock(|table| table.borrow_mut().register(kind, sensor, handler))
    }

    pub fn handler_count(&self) -> usize {
        self.table.lock(|table| table.borrow().len())
    }

    /// Runs every handler matching the context's event, in order, on the
    /// caller's stack. Returns how many ran.
    pub fn dispatch(&self, context: &TouchContext) -> usize {
        let handlers: Vec<Handler<'a>, N> = self
            .table
            .lock(|table| table.borrow().matching(context.event()).collect());

        for handler in handlers.iter() {
            handler(context);
        }
        handlers.len()
    }
}

impl<M: RawMutex, const N: usize> Default for Dispatcher<'_, M, N> {
    fn default() -> Self {
        Self::new()
    }
}
