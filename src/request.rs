//! Bounded queue of light calls for the fixture.
//!
//! Built on `critical-section` and `heapless::Deque`, so network or button
//! tasks can submit calls from other contexts while the fixture drains the
//! queue on its own tick.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::{call::LightCall, fixture::LightId};

/// A call addressed to one light of a fixture
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub light: LightId,
    pub call: LightCall,
}

/// Error returned when trying to submit to a full queue.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueFull<T>(pub T);

/// Error returned when trying to receive from an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEmpty;

pub struct RequestQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Request, SIZE>>>,
}

impl<const SIZE: usize> RequestQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    pub const fn sender(&self) -> RequestSender<'_, SIZE> {
        RequestSender { queue: self }
    }

    /// Queue a call. Returns the request back if the queue is full.
    pub fn try_send(&self, light: LightId, call: LightCall) -> Result<(), QueueFull<Request>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(Request { light, call }).map_err(QueueFull)
        })
    }

    pub fn try_receive(&self) -> Result<Request, QueueEmpty> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(QueueEmpty)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for RequestQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`RequestQueue`].
#[derive(Clone, Copy)]
pub struct RequestSender<'a, const SIZE: usize> {
    queue: &'a RequestQueue<SIZE>,
}

impl<const SIZE: usize> RequestSender<'_, SIZE> {
    pub fn try_send(&self, light: LightId, call: LightCall) -> Result<(), QueueFull<Request>> {
        self.queue.try_send(light, call)
    }
}
