//! Main-context dispatch.
//!
//! All visual-tree writes happen on one thread, the one that owns the
//! [`MainContext`]. Code running elsewhere (gesture callbacks) hands work over
//! through a [`Dispatcher`] and the host drains it with
//! [`MainContext::run_pending`] from its UI loop.
//!
//! Tasks are plain `FnOnce() + Send` closures. They cannot capture cards
//! (cards are `!Send`), so they carry ids and look the card up in the
//! per-thread registry when they run.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::trace;

use crate::error::{CardError, Result};

/// A unit of work for the main context.
pub type Task = Box<dyn FnOnce() + Send>;

/// Called after every dispatch, from the dispatching thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// MAIN CONTEXT
// =============================================================================

/// The UI-owning execution context.
///
/// Not `Send`: it stays on the thread that created it, and that is the thread
/// tasks run on.
pub struct MainContext {
    tx: Sender<Task>,
    rx: Receiver<Task>,
    waker: Option<Waker>,
    _not_send: PhantomData<Rc<()>>,
}

impl MainContext {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            waker: None,
            _not_send: PhantomData,
        }
    }

    /// Install a waker so the host loop learns about new tasks.
    ///
    /// Only dispatchers created after this call carry the waker.
    pub fn with_waker<F>(mut self, waker: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// A handle for submitting tasks from any thread.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Run every queued task on this thread.
    ///
    /// Tasks queued while draining (including by the tasks themselves) run in
    /// the same call. Returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!(ran, "main context drained");
        }
        ran
    }
}

impl Default for MainContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MainContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainContext")
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

/// Submits tasks to a [`MainContext`] from any thread.
#[derive(Clone)]
pub struct Dispatcher {
    tx: Sender<Task>,
    waker: Option<Waker>,
}

impl Dispatcher {
    /// Queue `task` to run on the main context.
    ///
    /// Fails with [`CardError::DispatchClosed`] once the context is dropped.
    pub fn dispatch<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(task))
            .map_err(|_| CardError::DispatchClosed)?;

        if let Some(waker) = &self.waker {
            waker();
        }
        Ok(())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
