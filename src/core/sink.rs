//! Sink trait for log output destinations

use parking_lot::{Mutex, RwLock};
use std::io;
use std::sync::Arc;

/// A destination for rendered JSON lines.
///
/// `emit` receives every line produced from one record in a single call
/// (several lines when the message was split), each terminated by `\n`.
pub trait Sink: Send {
    fn emit(&mut self, rendered: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    fn name(&self) -> &str;
}

impl Sink for Box<dyn Sink> {
    fn emit(&mut self, rendered: &[u8]) -> io::Result<()> {
        (**self).emit(rendered)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub type SharedSink = Arc<Mutex<Box<dyn Sink>>>;

/// Copy-on-write list of registered sinks.
///
/// Appends build a new list and swap it in; the worker iterates a cheap
/// `Arc` snapshot, so a concurrent append never races the fan-out.
#[derive(Default)]
pub struct SinkSet {
    sinks: RwLock<Arc<Vec<SharedSink>>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sink: Box<dyn Sink>) {
        let mut guard = self.sinks.write();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Arc::new(Mutex::new(sink)));
        *guard = Arc::new(next);
    }

    /// Sinks in registration order, as of this call.
    pub fn snapshot(&self) -> Arc<Vec<SharedSink>> {
        Arc::clone(&self.sinks.read())
    }

    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
