//! Fixed-size pool of blocking workers fed by a bounded queue.
//!
//! Each worker runs one item's whole pipeline at a time. Every error, and any
//! panic, is caught at the item boundary and logged; nothing escapes to the
//! pool or to other in-flight items, and failed items are not retried.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::work::WorkItem;
use crate::error::{ReelError, Result};

/// Processes one work item end to end
pub trait ItemHandler: Send + Sync {
    fn handle(&self, item: &WorkItem) -> Result<()>;
}

pub struct WorkerPool {
    sender: Option<Sender<WorkItem>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn start(threads: usize, capacity: usize, handler: Arc<dyn ItemHandler>) -> Result<Self> {
        if threads == 0 {
            return Err(ReelError::config("worker pool needs at least one thread"));
        }

        let (sender, receiver) = bounded::<WorkItem>(capacity.max(1));
        let mut handles = Vec::with_capacity(threads);

        for id in 0..threads {
            let receiver = receiver.clone();
            let handler = Arc::clone(&handler);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, receiver, handler))?;
            handles.push(handle);
        }

        log::info!("Started {} workers (queue capacity {})", threads, capacity.max(1));
        Ok(Self {
            sender: Some(sender),
            handles,
        })
    }

    /// A handle producers can use to enqueue items; sending blocks while the queue is full
    pub fn sender(&self) -> Result<Sender<WorkItem>> {
        self.sender
            .clone()
            .ok_or_else(|| ReelError::other("worker pool is shut down"))
    }

    pub fn submit(&self, item: WorkItem) -> Result<()> {
        self.sender()?
            .send(item)
            .map_err(|_| ReelError::other("worker pool is shut down"))
    }

    /// Close the queue, let workers drain it, and wait for them.
    ///
    /// Senders obtained through [`WorkerPool::sender`] must be dropped first.
    pub fn shutdown(mut self) {
        self.sender.take();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                log::error!("A worker thread terminated abnormally");
            }
        }
        log::info!("Worker pool stopped");
    }
}

fn worker_loop(id: usize, receiver: Receiver<WorkItem>, handler: Arc<dyn ItemHandler>) {
    for item in receiver.iter() {
        log::info!("worker-{} processing {}", id, item);

        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&item))) {
            Ok(Ok(())) => log::info!("worker-{} finished {}", id, item),
            Ok(Err(e)) => log::error!("worker-{} failed {} [{}]: {}", id, item, e.kind(), e),
            Err(_) => log::error!("worker-{} panicked while processing {}", id, item),
        }
    }
}
