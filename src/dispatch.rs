//! Synchronous and asynchronous execution of parameter requests.
//!
//! The synchronous path is a plain inline call. The asynchronous path moves a
//! [`WorkUnit`] through two dedicated threads: a worker that runs the resolver
//! and a completion thread that invokes the caller's callback. The unit is
//! handed between them by value over channels, so only one thread ever holds
//! it and no locking is needed.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use crate::error::PickError;
use crate::request::{CostParams, ParamRequest};
use crate::resolver::Resolver;

/// Completion handler for an asynchronous request.
///
/// Invoked exactly once, on the completion thread, with the outcome of the
/// resolver call. Validation failures never arrive here; they are returned
/// synchronously at submission time.
pub type ParamsCallback = Box<dyn FnOnce(Result<CostParams, PickError>) + Send + 'static>;

/// Runs the resolver inline on the calling thread.
pub fn run_sync(resolver: &dyn Resolver, req: &ParamRequest) -> Result<CostParams, PickError> {
    resolver
        .resolve(req.maxmem(), req.maxmemfrac(), req.maxtime())
        .map_err(PickError::NoSuitableParams)
}

/// A queued asynchronous request.
///
/// Owns its copy of the budgets, the callback, and (once the worker has run)
/// the outcome. It moves whole from submitter to worker to completion thread.
struct WorkUnit {
    req: ParamRequest,
    callback: ParamsCallback,
    outcome: Option<Result<CostParams, PickError>>,
}

impl WorkUnit {
    /// Invokes the callback exactly once and releases everything owned.
    ///
    /// A panic out of the caller's handler must not take down the completion
    /// thread, and must not suppress releasing the unit; it is caught and
    /// reported through the log.
    fn complete(self) {
        let Some(outcome) = self.outcome else {
            // The worker writes the outcome before handing the unit over;
            // completing without one would drop the callback uninvoked.
            debug_assert!(false, "work unit completed without an outcome");
            log::error!("params work unit completed without an outcome");
            return;
        };
        let callback = self.callback;
        if panic::catch_unwind(AssertUnwindSafe(move || callback(outcome))).is_err() {
            log::error!("params callback panicked");
        }
    }
}

/// Background execution for asynchronous requests.
///
/// One worker thread runs resolver calls; one completion thread delivers
/// outcomes, so completions never run concurrently with each other. Dropping
/// the dispatcher drains queued requests (each callback still fires) and
/// joins both threads.
pub struct Dispatcher {
    // Always Some except during drop.
    submit: Option<Sender<WorkUnit>>,
    worker: Option<JoinHandle<()>>,
    completer: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        let (submit_tx, submit_rx) = mpsc::channel::<WorkUnit>();
        let (done_tx, done_rx) = mpsc::channel::<WorkUnit>();

        let worker = thread::spawn(move || {
            while let Ok(mut unit) = submit_rx.recv() {
                let req = unit.req;
                unit.outcome = Some(
                    resolver
                        .resolve(req.maxmem(), req.maxmemfrac(), req.maxtime())
                        .map_err(PickError::NoSuitableParams),
                );
                if done_tx.send(unit).is_err() {
                    // Completion side is gone; nobody left to notify.
                    break;
                }
            }
        });

        let completer = thread::spawn(move || {
            while let Ok(unit) = done_rx.recv() {
                unit.complete();
            }
        });

        Self {
            submit: Some(submit_tx),
            worker: Some(worker),
            completer: Some(completer),
        }
    }

    /// Queues a request. The callback fires later on the completion thread;
    /// per request, execution strictly precedes completion. Across requests
    /// no ordering is promised, and queued work cannot be cancelled.
    pub fn submit(&self, req: ParamRequest, callback: ParamsCallback) {
        let unit = WorkUnit {
            req,
            callback,
            outcome: None,
        };
        let Some(sender) = &self.submit else { return };
        if sender.send(unit).is_err() {
            // Only reachable if the worker thread died.
            log::error!("params worker is gone; dropping queued request");
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        // Closing the submit side lets the worker drain and exit, which in
        // turn closes the completion channel.
        self.submit.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        if let Some(completer) = self.completer.take() {
            let _ = completer.join();
        }
    }
}
