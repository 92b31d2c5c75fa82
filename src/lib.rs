mod args;
mod dispatch;
mod error;
mod request;
mod resolver;

pub use crate::args::{Arg, Mode, classify};
pub use crate::dispatch::{Dispatcher, ParamsCallback, run_sync};
pub use crate::error::PickError;
pub use crate::request::{CostParams, MAXMEM_DEFAULT, MAXMEMFRAC_DEFAULT, ParamRequest};
pub use crate::resolver::{ErrorCode, Resolver, SystemResolver};

use std::sync::{Arc, OnceLock};

/// Entry point for picking scrypt cost parameters.
///
/// Wraps a [`Resolver`] with a synchronous operation, a callback-completed
/// asynchronous operation, and the legacy positional calling convention.
/// Background threads start only once the asynchronous path is first used.
pub struct Picker {
    resolver: Arc<dyn Resolver>,
    dispatcher: OnceLock<Dispatcher>,
}

impl Picker {
    /// A picker backed by the machine-probing [`SystemResolver`].
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SystemResolver))
    }

    pub fn with_resolver(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            dispatcher: OnceLock::new(),
        }
    }

    /// Picks parameters inline on the calling thread.
    pub fn params_sync(&self, req: &ParamRequest) -> Result<CostParams, PickError> {
        dispatch::run_sync(self.resolver.as_ref(), req)
    }

    /// Queues a pick; the callback fires exactly once, later, on the
    /// completion thread, with either the picked parameters or the resolver's
    /// failure. The request was already validated, so nothing fails here.
    pub fn params_async(&self, req: ParamRequest, callback: ParamsCallback) {
        self.dispatcher().submit(req, callback);
    }

    /// The legacy positional calling convention.
    ///
    /// Classifies the argument list, then delegates: `Ok(Some(params))` for a
    /// synchronous call, `Ok(None)` when a callback was supplied and the
    /// outcome will be delivered through it. Validation failures are always
    /// returned here, never deferred into the callback.
    pub fn params(&self, args: Vec<Arg>) -> Result<Option<CostParams>, PickError> {
        let (req, mode) = args::classify(args)?;
        match mode {
            Mode::Sync => self.params_sync(&req).map(Some),
            Mode::Async(callback) => {
                self.params_async(req, callback);
                Ok(None)
            }
        }
    }

    fn dispatcher(&self) -> &Dispatcher {
        self.dispatcher
            .get_or_init(|| Dispatcher::new(Arc::clone(&self.resolver)))
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    struct StubResolver {
        result: Result<CostParams, ErrorCode>,
        calls: AtomicUsize,
    }

    impl StubResolver {
        fn ok(params: CostParams) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(params),
                calls: AtomicUsize::new(0),
            })
        }

        fn err(code: ErrorCode) -> Arc<Self> {
            Arc::new(Self {
                result: Err(code),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Resolver for StubResolver {
        fn resolve(&self, _: u64, _: f64, _: f64) -> Result<CostParams, ErrorCode> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    #[test]
    fn single_maxtime_returns_the_resolver_triple() {
        let stub = StubResolver::ok(CostParams::new(16384, 8, 1));
        let picker = Picker::with_resolver(stub.clone());

        let params = picker.params(vec![Arg::Num(5.0)]).unwrap().unwrap();
        assert_eq!(params, CostParams::new(16384, 8, 1));
        assert_eq!(params.to_json(), serde_json::json!({"N": 16384, "r": 8, "p": 1}));
    }

    #[test]
    fn validation_failure_never_reaches_the_resolver() {
        let stub = StubResolver::ok(CostParams::new(2, 8, 1));
        let picker = Picker::with_resolver(stub.clone());

        assert!(picker.params(vec![]).is_err());
        assert!(picker.params(vec![Arg::Num(0.0)]).is_err());
        assert!(
            picker
                .params(vec![Arg::Callback(Box::new(|_| {}))])
                .is_err()
        );
        // Async-shaped calls validate synchronously too.
        assert!(
            picker
                .params(vec![Arg::Num(-1.0), Arg::Callback(Box::new(|_| {}))])
                .is_err()
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn async_call_returns_nothing_and_completes_later() {
        let stub = StubResolver::ok(CostParams::new(1024, 8, 2));
        let picker = Picker::with_resolver(stub.clone());

        let (tx, rx) = mpsc::channel();
        let returned = picker
            .params(vec![
                Arg::Num(5.0),
                Arg::Callback(Box::new(move |outcome| tx.send(outcome).unwrap())),
            ])
            .unwrap();
        assert!(returned.is_none());

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.unwrap(), CostParams::new(1024, 8, 2));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn async_resolver_failure_arrives_with_the_fixed_message() {
        let stub = StubResolver::err(ErrorCode::MemoryProbe);
        let picker = Picker::with_resolver(stub);

        let (tx, rx) = mpsc::channel();
        let returned = picker
            .params(vec![
                Arg::Num(5.0),
                Arg::Num(0.25),
                Arg::Num(1048576.0),
                Arg::Callback(Box::new(move |outcome| {
                    tx.send(outcome.map_err(|e| e.to_string())).unwrap();
                })),
            ])
            .unwrap();
        assert!(returned.is_none());

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            outcome.unwrap_err(),
            "getrlimit or sysctl(hw.usermem) failed"
        );
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn sync_resolver_failure_is_an_immediate_error() {
        let picker = Picker::with_resolver(StubResolver::err(ErrorCode::KdfProbe));
        let err = picker.params(vec![Arg::Num(5.0)]).unwrap_err();
        assert_eq!(err.to_string(), "error computing derived key");
    }

    #[test]
    fn explicit_operations_work_without_the_adapter() {
        let picker = Picker::with_resolver(StubResolver::ok(CostParams::new(4096, 8, 1)));
        let req = ParamRequest::new(2.0, 0.25, 0).unwrap();

        assert_eq!(
            picker.params_sync(&req).unwrap(),
            CostParams::new(4096, 8, 1)
        );

        let (tx, rx) = mpsc::channel();
        picker.params_async(req, Box::new(move |outcome| tx.send(outcome).unwrap()));
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap(),
            CostParams::new(4096, 8, 1)
        );
    }
}
