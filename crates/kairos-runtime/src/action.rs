//! Event actions
//!
//! How an action is executed is decided once, when it is built:
//! - `Immediate`: short synchronous closure, runs inline on the driver
//! - `Deferred`: blocking closure, dispatched to the blocking pool and awaited
//! - `Async`: closure producing a future, polled in-line by the driver

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use kairos_core::{EventId, KairosError, KairosResult};

type SyncFn = Arc<dyn Fn() + Send + Sync>;
type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type AsyncFn = Arc<dyn Fn() -> BoxFuture + Send + Sync>;

/// Execution capability of an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Immediate,
    Deferred,
    Async,
}

/// Zero-argument procedure executed once per qualifying tick
#[derive(Clone)]
pub enum Action {
    Immediate(SyncFn),
    Deferred(SyncFn),
    Async(AsyncFn),
}

impl Action {
    /// Synchronous closure run inline. Keep it short: the driver waits on it.
    pub fn immediate<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action::Immediate(Arc::new(f))
    }

    /// Blocking closure run on the blocking thread pool
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action::Deferred(Arc::new(f))
    }

    /// Closure returning a future
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Action::Async(Arc::new(move || Box::pin(f()) as BoxFuture))
    }

    /// Action that does nothing; useful for pure timing events
    pub fn noop() -> Self {
        Action::immediate(|| {})
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Immediate(_) => ActionKind::Immediate,
            Action::Deferred(_) => ActionKind::Deferred,
            Action::Async(_) => ActionKind::Async,
        }
    }

    /// Run the action once and return its wall-clock execution time.
    ///
    /// A panic inside the action is caught and returned as
    /// [`KairosError::ActionPanicked`].
    pub async fn invoke(&self, event: EventId) -> KairosResult<Duration> {
        let started = Instant::now();
        match self {
            Action::Immediate(f) => {
                panic::catch_unwind(AssertUnwindSafe(|| f()))
                    .map_err(|payload| panicked(event, payload))?;
            }
            Action::Deferred(f) => {
                let f = Arc::clone(f);
                tokio::task::spawn_blocking(move || f())
                    .await
                    .map_err(|e| join_failure(event, e))?;
            }
            Action::Async(f) => {
                CatchPanic(f()).await.map_err(|payload| panicked(event, payload))?;
            }
        }
        Ok(started.elapsed())
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Action::{:?}", self.kind())
    }
}

/// Polls the wrapped future, turning a panic in any poll into an error
struct CatchPanic<F>(F);

impl<F: Future + Unpin> Future for CatchPanic<F> {
    type Output = Result<F::Output, Box<dyn Any + Send>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = &mut self.0;
        match panic::catch_unwind(AssertUnwindSafe(|| Pin::new(inner).poll(cx))) {
            Ok(Poll::Pending) => Poll::Pending,
            Ok(Poll::Ready(out)) => Poll::Ready(Ok(out)),
            Err(payload) => Poll::Ready(Err(payload)),
        }
    }
}

fn join_failure(event: EventId, err: tokio::task::JoinError) -> KairosError {
    if err.is_panic() {
        panicked(event, err.into_panic())
    } else {
        KairosError::ActionPanicked {
            event,
            reason: err.to_string(),
        }
    }
}

fn panicked(event: EventId, payload: Box<dyn Any + Send>) -> KairosError {
    let reason = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    KairosError::ActionPanicked { event, reason }
}
