//! One-shot background execution with panic isolation.

use crate::core::Context;
use crate::effects::transition::{BoxError, TransitionError};
use futures::FutureExt;
use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// A unit of work running on its own Tokio task.
///
/// The work starts as soon as the task is spawned. A panic inside it is
/// caught and reported as `TransitionError::Panicked`. Waiting can be cut
/// short by a `Context`, but the work itself is never interrupted: it runs to
/// completion in the background and its result is dropped with the task.
///
/// # Example
///
/// ```rust
/// use statewright::core::Context;
/// use statewright::effects::{FutureTask, TransitionError};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut task = FutureTask::spawn(async { Ok::<_, TransitionError>(21 * 2) });
/// assert_eq!(task.get(&Context::new()).await.unwrap(), 42);
/// assert!(task.done());
/// # }
/// ```
pub struct FutureTask<T = ()> {
    handle: Option<JoinHandle<Result<T, TransitionError>>>,
}

impl<T: Send + 'static> FutureTask<T> {
    /// Schedule `work` on the current Tokio runtime.
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T, TransitionError>> + Send + 'static,
    {
        install_panic_hook();
        debug!("spawning transition task");
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(panicked(payload)),
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Wait for the result, or for `ctx` to be cancelled or time out.
    ///
    /// When the context fires first the context's error is returned and the
    /// task keeps running; calling `get` again may still observe its result.
    /// Once a result has been returned, further calls yield
    /// `TransitionError::ResultTaken`.
    pub async fn get(&mut self, ctx: &Context) -> Result<T, TransitionError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(TransitionError::ResultTaken);
        };

        let joined = tokio::select! {
            biased;
            joined = handle => joined,
            reason = ctx.done() => return Err(reason.into()),
        };
        self.handle = None;

        match joined {
            Ok(result) => result,
            // the work itself never unwinds past catch_unwind, this covers
            // panics while polling the wrapper
            Err(join_error) if join_error.is_panic() => Err(panicked(join_error.into_panic())),
            Err(_) => Err(TransitionError::Aborted),
        }
    }

    /// Non-blocking completion check.
    pub fn done(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

thread_local! {
    static PANIC_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chain a hook that records the backtrace while the panicking frames are
/// still on the stack. `catch_unwind` runs on the same thread right after.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let backtrace = Backtrace::force_capture().to_string();
            PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(backtrace));
            previous(info);
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(err) = payload.downcast_ref::<BoxError>() {
        err.to_string()
    } else if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send>>() {
        err.to_string()
    } else {
        "non-string panic payload".to_string()
    }
}

fn panicked(payload: Box<dyn Any + Send>) -> TransitionError {
    let message = panic_message(payload.as_ref());
    let backtrace = PANIC_BACKTRACE
        .with(|slot| slot.borrow_mut().take())
        .unwrap_or_else(|| Backtrace::force_capture().to_string());

    error!(panic = %message, "transition task panicked");

    TransitionError::Panicked { message, backtrace }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContextError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn returns_work_result() {
        let mut task = FutureTask::spawn(async { Ok::<_, TransitionError>("done") });

        assert_eq!(task.get(&Context::new()).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn returns_work_error() {
        let mut task: FutureTask = FutureTask::spawn(async { Err(TransitionError::NoTransitions) });

        let err = task.get(&Context::new()).await.unwrap_err();
        assert!(matches!(err, TransitionError::NoTransitions));
    }

    fn explode(message: String) -> Result<(), TransitionError> {
        panic!("{message}")
    }

    #[tokio::test]
    async fn panic_becomes_error() {
        let mut task: FutureTask = FutureTask::spawn(async { explode("boom".to_string()) });

        match task.get(&Context::new()).await.unwrap_err() {
            TransitionError::Panicked { message, backtrace } => {
                assert_eq!(message, "boom");
                assert!(!backtrace.is_empty());
            }
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    fn explode_with<P: Any + Send>(payload: P) -> Result<(), TransitionError> {
        std::panic::panic_any(payload)
    }

    #[inline(never)]
    fn fail_deep_inside_action() -> Result<(), TransitionError> {
        panic!("disk full")
    }

    #[tokio::test]
    async fn backtrace_points_at_failure_site() {
        let mut task: FutureTask = FutureTask::spawn(async { fail_deep_inside_action() });

        match task.get(&Context::new()).await.unwrap_err() {
            TransitionError::Panicked { backtrace, .. } => {
                assert!(backtrace.contains("fail_deep_inside_action"), "{backtrace}");
            }
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_payload_keeps_its_message() {
        let fault: BoxError = "disk on fire".into();
        let mut task: FutureTask = FutureTask::spawn(async move { explode_with(fault) });

        let err = task.get(&Context::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "transition action panicked: disk on fire");
    }

    #[tokio::test]
    async fn unknown_payload_is_still_reported() {
        struct Fault;

        let mut task: FutureTask = FutureTask::spawn(async { explode_with(Fault) });

        let err = task.get(&Context::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "transition action panicked: non-string panic payload");
    }

    #[tokio::test]
    async fn formatted_panic_message_is_kept() {
        let index = 7;
        let mut task: FutureTask =
            FutureTask::spawn(async move { explode(format!("index {index} out of range")) });

        let err = task.get(&Context::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "transition action panicked: index 7 out of range");
    }

    #[tokio::test]
    async fn cancellation_does_not_stop_work() {
        let counter = Arc::new(AtomicUsize::new(0));
        let worker_counter = Arc::clone(&counter);
        let mut task: FutureTask = FutureTask::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            worker_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let ctx = Context::new();
        ctx.cancel();
        let err = task.get(&ctx).await.unwrap_err();
        assert!(matches!(err, TransitionError::Context(ContextError::Cancelled)));
        assert!(!task.done());

        // a second wait with a live context still sees the outcome
        task.get(&Context::new()).await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(task.done());
    }

    #[tokio::test]
    async fn timeout_reports_deadline() {
        let mut task: FutureTask = FutureTask::spawn(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        });

        let ctx = Context::new().with_timeout(Duration::from_millis(10));
        let err = task.get(&ctx).await.unwrap_err();

        assert!(matches!(err, TransitionError::Context(ContextError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn result_is_taken_once() {
        let mut task: FutureTask = FutureTask::spawn(async { Ok(()) });

        task.get(&Context::new()).await.unwrap();
        let err = task.get(&Context::new()).await.unwrap_err();

        assert!(matches!(err, TransitionError::ResultTaken));
    }
}
