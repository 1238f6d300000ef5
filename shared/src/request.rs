//! # Request Lifecycle
//!
//! Every outbound call a view makes goes through one `RequestLifecycle`.
//! The manager keeps a cancel capability for each in-flight call, derives an
//! aggregate busy signal from them, and abandons stale calls when the view's
//! inputs change or the view is torn down.
//!
//! Everything runs on a single logical thread: state lives in
//! `Rc<RefCell<_>>` and no borrow is held across an `.await`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, Either};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::RequestError;
use crate::transport::{OutboundRequest, RequestOptions, Transport};

const COMPONENT_UPDATE_MESSAGE: &str = "component update";
const COMPONENT_UNMOUNT_MESSAGE: &str = "component unmount";

/// Opaque identifier of one in-flight call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a call was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The view's inputs changed; a fresher call supersedes this one
    ComponentUpdate,
    /// The view is gone; nothing may touch its state any more
    ComponentUnmount,
    Other(String),
}

impl CancelReason {
    pub fn as_str(&self) -> &str {
        match self {
            CancelReason::ComponentUpdate => COMPONENT_UPDATE_MESSAGE,
            CancelReason::ComponentUnmount => COMPONENT_UNMOUNT_MESSAGE,
            CancelReason::Other(message) => message,
        }
    }

    pub fn is_unmount(&self) -> bool {
        matches!(self, CancelReason::ComponentUnmount)
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BusyListener = Rc<dyn Fn(bool)>;

struct LifecycleState<D> {
    /// A `None` capability has already been fired and is waiting for its
    /// call to settle.
    pending: HashMap<RequestId, Option<oneshot::Sender<CancelReason>>>,
    busy: bool,
    torn_down: bool,
    inputs: D,
    /// Bumped every time `inputs` change
    generation: u64,
    listener: Option<BusyListener>,
}

/// Request lifecycle manager for one view.
///
/// Cloning yields another handle to the same state. `D` is the view's
/// dependency-input type; use `()` when the view has none.
pub struct RequestLifecycle<T, D = ()> {
    transport: Rc<T>,
    state: Rc<RefCell<LifecycleState<D>>>,
}

impl<T, D> Clone for RequestLifecycle<T, D> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            state: Rc::clone(&self.state),
        }
    }
}

impl<T, D> RequestLifecycle<T, D>
where
    T: Transport,
    D: PartialEq,
{
    /// Create a manager whose dependency baseline is `inputs`
    pub fn new(transport: Rc<T>, inputs: D) -> Self {
        Self {
            transport,
            state: Rc::new(RefCell::new(LifecycleState {
                pending: HashMap::new(),
                busy: false,
                torn_down: false,
                inputs,
                generation: 0,
                listener: None,
            })),
        }
    }

    /// Register the callback invoked on every busy transition
    pub fn on_busy_change(&self, listener: impl Fn(bool) + 'static) {
        self.state.borrow_mut().listener = Some(Rc::new(listener));
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.borrow().torn_down
    }

    /// Input generation; a work unit started under an older generation has
    /// been superseded.
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Issue one call and wait for it to settle.
    ///
    /// The call resolves with `RequestError::Cancelled` when it is cancelled
    /// before the transport answers. After teardown no call is made at all.
    pub async fn issue(
        &self,
        endpoint: &str,
        payload: Option<Value>,
        options: RequestOptions,
    ) -> Result<Value, RequestError> {
        if self.is_torn_down() {
            debug!(endpoint, "request issued after teardown; skipping");
            return Err(RequestError::Cancelled(CancelReason::ComponentUnmount));
        }

        let id = RequestId::generate();
        let (cancel, cancelled) = oneshot::channel();
        let became_busy = {
            let mut state = self.state.borrow_mut();
            state.pending.insert(id, Some(cancel));
            !std::mem::replace(&mut state.busy, true)
        };
        if became_busy {
            self.notify(true);
        }
        debug!(request_id = %id, endpoint, "issuing request");

        let request = OutboundRequest {
            id,
            endpoint: endpoint.to_string(),
            payload,
            options,
        };
        let transport = Rc::clone(&self.transport);
        let call = Box::pin(async move { transport.send(request).await });

        let outcome = match future::select(call, cancelled).await {
            Either::Left((result, _)) => result.map_err(RequestError::Transport),
            Either::Right((Ok(reason), _)) => Err(RequestError::Cancelled(reason)),
            // The capability was dropped without firing; let the call finish.
            Either::Right((Err(oneshot::Canceled), call)) => {
                call.await.map_err(RequestError::Transport)
            }
        };

        self.settle(id, &outcome);
        outcome
    }

    /// Fire the cancel capability of every tracked call.
    ///
    /// Entries stay in `pending` until their own call settles.
    pub fn cancel_all(&self, reason: CancelReason) {
        let cancels: Vec<_> = {
            let mut state = self.state.borrow_mut();
            state.pending.values_mut().filter_map(Option::take).collect()
        };
        if cancels.is_empty() {
            return;
        }

        debug!(count = cancels.len(), %reason, "cancelling pending requests");
        for cancel in cancels {
            // The receiver is gone only if its call already settled.
            let _ = cancel.send(reason.clone());
        }
    }

    /// Record the view's current inputs. Returns `true` when they differ from
    /// the previous ones, in which case every in-flight call is cancelled with
    /// `CancelReason::ComponentUpdate`.
    pub fn update_inputs(&self, inputs: D) -> bool {
        let changed = {
            let mut state = self.state.borrow_mut();
            if state.inputs == inputs {
                false
            } else {
                state.inputs = inputs;
                state.generation += 1;
                true
            }
        };

        if changed {
            self.cancel_all(CancelReason::ComponentUpdate);
        }
        changed
    }

    /// Dispose of the view. Only the first call has any effect.
    pub fn teardown(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
        }
        debug!("request lifecycle torn down");
        self.cancel_all(CancelReason::ComponentUnmount);
    }

    fn settle(&self, id: RequestId, outcome: &Result<Value, RequestError>) {
        let became_idle = {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                debug!(request_id = %id, "request settled after teardown");
                return;
            }
            state.pending.remove(&id);
            if state.pending.is_empty() && state.busy {
                state.busy = false;
                true
            } else {
                false
            }
        };

        match outcome {
            Ok(_) => debug!(request_id = %id, "request succeeded"),
            Err(RequestError::Cancelled(reason)) => {
                debug!(request_id = %id, %reason, "request cancelled")
            }
            Err(error) => warn!(request_id = %id, %error, "request failed"),
        }

        if became_idle {
            self.notify(false);
        }
    }

    fn notify(&self, busy: bool) {
        let listener = {
            let state = self.state.borrow();
            if state.torn_down {
                None
            } else {
                state.listener.clone()
            }
        };
        if let Some(listener) = listener {
            listener(busy);
        }
    }
}
