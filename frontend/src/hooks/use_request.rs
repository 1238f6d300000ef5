use std::rc::Rc;

use shared::{RequestLifecycle, Transport};
use yew::prelude::*;

use crate::services::Logger;

/// Handle returned by `use_request`
pub struct UseRequestHandle<T, D> {
    pub lifecycle: RequestLifecycle<T, D>,
    /// True while at least one call of this component is in flight
    pub busy: bool,
}

/// Hook that owns the request lifecycle of one component
///
/// # Arguments
/// * `transport` - Transport used for every call of the component
/// * `inputs` - Dependency inputs; when they change, in-flight calls are
///   cancelled with "component update"
///
/// On unmount the lifecycle is torn down and any call still in flight settles
/// with "component unmount" without touching component state.
#[hook]
pub fn use_request<T, D>(transport: Rc<T>, inputs: D) -> UseRequestHandle<T, D>
where
    T: Transport + 'static,
    D: PartialEq + Clone + 'static,
{
    let busy = use_state(|| false);

    let lifecycle = {
        let busy = busy.clone();
        let baseline = inputs.clone();
        use_memo((), move |_| {
            let lifecycle = RequestLifecycle::new(transport, baseline);
            lifecycle.on_busy_change(move |is_busy| busy.set(is_busy));
            lifecycle
        })
    };

    // Supersede stale calls whenever the inputs change
    {
        let lifecycle = lifecycle.clone();
        use_effect_with(inputs, move |inputs| {
            if lifecycle.update_inputs(inputs.clone()) {
                Logger::debug_with_component("request-hook", "Inputs changed, cancelled pending requests");
            }
            || ()
        });
    }

    // Cleanup on component unmount
    {
        let lifecycle = lifecycle.clone();
        use_effect_with((), move |_| {
            move || {
                lifecycle.teardown();
                Logger::debug_with_component("request-hook", "Request lifecycle torn down");
            }
        });
    }

    UseRequestHandle {
        lifecycle: (*lifecycle).clone(),
        busy: *busy,
    }
}
