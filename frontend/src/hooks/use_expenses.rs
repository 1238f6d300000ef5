use std::rc::Rc;

use shared::{AggregatedResult, DashboardConfig, ExpensePipeline, QueryInputs};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_request;
use crate::services::GatewayTransport;
use crate::services::Logger;

pub struct UseExpensesResult {
    pub result: Option<Rc<AggregatedResult>>,
    pub loading: bool,
    pub error: Option<String>,
    pub reload: Callback<()>,
}

/// Hook that aggregates every expense record matching `inputs`
///
/// Fetches on mount and again whenever `inputs` change. Cancelled fetches are
/// dropped silently; any other failure is logged and exposed once through
/// `error`, and no partial result is kept. `config` is only read on mount.
#[hook]
pub fn use_expenses(config: DashboardConfig, inputs: QueryInputs) -> UseExpensesResult {
    // The config is read once at mount, like the lifecycle and the pipeline
    let transport = {
        let base_url = config.base_url.clone();
        use_memo((), move |_| GatewayTransport::new(base_url))
    };
    let request = use_request(transport, inputs.clone());

    let pipeline = {
        let lifecycle = request.lifecycle.clone();
        use_memo((), move |_| ExpensePipeline::new(lifecycle, &config))
    };

    let result = use_state(|| Option::<Rc<AggregatedResult>>::None);
    let error = use_state(|| Option::<String>::None);

    let reload = {
        let pipeline = pipeline.clone();
        let result = result.clone();
        let error = error.clone();

        use_callback(inputs.clone(), move |_: (), inputs: &QueryInputs| {
            let pipeline = pipeline.clone();
            let result = result.clone();
            let error = error.clone();
            let inputs = inputs.clone();

            spawn_local(async move {
                match pipeline.fetch_all(inputs.filter, inputs.sorts).await {
                    Ok(aggregated) => {
                        Logger::info_with_component(
                            "expenses-hook",
                            &format!(
                                "Loaded {} expenses in {} categories",
                                aggregated.len(),
                                aggregated.categories().len()
                            ),
                        );
                        error.set(None);
                        result.set(Some(Rc::new(aggregated)));
                    }
                    Err(e) if e.is_silent() => {
                        Logger::debug_with_component("expenses-hook", &format!("Fetch abandoned: {}", e));
                    }
                    Err(e) => {
                        Logger::error_with_component("expenses-hook", &format!("Failed to fetch expenses: {}", e));
                        result.set(None);
                        error.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    // Fetch on mount and whenever the inputs change
    {
        let reload = reload.clone();
        use_effect_with(inputs, move |_| {
            reload.emit(());
            || ()
        });
    }

    UseExpensesResult {
        result: (*result).clone(),
        loading: request.busy,
        error: (*error).clone(),
        reload,
    }
}
