use yew::prelude::*;
use shared::{category_breakdowns, DashboardConfig, QueryInputs};

use crate::components::OverviewCard;
use crate::hooks::use_expenses;

#[derive(Properties, PartialEq)]
pub struct AnalysisPageProps {
    pub config: DashboardConfig,
    #[prop_or_default]
    pub inputs: QueryInputs,
}

/// Overview of every expense followed by one card per category
#[function_component(AnalysisPage)]
pub fn analysis_page(props: &AnalysisPageProps) -> Html {
    let expenses = use_expenses(props.config.clone(), props.inputs.clone());

    let breakdowns = use_memo(expenses.result.clone(), |result| {
        result
            .as_ref()
            .map(|result| category_breakdowns(result))
            .unwrap_or_default()
    });

    let all_entries = expenses
        .result
        .as_ref()
        .map(|result| result.entries().to_vec())
        .unwrap_or_default();

    let on_reload = {
        let reload = expenses.reload.clone();
        Callback::from(move |_: MouseEvent| reload.emit(()))
    };

    html! {
        <main class="analysis-page">
            <div class="analysis-toolbar">
                <button class="reload-button" onclick={on_reload} disabled={expenses.loading}>
                    {if expenses.loading { "Loading..." } else { "Reload" }}
                </button>
            </div>

            {if let Some(error) = &expenses.error {
                html! { <div class="error-message">{format!("Failed to load expenses: {}", error)}</div> }
            } else {
                html! {}
            }}

            <OverviewCard title="Overview" entries={all_entries} loading={expenses.loading} />

            {for breakdowns.iter().map(|breakdown| html! {
                <OverviewCard
                    key={breakdown.category.clone()}
                    title={breakdown.category.clone()}
                    entries={breakdown.entries.clone()}
                    loading={expenses.loading}
                />
            })}
        </main>
    }
}
