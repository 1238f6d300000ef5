use yew::prelude::*;
use shared::DashboardConfig;

mod components;
mod hooks;
mod services;

use components::AnalysisPage;
use services::Logger;

/// Element carrying the deployment's JSON config, if any
const CONFIG_ELEMENT_ID: &str = "dashboard-config";

/// Read the config embedded in the page, falling back to the defaults
fn load_config() -> DashboardConfig {
    let raw = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    match raw {
        Some(json) if !json.trim().is_empty() => match DashboardConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                Logger::warn_with_component("app", &format!("Invalid dashboard config, using defaults: {}", e));
                DashboardConfig::default()
            }
        },
        _ => DashboardConfig::default(),
    }
}

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| load_config());

    html! {
        <div class="app">
            <header class="header">
                <h1>{"Expenses"}</h1>
            </header>
            <AnalysisPage config={(*config).clone()} />
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
