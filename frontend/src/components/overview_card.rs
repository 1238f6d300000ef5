use yew::prelude::*;
use shared::{all_events, ExpenseEntry, OverviewSeries};

use crate::services::Logger;

#[derive(Properties, PartialEq)]
pub struct OverviewCardProps {
    pub title: AttrValue,
    pub entries: Vec<ExpenseEntry>,
    pub loading: bool,
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Stacked per-date overview of a set of entries, with a per-event filter
///
/// The card only shapes the data. The serialized series are exposed on the
/// `data-series` attribute for the chart renderer to pick up.
#[function_component(OverviewCard)]
pub fn overview_card(props: &OverviewCardProps) -> Html {
    // None means every event is shown
    let selected_events = use_state(|| Option::<Vec<String>>::None);

    // New data resets the filter
    {
        let selected_events = selected_events.clone();
        use_effect_with(props.entries.clone(), move |_| {
            selected_events.set(None);
            || ()
        });
    }

    let events = use_memo(props.entries.clone(), |entries| all_events(entries));

    let overview = use_memo(
        (props.entries.clone(), (*selected_events).clone()),
        |(entries, selected)| OverviewSeries::build(entries, selected.as_deref()),
    );

    let toggle_event = {
        let selected_events = selected_events.clone();
        let events = events.clone();
        Callback::from(move |event: String| {
            let mut selected = (*selected_events)
                .clone()
                .unwrap_or_else(|| (*events).clone());
            if let Some(position) = selected.iter().position(|e| *e == event) {
                selected.remove(position);
            } else {
                selected.push(event);
            }
            selected_events.set(Some(selected));
        })
    };

    // Left off the element when serialization fails
    let series_json = overview
        .to_json()
        .map_err(|e| {
            Logger::warn_with_component("overview-card", &format!("Failed to serialize series: {}", e));
        })
        .ok();

    html! {
        <section class="overview-card" data-series={series_json}>
            <header class="overview-card-header">
                <h2>{props.title.clone()}</h2>
                <span class="overview-total">{format!("Total: {}", format_amount(overview.total))}</span>
            </header>

            {if props.loading {
                html! { <div class="loading">{"Loading expenses..."}</div> }
            } else if events.is_empty() {
                html! { <div class="empty-state">{"No expenses"}</div> }
            } else {
                html! {
                    <>
                        <div class="event-filter">
                            {for events.iter().map(|event| {
                                let checked = selected_events
                                    .as_ref()
                                    .map_or(true, |selected| selected.contains(event));
                                let onchange = {
                                    let toggle_event = toggle_event.clone();
                                    let event = event.clone();
                                    Callback::from(move |_: Event| toggle_event.emit(event.clone()))
                                };
                                html! {
                                    <label class="event-option">
                                        <input type="checkbox" {checked} {onchange} />
                                        {event}
                                    </label>
                                }
                            })}
                        </div>

                        <div class="table-container">
                            <table class="overview-table">
                                <thead>
                                    <tr>
                                        <th>{"Event"}</th>
                                        {for overview.axis_labels.iter().map(|label| html! { <th>{label}</th> })}
                                    </tr>
                                </thead>
                                <tbody>
                                    {for overview.series.iter().map(|serie| html! {
                                        <tr>
                                            <td class="event">{&serie.name}</td>
                                            {for serie.values.iter().map(|value| html! {
                                                <td class="amount">{format_amount(*value)}</td>
                                            })}
                                        </tr>
                                    })}
                                </tbody>
                            </table>
                        </div>

                        <ul class="overview-slices">
                            {for overview.slices.iter().map(|slice| html! {
                                <li class="slice">
                                    <span class="slice-name">{&slice.name}</span>
                                    <span class="slice-value">{format_amount(slice.value)}</span>
                                </li>
                            })}
                        </ul>
                    </>
                }
            }}
        </section>
    }
}
