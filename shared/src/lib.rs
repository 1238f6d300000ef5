//! # Expense dashboard core
//!
//! Platform-neutral logic shared by the dashboard frontend:
//!
//! - **request**: the per-view request lifecycle manager (cancellation on
//!   update/teardown, aggregate busy signal)
//! - **aggregation**: paginated upstream records into a date-sorted result
//! - **notion**: upstream query wire format and the record boundary adapter
//! - **expense**: normalized expense entries and the aggregated result
//! - **chart**: per-date/per-event series for the renderer
//!
//! Network access goes through the injected `Transport`, so everything here
//! runs natively in tests and in the browser alike.

pub mod aggregation;
pub mod chart;
pub mod config;
pub mod error;
pub mod expense;
pub mod notion;
pub mod request;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use aggregation::{ExpensePipeline, QueryInputs};
pub use chart::{all_events, category_breakdowns, CategoryBreakdown, EventSeries, OverviewSeries, PieSlice};
pub use config::{DashboardConfig, RecordSchema, MAX_PAGE_SIZE};
pub use error::{AggregationError, RecordError, RequestError, TransportError};
pub use expense::{split_amount, AggregatedResult, ExpenseEntry};
pub use notion::{normalize_record, QueryRequest, QueryResponse};
pub use request::{CancelReason, RequestId, RequestLifecycle};
pub use transport::{HttpMethod, OutboundRequest, RequestOptions, Transport};
