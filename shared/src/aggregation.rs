//! # Record Aggregation Pipeline
//!
//! Follows the upstream pagination cursor page by page through the view's
//! `RequestLifecycle`, normalizes every record and returns the date-sorted
//! `AggregatedResult`. Pages are fetched strictly one after another since
//! each query needs the previous page's cursor.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{DashboardConfig, RecordSchema};
use crate::error::{AggregationError, TransportError};
use crate::expense::{AggregatedResult, ExpenseEntry};
use crate::notion::{normalize_record, QueryRequest, QueryResponse};
use crate::request::{CancelReason, RequestLifecycle};
use crate::transport::{RequestOptions, Transport};

/// Filter and sorts of one aggregation; a change supersedes in-flight pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryInputs {
    pub filter: Option<Value>,
    pub sorts: Vec<Value>,
}

impl QueryInputs {
    pub fn new(filter: Option<Value>, sorts: Vec<Value>) -> Self {
        Self { filter, sorts }
    }
}

pub struct ExpensePipeline<T> {
    lifecycle: RequestLifecycle<T, QueryInputs>,
    endpoint: String,
    page_size: u32,
    schema: RecordSchema,
}

impl<T: Transport> ExpensePipeline<T> {
    pub fn new(lifecycle: RequestLifecycle<T, QueryInputs>, config: &DashboardConfig) -> Self {
        Self {
            lifecycle,
            endpoint: config.query_endpoint.clone(),
            page_size: config.effective_page_size(),
            schema: config.schema.clone(),
        }
    }

    pub fn lifecycle(&self) -> &RequestLifecycle<T, QueryInputs> {
        &self.lifecycle
    }

    /// Aggregate every record matching no filter, in upstream order
    pub async fn fetch_all_default(&self) -> Result<AggregatedResult, AggregationError> {
        self.fetch_all(None, Vec::new()).await
    }

    /// Fetch all pages for `filter`/`sorts` and aggregate them.
    ///
    /// A call with different inputs than the previous one cancels that call's
    /// in-flight page first. Any failure aborts the whole aggregation and no
    /// partial entries are returned.
    pub async fn fetch_all(
        &self,
        filter: Option<Value>,
        sorts: Vec<Value>,
    ) -> Result<AggregatedResult, AggregationError> {
        self.lifecycle
            .update_inputs(QueryInputs::new(filter.clone(), sorts.clone()));
        let generation = self.lifecycle.generation();

        let mut entries: Vec<ExpenseEntry> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 0;

        loop {
            page_number += 1;
            let query = QueryRequest {
                page_size: self.page_size,
                start_cursor: cursor.take(),
                filter: filter.clone(),
                sorts: sorts.clone(),
            };
            let payload = serde_json::to_value(&query)
                .map_err(|e| AggregationError::Transport(TransportError::Encode(e.to_string())))?;

            let response = self
                .lifecycle
                .issue(&self.endpoint, Some(payload), RequestOptions::default())
                .await
                .map_err(|error| {
                    if !error.is_cancellation() {
                        warn!(page = page_number, %error, "aborting aggregation");
                    }
                    AggregationError::from(error)
                })?;

            // A page that completed after newer inputs arrived must not be used
            if self.lifecycle.generation() != generation {
                debug!(page = page_number, "aggregation superseded by newer inputs");
                return Err(AggregationError::Cancelled(CancelReason::ComponentUpdate));
            }

            let page: QueryResponse =
                serde_json::from_value(response).map_err(|e| AggregationError::InvalidPage {
                    page: page_number,
                    reason: e.to_string(),
                })?;
            debug!(
                page = page_number,
                records = page.results.len(),
                has_more = page.has_more,
                "received page"
            );

            for (index, record) in page.results.iter().enumerate() {
                let entry = normalize_record(record, &self.schema).map_err(|source| {
                    AggregationError::MalformedRecord {
                        page: page_number,
                        index,
                        source,
                    }
                })?;
                entries.push(entry);
            }

            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    return Err(AggregationError::InvalidPage {
                        page: page_number,
                        reason: "has_more is set but next_cursor is missing".to_string(),
                    })
                }
            }
        }

        let result = AggregatedResult::from_entries(entries);
        info!(
            pages = page_number,
            entries = result.len(),
            categories = result.categories().len(),
            "aggregated expense records"
        );
        Ok(result)
    }
}
