//! Scripted transport and upstream page builders shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::transport::{OutboundRequest, Transport};

/// What the scripted transport does with the next call
pub enum Reply {
    Json(Value),
    Fail(TransportError),
    /// Never answers; the call can only end by cancellation
    Hang,
    /// Answers with whatever the test sends through the paired sender
    Gated(oneshot::Receiver<Value>),
}

/// Transport answering calls from a fixed script, in order, and recording
/// every request it receives
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Rc<Self> {
        Rc::new(Self {
            replies: RefCell::new(replies.into_iter().collect()),
            requests: RefCell::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// `start_cursor` of every query payload sent so far
    pub fn cursors(&self) -> Vec<Option<String>> {
        self.requests
            .borrow()
            .iter()
            .map(|request| {
                request
                    .payload
                    .as_ref()
                    .and_then(|payload| payload.get("start_cursor"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Value, TransportError> {
        self.requests.borrow_mut().push(request);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Gated(gate)) => gate
                .await
                .map_err(|_| TransportError::Network("gate dropped".to_string())),
            Some(Reply::Hang) | None => futures::future::pending().await,
        }
    }
}

/// Build an upstream record the way the database service returns it
pub fn record(date: &str, text: &str, tags: &[&str]) -> Value {
    json!({
        "object": "page",
        "properties": {
            "Date": { "type": "date", "date": { "start": date, "end": null } },
            "Name": {
                "type": "title",
                "title": [{ "type": "text", "plain_text": text, "text": { "content": text } }]
            },
            "Tags": {
                "type": "multi_select",
                "multi_select": tags.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>()
            }
        }
    })
}

/// Build one query response page; `next_cursor = None` marks the last page
pub fn page(results: Vec<Value>, next_cursor: Option<&str>) -> Value {
    json!({
        "object": "list",
        "results": results,
        "has_more": next_cursor.is_some(),
        "next_cursor": next_cursor,
    })
}
