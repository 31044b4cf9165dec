//! Scripted stand-in for the SWIS query endpoint.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::client::{Query, QueryResult};
use crate::error::{OrionError, OrionResult};

pub struct FakeSwis {
    responses: RefCell<VecDeque<OrionResult<QueryResult>>>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl FakeSwis {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Queue a raw response body.
    pub fn respond(self, body: Value) -> Self {
        let result = serde_json::from_value(body).expect("fake response must be a query result");
        self.responses.borrow_mut().push_back(Ok(result));
        self
    }

    pub fn fail(self, error: OrionError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }
}

impl Query for FakeSwis {
    fn query(&self, swql: &str, params: Value) -> OrionResult<QueryResult> {
        self.calls.borrow_mut().push((swql.to_string(), params));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected query: {}", swql))
    }
}
