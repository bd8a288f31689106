#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use axum::Router;
use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use campus_engine::assistant::Assistant;
use campus_engine::llm::{ChatModel, CompletionRequest};
use campus_engine::resources::ResourceApi;

/// Replies with canned answers in order and remembers every request.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn fail(&self, message: &str) {
        self.replies.lock().unwrap().push_back(Err(anyhow!(message.to_string())));
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatModel for ScriptedModel {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left")));
        Box::pin(async move { reply })
    }
}

/// Resource API double that logs calls as `"<operation>:<id>"`.
#[derive(Default)]
pub struct RecordingResources {
    calls: Mutex<Vec<String>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingResources {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let resources = Self::default();
        *resources.fail_with.lock().unwrap() = Some(message.to_string());
        Arc::new(resources)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: String, data: Value) -> BoxFuture<'_, Result<Value>> {
        self.calls.lock().unwrap().push(call);
        let result = match self.fail_with.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(data),
        };
        Box::pin(async move { result })
    }
}

impl ResourceApi for RecordingResources {
    fn fetch_schools(&self) -> BoxFuture<'_, Result<Value>> {
        self.answer(
            "schools".to_string(),
            json!([{"uuid": "s-1", "name": "North High"}, {"uuid": "s-2", "name": "South Middle"}]),
        )
    }

    fn fetch_rooms<'a>(&'a self, school_uuid: &'a str) -> BoxFuture<'a, Result<Value>> {
        self.answer(
            format!("rooms:{}", school_uuid),
            json!([{"uuid": "r-1", "name": "Lab 101"}]),
        )
    }

    fn fetch_sensors<'a>(&'a self, room_uuid: &'a str) -> BoxFuture<'a, Result<Value>> {
        self.answer(
            format!("sensors:{}", room_uuid),
            json!([{"uuid": "t-1", "kind": "temperature"}]),
        )
    }

    fn fetch_sensor_value<'a>(&'a self, sensor_uuid: &'a str) -> BoxFuture<'a, Result<Value>> {
        self.answer(
            format!("values:{}", sensor_uuid),
            json!({"value": 21.5, "unit": "C"}),
        )
    }
}

pub fn assistant(model: &Arc<ScriptedModel>, resources: &Arc<RecordingResources>) -> Assistant {
    Assistant::new(model.clone(), resources.clone())
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
