// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::kubernetes::ClusterClient;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A request as the mock API server received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Decoded value of a query parameter
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths
/// and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    objects: Arc<Mutex<HashMap<String, Value>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            objects: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for requests with `method` matching the exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Serve `object` at `path`: GET returns it, PATCH applies a JSON merge patch to it
    pub fn with_object(self, path: &str, object: Value) -> Self {
        self.objects.lock().unwrap().insert(path.to_string(), object);
        self
    }

    pub fn object(&self, path: &str) -> Option<Value> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was recorded")
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Build a bootstrap client whose general and operator clients share this mock
    pub fn into_cluster_client(self) -> ClusterClient {
        ClusterClient::from_clients(self.clone().into_client(), self.into_client())
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }

    fn object_response(&self, method: &str, path: &str, body: &[u8]) -> Option<(u16, String)> {
        let mut objects = self.objects.lock().unwrap();
        let object = objects.get_mut(path)?;

        match method {
            "GET" => Some((200, object.to_string())),
            "PATCH" => {
                let patch: Value = serde_json::from_slice(body).ok()?;
                merge_patch(object, &patch);
                Some((200, object.to_string()))
            }
            _ => None,
        }
    }

    fn handle(&self, request: RecordedRequest) -> (u16, String) {
        let response = self
            .object_response(&request.method, &request.path, &request.body)
            .or_else(|| self.find_response(&request.method, &request.path));
        self.requests.lock().unwrap().push(request);

        response.unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")))
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let this = self.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = body.collect().await?.to_bytes().to_vec();
            let recorded = RecordedRequest {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                content_type: parts
                    .headers
                    .get(http::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string),
                body,
            };

            let (status, body) = this.handle(recorded);
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// JSON merge patch (RFC 7386): `null` removes a key, objects merge, anything else replaces
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Some(target) = target.as_object_mut() else {
        return;
    };

    for (key, value) in patch {
        if value.is_null() {
            target.remove(key);
        } else {
            merge_patch(target.entry(key.clone()).or_insert(Value::Null), value);
        }
    }
}

/// Create a Kubernetes Status failure body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

fn list_json(kind: &str, api_version: &str, items: Vec<Value>) -> String {
    json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
    .to_string()
}

pub fn node_json(name: &str, master: bool) -> Value {
    let mut labels = Map::new();
    labels.insert("kubernetes.io/hostname".to_string(), json!(name));
    if master {
        labels.insert("node-role.kubernetes.io/master".to_string(), json!(""));
    }
    json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": { "name": name, "labels": labels }
    })
}

pub fn node_list_json(nodes: Vec<Value>) -> String {
    list_json("NodeList", "v1", nodes)
}

pub fn pod_json(namespace: &str, name: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": { "name": name, "namespace": namespace }
    })
}

pub fn pod_list_json(pods: Vec<Value>) -> String {
    list_json("PodList", "v1", pods)
}

pub fn config_map_json(namespace: &str, name: &str, data: Value) -> String {
    json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": { "name": name, "namespace": namespace },
        "data": data
    })
    .to_string()
}

/// A CSR carrying `conditions` condition types, oldest first
pub fn csr_json(name: &str, conditions: &[&str]) -> Value {
    let conditions: Vec<Value> = conditions
        .iter()
        .map(|t| json!({ "type": t, "status": "True", "reason": "Test" }))
        .collect();
    json!({
        "apiVersion": "certificates.k8s.io/v1",
        "kind": "CertificateSigningRequest",
        "metadata": { "name": name, "resourceVersion": "42" },
        "spec": {
            "request": "Y3Ny",
            "signerName": "kubernetes.io/kube-apiserver-client-kubelet",
            "usages": ["digital signature", "client auth"]
        },
        "status": { "conditions": conditions }
    })
}

pub fn csr_list_json(csrs: Vec<Value>) -> String {
    list_json("CertificateSigningRequestList", "certificates.k8s.io/v1", csrs)
}

pub fn etcd_json(overrides: Value) -> Value {
    json!({
        "apiVersion": "operator.openshift.io/v1",
        "kind": "Etcd",
        "metadata": { "name": "cluster" },
        "spec": {
            "managementState": "Managed",
            "logLevel": "Normal",
            "unsupportedConfigOverrides": overrides
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_patch_removes_null_keys_and_keeps_others() {
        let mut target = json!({ "spec": { "a": 1, "b": { "c": true } } });

        merge_patch(&mut target, &json!({ "spec": { "b": null, "d": 2 } }));

        assert_eq!(target, json!({ "spec": { "a": 1, "d": 2 } }));
    }

    #[test]
    fn test_merge_patch_replaces_non_objects() {
        let mut target = json!({ "spec": { "a": [1, 2] } });

        merge_patch(&mut target, &json!({ "spec": { "a": [3] } }));

        assert_eq!(target, json!({ "spec": { "a": [3] } }));
    }
}
