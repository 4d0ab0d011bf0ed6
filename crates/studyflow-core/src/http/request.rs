use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::types::ApiEnvelope;
use crate::error::Result;

/// An outbound API call, kept as plain data so it can be replayed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }
}

/// Status and body of a completed HTTP exchange, whatever the status
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse the `{message?, data}` envelope and return `data`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(self.json::<ApiEnvelope<T>>()?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = ApiRequest::get("/projects")
            .with_query("page", "2")
            .with_body(serde_json::json!({ "a": 1 }));

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
        assert!(request.body.is_some());
    }

    #[test]
    fn test_response_data_unwraps_envelope() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: r#"{"message":"ok","data":{"id":"p1"}}"#.to_string(),
        };

        let data: serde_json::Value = response.data().unwrap();
        assert_eq!(data, serde_json::json!({ "id": "p1" }));
    }
}
