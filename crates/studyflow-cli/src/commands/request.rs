use anyhow::{Context, Result, anyhow};
use reqwest::Method;
use serde_json::{Value, json};
use studyflow_core::AppCore;
use studyflow_core::http::ApiRequest;
use tracing::{info, warn};

use super::report_session_events;
use crate::cli::RequestArgs;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(core: &AppCore, args: RequestArgs, format: OutputFormat) -> Result<()> {
    let request = build_request(args)?;

    let mut events = core.session.subscribe();
    let result = core.api.send(&request).await;
    report_session_events(&mut events);
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            warn!(method = %request.method, path = %request.path, error = %e, "API request failed");
            return Err(e.into());
        }
    };
    info!(
        method = %request.method,
        path = %request.path,
        status = %response.status,
        "API request completed"
    );

    let body = serde_json::from_str::<Value>(&response.body)
        .unwrap_or_else(|_| Value::String(response.body.clone()));

    if format.is_json() {
        return print_json(&json!({
            "status": response.status.as_u16(),
            "body": body,
        }));
    }

    println!("{}", response.status);
    match body {
        Value::String(text) => println!("{text}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

fn build_request(args: RequestArgs) -> Result<ApiRequest> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .map_err(|_| anyhow!("Invalid HTTP method: {}", args.method))?;

    let mut request = ApiRequest::new(method, args.path);
    for pair in &args.query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Query parameter must be key=value, got '{pair}'"))?;
        request = request.with_query(key, value);
    }

    if let Some(data) = args.data {
        let body: Value = serde_json::from_str(&data).context("Request body is not valid JSON")?;
        request = request.with_body(body);
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(method: &str, query: &[&str], data: Option<&str>) -> RequestArgs {
        RequestArgs {
            method: method.to_string(),
            path: "/projects".to_string(),
            data: data.map(str::to_string),
            query: query.iter().map(|q| q.to_string()).collect(),
        }
    }

    #[test]
    fn test_build_request() {
        let request = build_request(args("post", &["page=2"], Some(r#"{"name":"Thesis"}"#))).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(request.body, Some(json!({ "name": "Thesis" })));
    }

    #[test]
    fn test_build_request_rejects_bad_input() {
        assert!(build_request(args("get", &["page"], None)).is_err());
        assert!(build_request(args("get", &[], Some("{not json"))).is_err());
        assert!(build_request(args("GE T", &[], None)).is_err());
    }
}
