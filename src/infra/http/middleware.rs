use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

use super::CurrentUser;

/// Identifier attached to both the request and its response.
#[derive(Clone)]
pub struct RequestId(pub String);

pub async fn set_request_id(mut request: Request<Body>, next: Next) -> Response {
    let id = RequestId(Uuid::new_v4().to_string());
    request.extensions_mut().insert(id.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(id);
    response
}

macro_rules! failed_response {
    ($level:ident, $failure:expr, $msg:literal) => {{
        let failure = $failure;
        $level!(
            target = "lectern::http::response",
            status = failure.status,
            method = %failure.method,
            path = %failure.path,
            query = %failure.query,
            elapsed_ms = failure.elapsed_ms,
            source = failure.source,
            detail = %failure.detail(),
            chain = ?failure.chain,
            request_id = %failure.request_id,
            user_id = %failure.user_id,
            $msg,
        );
    }};
}

/// What gets logged for a 4xx or 5xx response.
struct FailedResponse {
    status: u16,
    method: String,
    path: String,
    query: String,
    elapsed_ms: u128,
    source: &'static str,
    chain: Vec<String>,
    request_id: String,
    user_id: String,
}

impl FailedResponse {
    fn detail(&self) -> &str {
        self.chain
            .first()
            .map(String::as_str)
            .unwrap_or("no diagnostic available")
    }
}

/// Logs every failed response with the diagnostic chain left behind by `HttpError`.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().unwrap_or_default().to_owned();
    let extensions = request.extensions();
    let user_id = extensions
        .get::<CurrentUser>()
        .map(|CurrentUser(user)| user.id.to_string())
        .unwrap_or_default();
    let request_id = extensions
        .get::<RequestId>()
        .map(|RequestId(id)| id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();
    if status.is_success() || status.is_redirection() || status.is_informational() {
        return response;
    }

    let (source, chain) = response
        .extensions_mut()
        .remove::<ErrorReport>()
        .map(|report| (report.source, report.messages))
        .unwrap_or(("unknown", Vec::new()));

    let failure = FailedResponse {
        status: status.as_u16(),
        method,
        path,
        query,
        elapsed_ms: started.elapsed().as_millis(),
        source,
        chain,
        request_id,
        user_id,
    };

    if status.is_server_error() {
        failed_response!(error, failure, "request failed");
    } else {
        failed_response!(warn, failure, "client request error");
    }

    response
}
