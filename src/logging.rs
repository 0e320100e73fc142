use axum::{body::Body, extract::Request, http::Method, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Request bodies larger than this are not echoed into the log.
const MAX_LOGGED_PAYLOAD: usize = 4 * 1024;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("album_api=info,tower_http=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Logs one line per request, levelled by response status. POST bodies are
/// small JSON documents here and are logged in compact form.
pub async fn request_logger(mut request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let payload = capture_payload(&mut request).await;

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status().as_u16();
    let payload = payload.as_deref().unwrap_or("{}");

    match status {
        500..=599 => error!("{} {} {} {:.2}ms {}", method, path, status, duration_ms, payload),
        400..=499 => warn!("{} {} {} {:.2}ms {}", method, path, status, duration_ms, payload),
        _ => info!("{} {} {} {:.2}ms {}", method, path, status, duration_ms, payload),
    }

    response
}

async fn capture_payload(request: &mut Request<Body>) -> Option<String> {
    if request.method() != Method::POST {
        return None;
    }

    let body = std::mem::replace(request.body_mut(), Body::empty());
    let bytes = axum::body::to_bytes(body, usize::MAX).await.ok()?;
    *request.body_mut() = Body::from(bytes.clone());

    if bytes.len() > MAX_LOGGED_PAYLOAD {
        return Some(format!("<{} bytes>", bytes.len()));
    }

    let text = std::str::from_utf8(&bytes).ok()?;
    let compact = serde_json::from_str::<serde_json::Value>(text)
        .map(|value| value.to_string())
        .unwrap_or_else(|_| text.trim().to_string());

    Some(compact)
}

pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Unknown panic payload".to_string());

        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        error!("PANIC at {}: {}", location, payload);
        default_hook(info);
    }));
}
