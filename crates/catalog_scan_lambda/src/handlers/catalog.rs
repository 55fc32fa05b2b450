use std::time::Instant;

use serde_json::{json, Value};

use crate::adapters::table_scan::TableScanner;
use crate::runtime::encoding::encode_items;
use crate::runtime::envelope::ApiGatewayResponse;

/// Scans the whole table and returns its items as the response body.
///
/// The invocation payload is not inspected. Every failure, whether from the
/// table read, item conversion or encoding, collapses into a 500 envelope
/// carrying the failure message.
pub fn handle_catalog_event(_event: Value, scanner: &dyn TableScanner) -> ApiGatewayResponse {
    let started_at = Instant::now();
    let outcome = scan_and_encode(scanner);
    let response = match &outcome {
        Ok((_, body)) => ApiGatewayResponse::success(body.clone()),
        Err(message) => ApiGatewayResponse::failure(message),
    };

    log_catalog_info(
        "scan_finished",
        scan_details(
            scanner.table_name(),
            &response,
            outcome.as_ref().ok().map(|(item_count, _)| *item_count),
            started_at.elapsed().as_millis(),
        ),
    );
    response
}

fn scan_and_encode(scanner: &dyn TableScanner) -> Result<(usize, String), String> {
    let items = scanner.scan_items()?;
    let body = encode_items(&items).map_err(|error| error.to_string())?;
    Ok((items.len(), body))
}

/// Failure causes stay out of the log; they only reach the caller's body.
fn scan_details(
    table: &str,
    response: &ApiGatewayResponse,
    item_count: Option<usize>,
    duration_ms: u128,
) -> Value {
    let mut details = json!({
        "table": table,
        "status_code": response.status_code,
        "duration_ms": duration_ms,
    });
    if let Some(count) = item_count {
        details["item_count"] = json!(count);
    }
    details
}

fn log_catalog_info(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "catalog_handler",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
