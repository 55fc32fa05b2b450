use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::encoding::to_json_string;

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// API Gateway proxy response returned by every invocation.
///
/// `headers` is only present on success; failure envelopes omit the key
/// entirely rather than sending an empty map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    pub body: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiGatewayResponse {
    pub fn success(body: String) -> Self {
        Self {
            status_code: 200,
            headers: Some(BTreeMap::from([(
                CONTENT_TYPE_HEADER.to_string(),
                JSON_CONTENT_TYPE.to_string(),
            )])),
            body,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            status_code: 500,
            headers: None,
            body: to_json_string(&ErrorBody { error: message })
                .expect("error payload should serialize"),
        }
    }
}
