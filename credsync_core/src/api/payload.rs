//! JSON bodies exchanged with the REST API.
//!
//! The server wraps every listing as `{"<plural>": {"<singular>": [...]}}` and
//! drops the inner key altogether when the list is empty. `collection` is the
//! only place that knows about it.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::errors::MigrationError;

/// Pulls `body[wrapper][item]` out as a list.
///
/// A missing or `null` `item` key means zero items. A missing `wrapper` key,
/// or items that do not deserialize into `T`, is a malformed response.
pub fn collection<T: DeserializeOwned>(
    body: &Value,
    wrapper: &str,
    item: &str,
) -> Result<Vec<T>, MigrationError> {
    let outer = body
        .get(wrapper)
        .filter(|v| v.is_object())
        .ok_or_else(|| MigrationError::Api(format!("Response has no '{}' object: {}", wrapper, body)))?;

    match outer.get(item) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items.clone()).map_err(|e| {
            MigrationError::Api(format!("Malformed '{}.{}' list: {}", wrapper, item, e))
        }),
    }
}

/// `{credentials:{name, password, site:{contentUrl}}}`; the default site is `""`.
pub fn sign_in_body(username: &str, password: &str, site_content_url: Option<&str>) -> Value {
    json!({
        "credentials": {
            "name": username,
            "password": password,
            "site": { "contentUrl": site_content_url.unwrap_or("") }
        }
    })
}

/// `credentials.token` of a sign-in response, if any.
pub fn token(body: &Value) -> Option<String> {
    body.get("credentials")?
        .get("token")?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub fn connection_update_body(username: &str, password: &str) -> Value {
    json!({
        "connection": {
            "userName": username,
            "password": password,
            "embedPassword": true
        }
    })
}

/// An update succeeded iff the server echoed a `connection` object back.
pub fn has_connection(body: &Value) -> bool {
    body.get("connection").is_some_and(Value::is_object)
}
