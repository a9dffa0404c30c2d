use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use vibefiction_shared::request::{self, ApiCall, Method};
use vibefiction_shared::{decode_payload, ClientError, ResponseBody};
use web_sys::window;

use crate::config::{self, TOKEN_KEY};

fn storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

pub fn get_token() -> Option<String> {
    storage()?.get_item(TOKEN_KEY).ok()?
}

pub fn set_token(token: &str) {
    if token.is_empty() {
        return;
    }
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

pub fn clear_token() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

/// Sends a call and returns the classified body of a 2xx response.
///
/// Calls that need a token fail with `MissingToken` before any request is
/// made. Non-2xx answers become `ClientError::Http` carrying the server's
/// own error text.
pub async fn send(call: &ApiCall) -> Result<ResponseBody, ClientError> {
    let token = get_token();
    let planned = request::plan(call, token.as_deref())?;
    let url = planned.url(&config::api_base());

    let mut builder: RequestBuilder = match planned.method {
        Method::Get => Request::get(&url),
        Method::Post => Request::post(&url),
        Method::Delete => Request::delete(&url),
    };
    if let Some(auth) = planned.authorization() {
        builder = builder.header("Authorization", &auth);
    }
    let req = match &planned.body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(|e| ClientError::Network(e.to_string()))?;

    log::debug!("{:?} {}", planned.method, planned.path);
    let resp = req.send().await.map_err(|e| {
        log::warn!("{} failed: {e}", planned.path);
        ClientError::Network(e.to_string())
    })?;

    let status = resp.status();
    let ok = resp.ok();
    let content_type = resp.headers().get("content-type");
    let text = resp
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    let body = ResponseBody::classify(status, content_type.as_deref(), &text);

    if !ok {
        let err = body.into_error(status);
        log::warn!("{} -> {status}: {err}", planned.path);
        return Err(err);
    }
    Ok(body)
}

/// Sends a call and decodes its JSON payload, wrapped or bare.
pub async fn fetch<T: DeserializeOwned>(call: &ApiCall) -> Result<T, ClientError> {
    match send(call).await? {
        ResponseBody::Json(value) => decode_payload(value),
        ResponseBody::Text(text) => Err(ClientError::Decode(text)),
        ResponseBody::Empty => Err(ClientError::Decode("empty response".to_string())),
    }
}
