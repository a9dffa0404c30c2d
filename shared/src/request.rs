use serde::Serialize;
use serde_json::Value;

use crate::{ClientError, FinalizeRequest, LoginRequest, VoteRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// Every backend call the client makes.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListProposals { novel_id: i64 },
    NovelDetail { novel_id: i64 },
    CastVote { proposal_id: i64 },
    CancelVote { proposal_id: i64 },
    Finalize { novel_id: i64 },
    Login { login_id: String, password: String },
}

impl ApiCall {
    pub fn method(&self) -> Method {
        match self {
            ApiCall::ListProposals { .. } | ApiCall::NovelDetail { .. } => Method::Get,
            ApiCall::CancelVote { .. } => Method::Delete,
            ApiCall::CastVote { .. } | ApiCall::Finalize { .. } | ApiCall::Login { .. } => {
                Method::Post
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            ApiCall::ListProposals { novel_id } => format!("/api/vote/novels/{novel_id}/proposals"),
            ApiCall::NovelDetail { novel_id } => format!("/api/novels/{novel_id}"),
            ApiCall::CastVote { .. } | ApiCall::CancelVote { .. } => "/api/vote/do".to_string(),
            ApiCall::Finalize { .. } => "/api/vote/finalize".to_string(),
            ApiCall::Login { .. } => "/api/auth/login".to_string(),
        }
    }

    /// Calls that must not leave the browser without a bearer token.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            ApiCall::CastVote { .. } | ApiCall::CancelVote { .. } | ApiCall::Finalize { .. }
        )
    }

    fn body(&self) -> Result<Option<Value>, ClientError> {
        match self {
            ApiCall::ListProposals { .. } | ApiCall::NovelDetail { .. } => Ok(None),
            ApiCall::CastVote { proposal_id } | ApiCall::CancelVote { proposal_id } => {
                to_json(&VoteRequest {
                    proposal_id: *proposal_id,
                })
            }
            ApiCall::Finalize { novel_id } => to_json(&FinalizeRequest {
                novel_id: *novel_id,
            }),
            ApiCall::Login { login_id, password } => to_json(&LoginRequest {
                login_id: login_id.clone(),
                password: password.clone(),
            }),
        }
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<Option<Value>, ClientError> {
    serde_json::to_value(payload)
        .map(Some)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// A request ready to hand to the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl PlannedRequest {
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path)
    }

    pub fn authorization(&self) -> Option<String> {
        self.bearer.as_ref().map(|t| format!("Bearer {t}"))
    }
}

/// Turns a call into a request. Authenticated calls without a token are
/// rejected here, before anything is sent.
pub fn plan(call: &ApiCall, token: Option<&str>) -> Result<PlannedRequest, ClientError> {
    let bearer = token.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
    if call.requires_auth() && bearer.is_none() {
        return Err(ClientError::MissingToken);
    }
    Ok(PlannedRequest {
        method: call.method(),
        path: call.path(),
        bearer,
        body: call.body()?,
    })
}
