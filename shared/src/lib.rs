use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod body;
pub mod countdown;
pub mod error;
pub mod request;
pub mod routes;
pub mod session;
pub mod timer;

pub use body::ResponseBody;
pub use error::ClientError;

// ── Envelope ──

/// Standard wrapper the backend puts around most JSON payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Payload of a successful response. `success: false` is a failure even
    /// when `data` is present.
    pub fn into_data(self) -> Result<T, ClientError> {
        let message = self.message.filter(|m| !m.trim().is_empty());
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (false, _) => Err(ClientError::Decode(
                message.unwrap_or_else(|| "request was not successful".to_string()),
            )),
            (true, None) => Err(ClientError::Decode(
                message.unwrap_or_else(|| "response carried no data".to_string()),
            )),
        }
    }
}

/// Decodes a payload that some endpoints wrap in an `ApiResponse` and others
/// send bare. An object carrying `success` is always read as the wrapper.
pub fn decode_payload<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    if value.get("success").is_some() {
        return serde_json::from_value::<ApiResponse<T>>(value)
            .map_err(|e| ClientError::Decode(e.to_string()))?
            .into_data();
    }
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

// ── Auth ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Votes ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub proposal_id: i64,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub novel_name: Option<String>,
    #[serde(default)]
    pub proposal_title: String,
    #[serde(default)]
    pub proposal_author: String,
    #[serde(default)]
    pub proposal_content: String,
    #[serde(default)]
    pub vote_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineInfo {
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub closing_time: Option<String>,
}

/// Payload of `GET /api/vote/novels/{novelId}/proposals`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBoard {
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub deadline_info: Option<DeadlineInfo>,
    #[serde(default)]
    pub latest_chapter_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub proposal_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub novel_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl FinalizeOutcome {
    pub const DEFAULT_MESSAGE: &'static str = "Voting has been finalized.";

    /// The finalize endpoint answers with JSON inside a text body, or plain text.
    pub fn from_body(body: &ResponseBody) -> Self {
        let parsed = match body {
            ResponseBody::Json(v) => serde_json::from_value::<FinalizeOutcome>(v.clone()).ok(),
            _ => None,
        };
        let mut outcome = parsed.unwrap_or(FinalizeOutcome {
            message: String::new(),
            redirect_url: None,
        });
        if outcome.message.trim().is_empty() {
            outcome.message = body
                .message()
                .unwrap_or_else(|| Self::DEFAULT_MESSAGE.to_string());
        }
        outcome
    }
}

// ── Novels ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapter_id: i64,
    #[serde(default)]
    pub chapter_number: i64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelDetail {
    #[serde(default)]
    pub novel_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    pub chapters: Vec<ChapterSummary>,
}

impl NovelDetail {
    /// Id of the chapter with the highest chapter number.
    pub fn latest_chapter_id(&self) -> Option<i64> {
        self.chapters
            .iter()
            .max_by_key(|c| c.chapter_number)
            .map(|c| c.chapter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(raw: &str) -> Value {
        serde_json::from_str(raw).expect("json")
    }

    #[test]
    fn wrapped_board_decodes() {
        let raw = r#"{
            "success": true,
            "message": "ok",
            "timestamp": "2025-08-20T10:00:00",
            "data": {
                "proposals": [
                    {"proposalId": 7, "chapterId": 3, "proposalTitle": "Gate", "proposalAuthor": "kim",
                     "proposalContent": "...", "voteCount": 4}
                ],
                "deadlineInfo": {"chapterId": 3, "closingTime": "2025-08-21T10:00:00"},
                "latestChapterId": 3
            }
        }"#;
        let board: VoteBoard = decode_payload(json(raw)).expect("board");
        assert_eq!(board.proposals.len(), 1);
        assert_eq!(board.proposals[0].vote_count, 4);
        assert_eq!(board.latest_chapter_id, Some(3));
        assert_eq!(
            board.deadline_info.and_then(|d| d.closing_time).as_deref(),
            Some("2025-08-21T10:00:00")
        );
    }

    #[test]
    fn bare_novel_detail_decodes() {
        let raw = r#"{"novelId": 1, "title": "Aether", "chapters": [
            {"chapterId": 10, "chapterNumber": 1, "title": "a"},
            {"chapterId": 14, "chapterNumber": 3, "title": "c"},
            {"chapterId": 12, "chapterNumber": 2, "title": "b"}
        ]}"#;
        let novel: NovelDetail = decode_payload(json(raw)).expect("novel");
        assert_eq!(novel.latest_chapter_id(), Some(14));
    }

    #[test]
    fn wrapped_without_data_is_a_decode_error() {
        let raw = r#"{"success": false, "message": "gone"}"#;
        let err = decode_payload::<VoteBoard>(json(raw)).unwrap_err();
        assert_eq!(err, ClientError::Decode("gone".to_string()));
    }

    #[test]
    fn failed_envelope_with_data_is_not_success() {
        let raw = r#"{"success": false, "message": "closed",
            "data": {"proposals": [], "latestChapterId": 3}}"#;
        let err = decode_payload::<VoteBoard>(json(raw)).unwrap_err();
        assert_eq!(err, ClientError::Decode("closed".to_string()));
    }

    #[test]
    fn bad_field_inside_wrapped_board_is_a_decode_error() {
        let raw = r#"{"success": true, "data": {"proposals": [
            {"proposalId": 7, "proposalTitle": "Gate", "proposalContent": null, "voteCount": 1}
        ]}}"#;
        let err = decode_payload::<VoteBoard>(json(raw)).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.load_message().contains("Please try again"));
    }

    #[test]
    fn error_shaped_body_is_not_an_empty_board() {
        let raw = r#"{"status": 500, "error": "Internal Server Error"}"#;
        assert!(matches!(
            decode_payload::<VoteBoard>(json(raw)),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            decode_payload::<NovelDetail>(json(raw)),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn finalize_outcome_from_text_json() {
        let body = ResponseBody::classify(
            200,
            Some("text/plain;charset=UTF-8"),
            r#"{"message": "A new chapter was added.", "redirectUrl": "/chapters?novelId=4"}"#,
        );
        let outcome = FinalizeOutcome::from_body(&body);
        assert_eq!(outcome.message, "A new chapter was added.");
        assert_eq!(outcome.redirect_url.as_deref(), Some("/chapters?novelId=4"));
    }

    #[test]
    fn finalize_outcome_defaults_when_empty() {
        let outcome = FinalizeOutcome::from_body(&ResponseBody::Empty);
        assert_eq!(outcome.message, FinalizeOutcome::DEFAULT_MESSAGE);
        assert!(outcome.redirect_url.is_none());
    }

    #[test]
    fn login_accepts_either_token_field() {
        let a: LoginResponse = serde_json::from_str(r#"{"accessToken": "t1"}"#).expect("a");
        let b: LoginResponse = serde_json::from_str(r#"{"token": "t2"}"#).expect("b");
        assert_eq!(a.access_token, "t1");
        assert_eq!(b.access_token, "t2");
    }
}
