use crate::ClientError;

pub const NOVEL_ID_PARAM: &str = "novelId";

/// Reads the `novelId` query value. Only a positive integer is accepted.
pub fn parse_novel_id(raw: Option<&str>) -> Result<i64, ClientError> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or(ClientError::InvalidNovelId)
}

pub fn proposal_create_path(chapter_id: i64) -> String {
    format!("/proposals/create/{chapter_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn novel_id_must_be_present_and_numeric() {
        assert_eq!(parse_novel_id(Some("42")), Ok(42));
        assert_eq!(parse_novel_id(Some(" 7 ")), Ok(7));
        assert_eq!(parse_novel_id(None), Err(ClientError::InvalidNovelId));
        assert_eq!(parse_novel_id(Some("")), Err(ClientError::InvalidNovelId));
        assert_eq!(parse_novel_id(Some("abc")), Err(ClientError::InvalidNovelId));
        assert_eq!(parse_novel_id(Some("0")), Err(ClientError::InvalidNovelId));
    }

    #[test]
    fn continue_writing_path() {
        assert_eq!(proposal_create_path(15), "/proposals/create/15");
    }
}
