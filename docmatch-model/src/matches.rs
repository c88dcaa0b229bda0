use serde::{Deserialize, Serialize};

/// One entry in the ranked similarity list for a scanned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub filename: String,
    pub similarity_score: f64,
}

/// The `/matches/{document_id}` response body.
///
/// Entry order is the server's ranking and must never be re-sorted on the
/// client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchList {
    pub matches: Vec<MatchEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_wire_order() {
        let list: MatchList = serde_json::from_str(
            r#"{"matches":[
                {"filename":"a.pdf","similarity_score":92},
                {"filename":"b.pdf","similarity_score":81}
            ]}"#,
        )
        .unwrap();
        let names: Vec<_> =
            list.matches.iter().map(|m| m.filename.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf"]);
    }
}
