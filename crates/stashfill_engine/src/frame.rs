use base64::Engine as _;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One decoded unit of the fill response stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Frame {
    Success {
        #[serde(default)]
        data: Option<FrameData>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

impl Frame {
    pub fn is_error(&self) -> bool {
        matches!(self, Frame::Error { .. })
    }

    /// Payload of a `success` frame; `None` for errors or an empty body.
    pub fn data(&self) -> Option<&FrameData> {
        match self {
            Frame::Success { data } => data.as_ref(),
            Frame::Error { .. } => None,
        }
    }

    /// True for the frame that carries the completed fill output.
    pub fn is_terminal(&self) -> bool {
        self.is_error() || self.data().is_some_and(|data| data.fill.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FrameData {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub fill: Option<FillPayload>,
    #[serde(default)]
    pub suggestions: Option<Map<String, Value>>,
    #[serde(default)]
    pub file: Option<AttachedFile>,
}

impl FrameData {
    /// Suggestion map in backend order; non-string targets are skipped.
    pub fn suggestion_pairs(&self) -> Vec<(String, String)> {
        self.suggestions
            .iter()
            .flatten()
            .filter_map(|(source, target)| {
                target
                    .as_str()
                    .map(|target| (source.clone(), target.to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FillPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, alias = "torrentPath")]
    pub torrent_path: Option<String>,
    #[serde(default, alias = "filePath")]
    pub file_path: Option<String>,
    #[serde(default)]
    pub anon: bool,
}

/// Torrent file shipped inline, base64 encoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttachedFile {
    pub name: String,
    pub content: String,
}

impl AttachedFile {
    pub fn decode_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.content.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_frame_parses() {
        let frame: Frame =
            serde_json::from_str(r#"{"status": "success", "data": {"message": "Making torrent"}}"#)
                .unwrap();
        assert_eq!(
            frame.data().and_then(|d| d.message.as_deref()),
            Some("Making torrent")
        );
        assert!(!frame.is_terminal());
    }

    #[test]
    fn error_frame_parses() {
        let frame: Frame =
            serde_json::from_str(r#"{"status": "error", "message": "Scene not found"}"#).unwrap();
        assert_eq!(
            frame,
            Frame::Error {
                message: "Scene not found".into()
            }
        );
        assert!(frame.is_terminal());
    }

    #[test]
    fn suggestions_keep_backend_order() {
        let frame: Frame = serde_json::from_str(
            r#"{"status":"success","data":{"fill":{"title":"t"},"suggestions":{"zeta":"Zeta","alpha":"Alpha","bad":1}}}"#,
        )
        .unwrap();
        let data = frame.data().unwrap();
        assert_eq!(
            data.suggestion_pairs(),
            vec![
                ("zeta".to_string(), "Zeta".to_string()),
                ("alpha".to_string(), "Alpha".to_string())
            ]
        );
    }

    #[test]
    fn fill_accepts_camel_case_paths() {
        let fill: FillPayload =
            serde_json::from_str(r#"{"torrentPath":"/t.torrent","filePath":"/f.mp4","cover":null}"#)
                .unwrap();
        assert_eq!(fill.torrent_path.as_deref(), Some("/t.torrent"));
        assert_eq!(fill.file_path.as_deref(), Some("/f.mp4"));
        assert_eq!(fill.cover, None);
    }

    #[test]
    fn attachment_decodes_base64() {
        let file = AttachedFile {
            name: "a.torrent".into(),
            content: "ZDg6YW5ub3VuY2U=".into(),
        };
        assert_eq!(file.decode_content().unwrap(), b"d8:announce");
    }
}
