use url::Url;

use crate::format_duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneFile {
    pub id: String,
    pub basename: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub id: String,
    pub title: Option<String>,
    pub files: Vec<SceneFile>,
}

impl SceneSummary {
    /// Scene title, falling back to the first file's basename.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self
                .files
                .first()
                .map(|file| file.basename.clone())
                .unwrap_or_default(),
        }
    }
}

// Durations come from JSON numbers, which cannot be NaN.
impl Eq for SceneSummary {}
impl Eq for SceneFile {}

/// Selector label: `1920×1080, mp4, h264/aac, 2:05`.
pub fn file_label(file: &SceneFile) -> String {
    format!(
        "{}×{}, {}, {}/{}, {}",
        file.width,
        file.height,
        file.format,
        file.video_codec,
        file.audio_codec,
        format_duration(file.duration)
    )
}

/// Catalog page for a scene, or the catalog root when no id is entered.
pub fn catalog_scene_url(catalog: &Url, scene_id: &str) -> Url {
    let scene_id = scene_id.trim();
    if scene_id.is_empty() {
        return catalog.clone();
    }
    let mut url = catalog.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("scenes").push(scene_id);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(basename: &str) -> SceneFile {
        SceneFile {
            id: "11".into(),
            basename: basename.into(),
            format: "mp4".into(),
            width: 1920,
            height: 1080,
            video_codec: "h264".into(),
            audio_codec: "aac".into(),
            duration: 125.4,
        }
    }

    #[test]
    fn label_formats_technical_attributes() {
        assert_eq!(file_label(&file("a.mp4")), "1920×1080, mp4, h264/aac, 2:05");
    }

    #[test]
    fn empty_title_falls_back_to_basename() {
        let scene = SceneSummary {
            id: "3".into(),
            title: Some("  ".into()),
            files: vec![file("clip.mp4")],
        };
        assert_eq!(scene.display_title(), "clip.mp4");
    }

    #[test]
    fn scene_url_appends_path() {
        let base = Url::parse("http://localhost:9999").unwrap();
        assert_eq!(
            catalog_scene_url(&base, "42").as_str(),
            "http://localhost:9999/scenes/42"
        );
        assert_eq!(catalog_scene_url(&base, " ").as_str(), "http://localhost:9999/");
    }
}
