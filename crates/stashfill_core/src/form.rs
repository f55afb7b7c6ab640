use std::fmt;

/// Editable fields exposed by the page the fill result is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Title,
    Description,
    Tags,
    Cover,
    /// Attach point for the generated torrent file.
    TorrentFile,
    Anonymous,
    /// Read-only: the tracker announce URL shown on the upload page.
    AnnounceUrl,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::Tags => "tags",
            FormField::Cover => "cover",
            FormField::TorrentFile => "torrent_file",
            FormField::Anonymous => "anonymous",
            FormField::AnnounceUrl => "announce_url",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability interface onto the hosting page. One adapter per host.
pub trait FormHost {
    fn get_field(&self, field: FormField) -> Option<String>;
    fn set_field(&mut self, field: FormField, value: &str);
}

/// Completed output of a fill job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FillResult {
    pub title: String,
    pub description: String,
    /// Space-joined tag list, ready for the tag input.
    pub tags: String,
    pub cover: String,
    pub torrent_path: String,
    pub file_path: String,
    pub anon: bool,
}

impl FillResult {
    /// Field writes applied to the host once the result arrives.
    pub fn field_updates(&self) -> Vec<(FormField, String)> {
        vec![
            (FormField::Description, self.description.clone()),
            (FormField::Tags, self.tags.clone()),
            (FormField::Cover, self.cover.clone()),
            (FormField::Title, self.title.clone()),
            (FormField::Anonymous, self.anon.to_string()),
        ]
    }

    pub fn instructions(&self) -> Vec<String> {
        vec![
            "Set a category for the upload and double-check everything for correctness".to_string(),
            format!(
                "Make sure the generated torrent is in your torrent client, and attach it to the upload form: {}",
                self.torrent_path
            ),
            format!(
                "Make sure the media file is in the torrents path of your torrent client: {}",
                self.file_path
            ),
        ]
    }
}
