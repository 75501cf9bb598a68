//! Dialogs the controller asks the front-end to present.

use url::Url;

/// Clipboard media type that may pre-fill the video URL dialog.
pub const TEXT_PLAIN: &str = "text/plain";

/// Primary clipboard item, as read by the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub text: Option<String>,
}

impl ClipboardItem {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self { mime_type: TEXT_PLAIN.to_string(), text: Some(text.into()) }
    }

    /// The item's text, if it is plain text.
    pub fn as_plain_text(&self) -> Option<&str> {
        if self.mime_type == TEXT_PLAIN { self.text.as_deref() } else { None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// "Update available, version X" with Update / Later.
    UpdateAvailable { version: String, download_url: Url },
    /// `percent` is `None` while progress is indeterminate.
    DownloadProgress { percent: Option<u8> },
    EnterVideoUrl { prefill: String },
}

impl Dialog {
    /// The download dialog must run to completion.
    pub fn is_cancelable(&self) -> bool {
        !matches!(self, Dialog::DownloadProgress { .. })
    }
}
