//! Transient user-facing notifications (toasts).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, text: text.into() }
    }
}
