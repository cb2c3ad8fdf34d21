//! Transient operator notifications

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Oldest notices are dropped beyond this many
pub const MAX_NOTICES: usize = 100;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// An operation succeeded
    Success,
    /// An operation failed
    Error,
    /// Informational
    Info,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

/// One notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the operator
    pub message: String,
    /// When it was raised
    pub timestamp: DateTime<Local>,
}

/// Bounded queue of notices awaiting display
#[derive(Debug, Clone, Default)]
pub struct Notices {
    entries: VecDeque<Notice>,
}

impl Notices {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.entries.push_back(Notice {
            level,
            message: message.into(),
            timestamp: Local::now(),
        });
        while self.entries.len() > MAX_NOTICES {
            self.entries.pop_front();
        }
    }

    /// Queue a success notice
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    /// Queue an error notice
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Queue an informational notice
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message);
    }

    /// Most recent notice
    pub fn latest(&self) -> Option<&Notice> {
        self.entries.back()
    }

    /// Notices oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.entries.iter()
    }

    /// Take every queued notice, oldest first
    pub fn drain(&mut self) -> Vec<Notice> {
        self.entries.drain(..).collect()
    }

    /// Number of queued notices
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
