use chrono::{DateTime, Utc};
use serde::Serialize;

/// How long a toast stays on screen
pub const TOAST_LIFE_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Info,
    Success,
    Error,
}

impl ToastSeverity {
    pub fn summary(&self) -> &'static str {
        match self {
            ToastSeverity::Info => "Info",
            ToastSeverity::Success => "Success",
            ToastSeverity::Error => "Error",
        }
    }
}

/// Transient notification shown above the view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Toast {
    pub severity: ToastSeverity,
    pub summary: String,
    pub detail: String,
    pub life_ms: u32,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(severity: ToastSeverity, detail: impl Into<String>) -> Self {
        Self {
            severity,
            summary: severity.summary().to_string(),
            detail: detail.into(),
            life_ms: TOAST_LIFE_MS,
            created_at: Utc::now(),
        }
    }

    pub fn info(detail: impl Into<String>) -> Self {
        Self::new(ToastSeverity::Info, detail)
    }

    pub fn success(detail: impl Into<String>) -> Self {
        Self::new(ToastSeverity::Success, detail)
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(ToastSeverity::Error, detail)
    }
}

pub const CALCULATING_MESSAGE: &str = "Calculating optimised portfolio. This may take a while.";
pub const OPTIMISED_MESSAGE: &str = "Your portfolio was successfully optimised.";
