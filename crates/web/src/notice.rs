use axum::http::StatusCode;
use driver_log_core::application::sheet_client::SheetClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Banner shown above the entry form after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl Notice {
    pub const SAVED: Notice = Notice {
        kind: NoticeKind::Success,
        title: "Data Saved",
        description: "Your data has been successfully saved to the Google Sheet.",
    };

    pub const WRITE_FAILED: Notice = Notice {
        kind: NoticeKind::Error,
        title: "Error",
        description: "There was an error saving your data. Please try again.",
    };

    pub const UNAVAILABLE: Notice = Notice {
        kind: NoticeKind::Error,
        title: "Service unavailable",
        description: "Saving is temporarily unavailable. Please contact your dispatcher.",
    };

    /// Notice and status code for a failed submission.
    pub fn for_failure(error: &SheetClientError) -> (StatusCode, Notice) {
        match error {
            SheetClientError::Auth => (StatusCode::SERVICE_UNAVAILABLE, Notice::UNAVAILABLE),
            SheetClientError::Write => (StatusCode::BAD_GATEWAY, Notice::WRITE_FAILED),
        }
    }
}
