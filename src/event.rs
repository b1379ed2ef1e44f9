//! Events the presentation surface (and capabilities) feed into the core.

use serde::{Deserialize, Serialize};

use crate::capabilities::{StorageKey, StorageResult};
use crate::model::Page;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    AppStarted { os_prefers_dark: bool },

    // Navigation & theme
    PageSelected(Page),
    ThemeToggled,

    // Trip lifecycle
    TripStarted { route_key: String },
    TripEnded,

    // Feedback sheet
    FeedbackRatingSet { rating: u8 },
    FeedbackNoteEdited { note: String },
    FeedbackSubmitted { rating: u8, note: Option<String> },
    FeedbackDismissed,

    // Safety
    SosTriggered,
    SosDismissed,

    // Checkout
    SponsorshipToggled,
    PaymentConfirmed,

    // Toast
    ToastDismissed,

    // Capability completions
    StorageLoaded {
        key: StorageKey,
        result: StorageResult,
    },
    StorageWritten {
        key: StorageKey,
        result: StorageResult,
    },
}

impl Event {
    /// Stable name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Event::AppStarted { .. } => "app_started",
            Event::PageSelected(_) => "page_selected",
            Event::ThemeToggled => "theme_toggled",
            Event::TripStarted { .. } => "trip_started",
            Event::TripEnded => "trip_ended",
            Event::FeedbackRatingSet { .. } => "feedback_rating_set",
            Event::FeedbackNoteEdited { .. } => "feedback_note_edited",
            Event::FeedbackSubmitted { .. } => "feedback_submitted",
            Event::FeedbackDismissed => "feedback_dismissed",
            Event::SosTriggered => "sos_triggered",
            Event::SosDismissed => "sos_dismissed",
            Event::SponsorshipToggled => "sponsorship_toggled",
            Event::PaymentConfirmed => "payment_confirmed",
            Event::ToastDismissed => "toast_dismissed",
            Event::StorageLoaded { .. } => "storage_loaded",
            Event::StorageWritten { .. } => "storage_written",
        }
    }

    pub fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Event::AppStarted { .. }
                | Event::StorageLoaded { .. }
                | Event::StorageWritten { .. }
                | Event::ToastDismissed
        )
    }
}
