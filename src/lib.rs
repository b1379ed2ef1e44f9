// lib.rs - Smart Commute application core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod event;
pub mod model;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{AppConfig, Model};
pub use view::ViewModel;

// --- Tuning knobs ---

/// Bounded history of the MAC counter; oldest entries are evicted.
pub const MAC_HISTORY_LIMIT: usize = 20;
/// Seed counter shown before any persisted state is restored.
pub const DEFAULT_MAC_COUNT: u64 = 124;
pub const DEFAULT_MAC_HISTORY: &[u64] = &[96, 102, 108, 114, 119, 121, 124];

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const DEFAULT_RATING: u8 = 5;
/// Feedback notes are truncated to this many characters.
pub const MAX_FEEDBACK_NOTE_LEN: usize = 280;

/// How long the shell should keep a toast on screen.
pub const TOAST_DURATION_MS: u64 = 2_600;

pub const BASE_FARE_INR: u32 = 79;
/// Flat employer-sponsorship discount; cosmetic arithmetic only.
pub const SPONSORSHIP_DISCOUNT_INR: u32 = 30;
pub const LAST_USED_PAYMENT_HINT: &str = "Last used: UPI • ankur@okicici";

/// Wall-clock milliseconds since the Unix epoch; 0 if the clock is broken.
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
