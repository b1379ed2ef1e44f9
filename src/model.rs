//! Application state owned by the core.
//!
//! All state lives in [`Model`] and is mutated only from `App::update`. The
//! trip lifecycle is an explicit state machine; invalid transitions are
//! guarded no-ops that report a [`TripError`] instead of corrupting state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{self, RideHistoryEntry, Route};
use crate::{
    DEFAULT_MAC_COUNT, DEFAULT_MAC_HISTORY, DEFAULT_RATING, MAC_HISTORY_LIMIT,
    MAX_FEEDBACK_NOTE_LEN, MAX_RATING, MIN_RATING, TOAST_DURATION_MS,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TripError {
    #[error("a trip is already live")]
    AlreadyLive,

    #[error("trip feedback is still pending")]
    FeedbackPending,

    #[error("no trip is live")]
    NotLive,

    #[error("no feedback is pending")]
    NoFeedbackPending,

    #[error("unknown route key: {key}")]
    UnknownRoute { key: String },

    #[error("rating {value} is out of range {MIN_RATING}..={MAX_RATING}")]
    InvalidRating { value: u8 },
}

/// The trip lifecycle. Holding the route inside `Live` makes the
/// "route selected iff live" invariant structural: ending a trip swaps the
/// variant and drops the selection in one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum TripPhase {
    #[default]
    Idle,
    Live {
        route: Route,
    },
    AwaitingFeedback,
}

impl TripPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, TripPhase::Idle)
    }

    pub fn is_live(&self) -> bool {
        matches!(self, TripPhase::Live { .. })
    }

    pub fn is_awaiting_feedback(&self) -> bool {
        matches!(self, TripPhase::AwaitingFeedback)
    }

    pub fn selected_route(&self) -> Option<&Route> {
        match self {
            TripPhase::Live { route } => Some(route),
            _ => None,
        }
    }

    /// `Idle -> Live`. Rejected while a trip is live or feedback is pending.
    pub fn start(&mut self, route: Route) -> Result<(), TripError> {
        match self {
            TripPhase::Idle => {
                *self = TripPhase::Live { route };
                Ok(())
            }
            TripPhase::Live { .. } => Err(TripError::AlreadyLive),
            TripPhase::AwaitingFeedback => Err(TripError::FeedbackPending),
        }
    }

    /// `Live -> AwaitingFeedback`. Clears the selected route atomically.
    pub fn end(&mut self) -> Result<(), TripError> {
        match self {
            TripPhase::Live { .. } => {
                *self = TripPhase::AwaitingFeedback;
                Ok(())
            }
            _ => Err(TripError::NotLive),
        }
    }

    /// `AwaitingFeedback -> Idle`, on submit or dismiss.
    pub fn resolve_feedback(&mut self) -> Result<(), TripError> {
        match self {
            TripPhase::AwaitingFeedback => {
                *self = TripPhase::Idle;
                Ok(())
            }
            _ => Err(TripError::NoFeedbackPending),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_os_hint(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// The exact strings the storage key holds.
    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_storage_value(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Safety rating attached to trip feedback, constrained to 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, TripError> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TripError::InvalidRating { value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(DEFAULT_RATING)
    }
}

/// Ephemeral feedback-sheet state. Reset on submit or dismiss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackForm {
    rating: Rating,
    note: String,
}

impl FeedbackForm {
    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn set_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }

    /// Notes are capped; overlong input is truncated, not rejected.
    pub fn set_note(&mut self, note: &str) {
        self.note = note.chars().take(MAX_FEEDBACK_NOTE_LEN).collect();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacTrend {
    Up,
    Down,
}

/// The "Monthly Active Commuters" accumulator: a counter plus a bounded
/// history of its values. Invariant: after any mutation the last history
/// entry equals the current count.
#[derive(Debug, Clone, PartialEq)]
pub struct MacMetrics {
    count: u64,
    history: VecDeque<u64>,
}

impl MacMetrics {
    /// The prototype's seed values, used until persisted state is restored.
    pub fn seeded() -> Self {
        Self {
            count: DEFAULT_MAC_COUNT,
            history: DEFAULT_MAC_HISTORY.iter().copied().collect(),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn history_vec(&self) -> Vec<u64> {
        self.history.iter().copied().collect()
    }

    /// One increment per qualifying event (rated trip or completed payment).
    /// Returns the new count.
    pub fn record(&mut self) -> u64 {
        self.count = self.count.saturating_add(1);
        self.history.push_back(self.count);
        self.trim();
        self.count
    }

    /// Signed difference between the last two history entries; 0 when the
    /// history is too short. Non-negative renders as "up".
    pub fn delta(&self) -> i64 {
        let len = self.history.len();
        if len < 2 {
            return 0;
        }
        let last = i64::try_from(self.history[len - 1]).unwrap_or(i64::MAX);
        let prev = i64::try_from(self.history[len - 2]).unwrap_or(i64::MAX);
        last.saturating_sub(prev)
    }

    pub fn trend(&self) -> MacTrend {
        if self.delta() >= 0 {
            MacTrend::Up
        } else {
            MacTrend::Down
        }
    }

    /// Restore a persisted count. The count is authoritative; the history is
    /// reconciled to keep the tail invariant.
    pub fn restore_count(&mut self, count: u64) {
        self.count = count;
        self.reconcile();
    }

    /// Restore a persisted history, keeping the most recent entries.
    pub fn restore_history(&mut self, history: Vec<u64>) {
        let skip = history.len().saturating_sub(MAC_HISTORY_LIMIT);
        self.history = history.into_iter().skip(skip).collect();
        self.reconcile();
    }

    fn reconcile(&mut self) {
        if self.history.back() != Some(&self.count) {
            self.history.push_back(self.count);
            self.trim();
        }
    }

    fn trim(&mut self) {
        while self.history.len() > MAC_HISTORY_LIMIT {
            self.history.pop_front();
        }
    }
}

impl Default for MacMetrics {
    fn default() -> Self {
        Self::seeded()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Home,
    Routes,
    Eta,
    Checkout,
    Safety,
    Metrics,
    Onboarding,
}

impl Page {
    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Routes => "Routes",
            Page::Eta => "Driver ETA",
            Page::Checkout => "Checkout",
            Page::Safety => "Safety",
            Page::Metrics => "Metrics",
            Page::Onboarding => "Onboarding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavStyle {
    Sidebar,
    Header,
}

/// Variant selection. The two prototype builds become one core parameterized
/// by navigation style, page set, and whether the metrics panel exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub nav_style: NavStyle,
    pub metrics_enabled: bool,
    pub pages: Vec<Page>,
}

impl AppConfig {
    /// The sidebar build: full page set with metrics and onboarding.
    pub fn sidebar() -> Self {
        Self {
            nav_style: NavStyle::Sidebar,
            metrics_enabled: true,
            pages: vec![
                Page::Routes,
                Page::Eta,
                Page::Checkout,
                Page::Safety,
                Page::Metrics,
                Page::Onboarding,
            ],
        }
    }

    /// The header build: reduced page set, no metrics panel.
    pub fn header() -> Self {
        Self {
            nav_style: NavStyle::Header,
            metrics_enabled: false,
            pages: vec![Page::Home, Page::Routes, Page::Safety, Page::Checkout],
        }
    }

    pub fn contains(&self, page: Page) -> bool {
        self.pages.contains(&page)
    }

    pub fn landing_page(&self) -> Page {
        self.pages.first().copied().unwrap_or(Page::Routes)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::sidebar()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
}

/// A transient confirmation. One at a time; the shell times dismissal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastMessage {
    pub text: String,
    pub kind: ToastKind,
    pub shown_at_ms: u64,
}

impl ToastMessage {
    pub fn new(text: impl Into<String>, kind: ToastKind, now_ms: u64) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at_ms: now_ms,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.shown_at_ms) >= TOAST_DURATION_MS
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    pub config: AppConfig,
    pub active_page: Page,
    pub theme: Theme,
    pub os_prefers_dark: bool,
    pub trip: TripPhase,
    pub feedback: FeedbackForm,
    pub sos_open: bool,
    pub sponsorship_applied: bool,
    pub metrics: MacMetrics,
    pub routes: Vec<Route>,
    pub ride_history: Vec<RideHistoryEntry>,
    pub active_toast: Option<ToastMessage>,
}

impl Model {
    pub fn with_config(config: AppConfig) -> Self {
        let active_page = config.landing_page();
        Self {
            config,
            active_page,
            theme: Theme::Light,
            os_prefers_dark: false,
            trip: TripPhase::Idle,
            feedback: FeedbackForm::default(),
            sos_open: false,
            sponsorship_applied: true,
            metrics: MacMetrics::seeded(),
            routes: catalog::standard_routes(),
            ride_history: catalog::ride_history_fixture(),
            active_toast: None,
        }
    }

    pub fn route_by_key(&self, key: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.key().as_str() == key)
    }

    pub fn can_start_trip(&self) -> bool {
        self.trip.is_idle()
    }

    pub fn show_toast(&mut self, text: impl Into<String>, kind: ToastKind) {
        self.active_toast = Some(ToastMessage::new(text, kind, crate::get_current_time_ms()));
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::with_config(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fastest() -> Route {
        catalog::standard_routes().remove(0)
    }

    fn safest() -> Route {
        catalog::standard_routes().remove(1)
    }

    #[test]
    fn trip_starts_only_from_idle() {
        let mut trip = TripPhase::Idle;
        assert!(trip.start(fastest()).is_ok());
        assert!(trip.is_live());
        assert_eq!(trip.selected_route().unwrap().key().as_str(), "fastest");

        // Second start is rejected and the first route stays live.
        assert_eq!(trip.start(safest()), Err(TripError::AlreadyLive));
        assert_eq!(trip.selected_route().unwrap().key().as_str(), "fastest");
    }

    #[test]
    fn trip_end_requires_live() {
        let mut trip = TripPhase::Idle;
        assert_eq!(trip.end(), Err(TripError::NotLive));
        assert!(trip.is_idle());

        trip.start(fastest()).unwrap();
        assert!(trip.end().is_ok());
        assert!(trip.is_awaiting_feedback());
        assert!(trip.selected_route().is_none());

        // Ending again while feedback is pending is also a no-op.
        assert_eq!(trip.end(), Err(TripError::NotLive));
        assert!(trip.is_awaiting_feedback());
    }

    #[test]
    fn trip_start_blocked_until_feedback_resolved() {
        let mut trip = TripPhase::Idle;
        trip.start(fastest()).unwrap();
        trip.end().unwrap();
        assert_eq!(trip.start(safest()), Err(TripError::FeedbackPending));

        trip.resolve_feedback().unwrap();
        assert!(trip.start(safest()).is_ok());
    }

    #[test]
    fn resolve_feedback_requires_pending() {
        let mut trip = TripPhase::Idle;
        assert_eq!(trip.resolve_feedback(), Err(TripError::NoFeedbackPending));
        trip.start(fastest()).unwrap();
        assert_eq!(trip.resolve_feedback(), Err(TripError::NoFeedbackPending));
    }

    proptest! {
        // For any sequence of start/end/resolve calls, "live iff a route is
        // selected" holds and rejected calls leave the phase untouched.
        #[test]
        fn trip_invariant_under_arbitrary_sequences(ops in proptest::collection::vec(0u8..3, 0..64)) {
            let mut trip = TripPhase::Idle;
            for op in ops {
                let before = trip.clone();
                let result = match op {
                    0 => trip.start(fastest()),
                    1 => trip.end(),
                    _ => trip.resolve_feedback(),
                };
                prop_assert_eq!(trip.is_live(), trip.selected_route().is_some());
                if result.is_err() {
                    prop_assert_eq!(&trip, &before);
                }
            }
        }
    }

    #[test]
    fn theme_toggle_parity() {
        let start = Theme::Dark;
        let mut theme = start;
        for _ in 0..4 {
            theme = theme.toggled();
        }
        assert_eq!(theme, start);
        theme = theme.toggled();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn theme_storage_values() {
        assert_eq!(Theme::Dark.storage_value(), "dark");
        assert_eq!(Theme::from_storage_value("light"), Some(Theme::Light));
        assert_eq!(Theme::from_storage_value("solarized"), None);
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert_eq!(Rating::new(0), Err(TripError::InvalidRating { value: 0 }));
        assert_eq!(Rating::new(6), Err(TripError::InvalidRating { value: 6 }));
        assert_eq!(Rating::default().value(), DEFAULT_RATING);
    }

    #[test]
    fn feedback_note_is_truncated() {
        let mut form = FeedbackForm::default();
        let long: String = "x".repeat(MAX_FEEDBACK_NOTE_LEN + 50);
        form.set_note(&long);
        assert_eq!(form.note().chars().count(), MAX_FEEDBACK_NOTE_LEN);

        form.reset();
        assert_eq!(form.note(), "");
        assert_eq!(form.rating().value(), DEFAULT_RATING);
    }

    #[test]
    fn metrics_record_appends_and_bounds() {
        let mut metrics = MacMetrics::seeded();
        assert_eq!(metrics.count(), DEFAULT_MAC_COUNT);

        for _ in 0..40 {
            let count = metrics.record();
            assert_eq!(metrics.history_vec().last(), Some(&count));
            assert!(metrics.history_vec().len() <= MAC_HISTORY_LIMIT);
        }
        assert_eq!(metrics.count(), DEFAULT_MAC_COUNT + 40);
        assert_eq!(metrics.history_vec().len(), MAC_HISTORY_LIMIT);
    }

    #[test]
    fn metrics_delta_and_trend() {
        let mut metrics = MacMetrics::seeded();
        metrics.restore_count(110);
        metrics.restore_history(vec![100, 110]);
        assert_eq!(metrics.delta(), 10);
        assert_eq!(metrics.trend(), MacTrend::Up);

        metrics.restore_count(90);
        metrics.restore_history(vec![120, 90]);
        assert_eq!(metrics.delta(), -30);
        assert_eq!(metrics.trend(), MacTrend::Down);
    }

    #[test]
    fn metrics_restore_reconciles_count() {
        let mut metrics = MacMetrics::seeded();
        metrics.restore_history(vec![10, 20, 30]);
        metrics.restore_count(42);
        assert_eq!(metrics.history_vec().last(), Some(&42));

        let oversized: Vec<u64> = (0..50).collect();
        metrics.restore_history(oversized);
        assert!(metrics.history_vec().len() <= MAC_HISTORY_LIMIT);
        assert_eq!(metrics.history_vec().last(), Some(&metrics.count()));
    }

    #[test]
    fn config_presets() {
        let sidebar = AppConfig::sidebar();
        assert!(sidebar.metrics_enabled);
        assert!(sidebar.contains(Page::Metrics));
        assert!(sidebar.contains(Page::Onboarding));
        assert_eq!(sidebar.landing_page(), Page::Routes);

        let header = AppConfig::header();
        assert!(!header.metrics_enabled);
        assert!(!header.contains(Page::Metrics));
        assert!(!header.contains(Page::Eta));
        assert_eq!(header.landing_page(), Page::Home);
    }

    #[test]
    fn toast_expiry() {
        let toast = ToastMessage::new("done", ToastKind::Success, 1_000);
        assert!(!toast.is_expired(1_000 + TOAST_DURATION_MS - 1));
        assert!(toast.is_expired(1_000 + TOAST_DURATION_MS));
    }

    #[test]
    fn model_route_lookup() {
        let model = Model::default();
        assert!(model.route_by_key("fastest").is_some());
        assert!(model.route_by_key("scenic").is_none());
        assert!(model.can_start_trip());
    }
}
