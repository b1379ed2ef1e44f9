//! Serializable projection of [`Model`] for the presentation surface.
//!
//! The shell renders exactly this and nothing else; every field is derived,
//! none is authoritative.

use serde::{Deserialize, Serialize};

use crate::catalog::{BadgeTone, RideHistoryEntry, Route};
use crate::model::{MacMetrics, MacTrend, Model, NavStyle, Page, Theme, ToastKind, ToastMessage};
use crate::{BASE_FARE_INR, LAST_USED_PAYMENT_HINT, SPONSORSHIP_DISCOUNT_INR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeView {
    pub text: String,
    pub tone: BadgeTone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCard {
    pub key: String,
    pub title: String,
    pub eta_minutes: u32,
    pub distance_km: f64,
    pub lighting: String,
    pub badges: Vec<BadgeView>,
    pub can_start: bool,
}

impl RouteCard {
    fn project(route: &Route, can_start: bool) -> Self {
        Self {
            key: route.key().as_str().to_string(),
            title: route.title().to_string(),
            eta_minutes: route.eta_minutes(),
            distance_km: route.distance_km(),
            lighting: route.lighting().label().to_string(),
            badges: route
                .badges()
                .iter()
                .map(|b| BadgeView {
                    text: b.text.clone(),
                    tone: b.tone,
                })
                .collect(),
            can_start,
        }
    }
}

/// The live-trip card: map preview metadata, SOS and end-trip controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveTripView {
    pub title: String,
    pub eta_minutes: u32,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackView {
    pub rating: u8,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutView {
    pub base_fare_inr: u32,
    pub sponsorship_applied: bool,
    pub discount_inr: u32,
    pub total_inr: u32,
    pub last_used_hint: String,
}

impl CheckoutView {
    /// Cosmetic fare arithmetic only; there is no payment integration.
    pub fn project(sponsorship_applied: bool) -> Self {
        let discount_inr = if sponsorship_applied {
            SPONSORSHIP_DISCOUNT_INR
        } else {
            0
        };
        Self {
            base_fare_inr: BASE_FARE_INR,
            sponsorship_applied,
            discount_inr,
            total_inr: BASE_FARE_INR.saturating_sub(discount_inr),
            last_used_hint: LAST_USED_PAYMENT_HINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRow {
    pub code: String,
    pub timestamp: String,
    pub origin: String,
    pub destination: String,
    pub payment: String,
    pub mode: String,
    pub fare_inr: u32,
}

impl From<&RideHistoryEntry> for RideRow {
    fn from(entry: &RideHistoryEntry) -> Self {
        Self {
            code: entry.trip_code(),
            timestamp: entry.timestamp.clone(),
            origin: entry.origin.clone(),
            destination: entry.destination.clone(),
            payment: entry.payment.label().to_string(),
            mode: entry.mode.label().to_string(),
            fare_inr: entry.fare_inr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsView {
    pub count: u64,
    pub delta: i64,
    pub trend: MacTrend,
    pub history: Vec<u64>,
    pub rides: Vec<RideRow>,
}

impl MetricsView {
    pub fn project(metrics: &MacMetrics, rides: &[RideHistoryEntry]) -> Self {
        Self {
            count: metrics.count(),
            delta: metrics.delta(),
            trend: metrics.trend(),
            history: metrics.history_vec(),
            rides: rides.iter().map(RideRow::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastView {
    pub text: String,
    pub kind: ToastKind,
}

impl From<&ToastMessage> for ToastView {
    fn from(toast: &ToastMessage) -> Self {
        Self {
            text: toast.text.clone(),
            kind: toast.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub nav_style: NavStyle,
    pub nav_pages: Vec<Page>,
    pub active_page: Page,
    pub theme: Theme,
    pub routes: Vec<RouteCard>,
    pub live_trip: Option<LiveTripView>,
    pub can_start_trip: bool,
    pub feedback: Option<FeedbackView>,
    pub sos_open: bool,
    pub checkout: CheckoutView,
    /// `None` when the active configuration has no metrics panel.
    pub metrics: Option<MetricsView>,
    pub toast: Option<ToastView>,
}

impl ViewModel {
    pub fn project(model: &Model) -> Self {
        let can_start = model.can_start_trip();
        Self {
            nav_style: model.config.nav_style,
            nav_pages: model.config.pages.clone(),
            active_page: model.active_page,
            theme: model.theme,
            routes: model
                .routes
                .iter()
                .map(|r| RouteCard::project(r, can_start))
                .collect(),
            live_trip: model.trip.selected_route().map(|route| LiveTripView {
                title: route.title().to_string(),
                eta_minutes: route.eta_minutes(),
                distance_km: route.distance_km(),
            }),
            can_start_trip: can_start,
            feedback: if model.trip.is_awaiting_feedback() {
                Some(FeedbackView {
                    rating: model.feedback.rating().value(),
                    note: model.feedback.note().to_string(),
                })
            } else {
                None
            },
            sos_open: model.sos_open,
            checkout: CheckoutView::project(model.sponsorship_applied),
            metrics: if model.config.metrics_enabled {
                Some(MetricsView::project(&model.metrics, &model.ride_history))
            } else {
                None
            },
            toast: model.active_toast.as_ref().map(ToastView::from),
        }
    }
}
