//! The application core: one `update` function over [`Model`], one `view`.

use tracing::{debug, warn};

use crate::capabilities::{Capabilities, StorageKey, StorageOutput, StorageResult};
use crate::event::Event;
use crate::model::{Model, Page, Rating, Theme, ToastKind, TripError};
use crate::view::ViewModel;

#[derive(Default)]
pub struct App;

impl App {
    /// Kick off reads for everything this configuration persists.
    fn request_hydration(model: &Model, caps: &Capabilities) {
        caps.storage.load(StorageKey::Theme, |result| Event::StorageLoaded {
            key: StorageKey::Theme,
            result,
        });

        if model.config.metrics_enabled {
            caps.storage
                .load(StorageKey::MacCount, |result| Event::StorageLoaded {
                    key: StorageKey::MacCount,
                    result,
                });
            caps.storage
                .load(StorageKey::MacHistory, |result| Event::StorageLoaded {
                    key: StorageKey::MacHistory,
                    result,
                });
        }
    }

    fn persist_theme(model: &Model, caps: &Capabilities) {
        let value = model.theme.storage_value().as_bytes().to_vec();
        caps.storage
            .persist(StorageKey::Theme, value, |result| Event::StorageWritten {
                key: StorageKey::Theme,
                result,
            });
    }

    fn persist_metrics(model: &Model, caps: &Capabilities) {
        let count = model.metrics.count().to_string().into_bytes();
        caps.storage
            .persist(StorageKey::MacCount, count, |result| Event::StorageWritten {
                key: StorageKey::MacCount,
                result,
            });

        match serde_json::to_vec(&model.metrics.history_vec()) {
            Ok(history) => {
                caps.storage
                    .persist(StorageKey::MacHistory, history, |result| {
                        Event::StorageWritten {
                            key: StorageKey::MacHistory,
                            result,
                        }
                    });
            }
            Err(err) => warn!(%err, "metric history serialization failed"),
        }
    }

    /// One increment per qualifying event, then surface the metrics page
    /// where the configuration has one.
    fn record_metric(model: &mut Model, caps: &Capabilities) {
        let count = model.metrics.record();
        debug!(count, "metric recorded");
        Self::persist_metrics(model, caps);
        if model.config.contains(Page::Metrics) {
            model.active_page = Page::Metrics;
        }
    }

    /// Apply a completed storage read. Unreadable or absent values fall back
    /// to defaults; nothing is surfaced to the user.
    fn apply_loaded(model: &mut Model, key: StorageKey, bytes: Option<Vec<u8>>) {
        let Some(bytes) = bytes else {
            if key == StorageKey::Theme {
                model.theme = Theme::from_os_hint(model.os_prefers_dark);
            }
            return;
        };

        match key {
            StorageKey::Theme => {
                let parsed = std::str::from_utf8(&bytes)
                    .ok()
                    .and_then(Theme::from_storage_value);
                match parsed {
                    Some(theme) => model.theme = theme,
                    None => {
                        warn!("persisted theme unreadable, using OS preference");
                        model.theme = Theme::from_os_hint(model.os_prefers_dark);
                    }
                }
            }
            StorageKey::MacCount => {
                match std::str::from_utf8(&bytes).ok().and_then(|s| s.parse().ok()) {
                    Some(count) => model.metrics.restore_count(count),
                    None => warn!("persisted metric counter unreadable, keeping seed"),
                }
            }
            StorageKey::MacHistory => match serde_json::from_slice::<Vec<u64>>(&bytes) {
                Ok(history) => model.metrics.restore_history(history),
                Err(err) => warn!(%err, "persisted metric history unreadable, keeping seed"),
            },
        }
    }

    fn handle_storage_result(key: StorageKey, result: StorageResult, model: &mut Model) {
        match result {
            Ok(StorageOutput::Value(bytes)) => Self::apply_loaded(model, key, bytes),
            Ok(StorageOutput::Written) => {
                warn!(key = key.raw(), "unexpected write ack on read path");
            }
            Err(err) => {
                // Read failures degrade to whatever the model already holds.
                warn!(key = key.raw(), %err, "storage read failed, using defaults");
                if key == StorageKey::Theme {
                    model.theme = Theme::from_os_hint(model.os_prefers_dark);
                }
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user = event.is_user_initiated(),
            "handling event"
        );

        match event {
            Event::AppStarted { os_prefers_dark } => {
                model.os_prefers_dark = os_prefers_dark;
                model.theme = Theme::from_os_hint(os_prefers_dark);
                Self::request_hydration(model, caps);
                caps.render.render();
            }

            Event::PageSelected(page) => {
                if model.config.contains(page) {
                    model.active_page = page;
                } else {
                    warn!(page = page.label(), "page not in this configuration");
                }
                caps.render.render();
            }

            Event::ThemeToggled => {
                model.theme = model.theme.toggled();
                Self::persist_theme(model, caps);
                caps.render.render();
            }

            Event::TripStarted { route_key } => {
                match model.route_by_key(&route_key).cloned() {
                    Some(route) => match model.trip.start(route) {
                        Ok(()) => {
                            // Jump to the ETA tracker where the variant has one.
                            if model.config.contains(Page::Eta) {
                                model.active_page = Page::Eta;
                            }
                        }
                        Err(err) => warn!(%err, "trip start rejected"),
                    },
                    None => {
                        let err = TripError::UnknownRoute { key: route_key };
                        warn!(%err, "trip start rejected");
                    }
                }
                caps.render.render();
            }

            Event::TripEnded => {
                match model.trip.end() {
                    Ok(()) => model.feedback.reset(),
                    Err(err) => warn!(%err, "trip end rejected"),
                }
                caps.render.render();
            }

            Event::FeedbackRatingSet { rating } => {
                if model.trip.is_awaiting_feedback() {
                    match Rating::new(rating) {
                        Ok(rating) => model.feedback.set_rating(rating),
                        Err(err) => warn!(%err, "rating ignored"),
                    }
                }
                caps.render.render();
            }

            Event::FeedbackNoteEdited { note } => {
                if model.trip.is_awaiting_feedback() {
                    model.feedback.set_note(&note);
                }
                caps.render.render();
            }

            Event::FeedbackSubmitted { rating, note } => {
                let outcome = Rating::new(rating)
                    .and_then(|rating| model.trip.resolve_feedback().map(|()| rating));
                match outcome {
                    Ok(rating) => {
                        if let Some(note) = note {
                            debug!(chars = note.chars().count(), "feedback note recorded");
                        }
                        model.feedback.reset();
                        model.show_toast(
                            format!("Thanks — safety rating {}/5 recorded", rating.value()),
                            ToastKind::Success,
                        );
                        if model.config.metrics_enabled {
                            Self::record_metric(model, caps);
                        }
                    }
                    Err(err) => warn!(%err, "feedback submit rejected"),
                }
                caps.render.render();
            }

            Event::FeedbackDismissed => {
                match model.trip.resolve_feedback() {
                    Ok(()) => model.feedback.reset(),
                    Err(err) => warn!(%err, "feedback dismiss rejected"),
                }
                caps.render.render();
            }

            Event::SosTriggered => {
                model.sos_open = true;
                model.show_toast("Alert sent to responders and employer line", ToastKind::Warning);
                caps.render.render();
            }

            Event::SosDismissed => {
                model.sos_open = false;
                caps.render.render();
            }

            Event::SponsorshipToggled => {
                model.sponsorship_applied = !model.sponsorship_applied;
                caps.render.render();
            }

            Event::PaymentConfirmed => {
                model.show_toast("Payment successful", ToastKind::Success);
                if model.config.metrics_enabled {
                    Self::record_metric(model, caps);
                }
                caps.render.render();
            }

            Event::ToastDismissed => {
                model.clear_toast();
                caps.render.render();
            }

            Event::StorageLoaded { key, result } => {
                Self::handle_storage_result(key, result, model);
                caps.render.render();
            }

            Event::StorageWritten { key, result } => {
                // Writes are best-effort; failures are logged and dropped.
                if let Err(err) = result {
                    warn!(key = key.raw(), %err, "storage write failed");
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::project(model)
    }
}
