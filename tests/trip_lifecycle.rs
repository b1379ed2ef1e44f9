use crux_core::testing::AppTester;
use smart_commute_core::model::Page;
use smart_commute_core::{App, Effect, Event, Model, ViewModel};

fn start(app: &AppTester<App, Effect>, model: &mut Model, key: &str) {
    app.update(
        Event::TripStarted {
            route_key: key.into(),
        },
        model,
    );
}

#[test]
fn full_trip_lifecycle() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::AppStarted {
            os_prefers_dark: false,
        },
        &mut model,
    );

    // Start the fastest route; the sidebar build jumps to the ETA tracker.
    let update = app.update(
        Event::TripStarted {
            route_key: "fastest".into(),
        },
        &mut model,
    );
    assert!(model.trip.is_live());
    assert_eq!(model.active_page, Page::Eta);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

    // A second start while live is rejected; the first trip stays.
    start(&app, &mut model, "safest");
    assert_eq!(
        model.trip.selected_route().unwrap().key().as_str(),
        "fastest"
    );

    // End the trip: selection cleared, feedback sheet open.
    app.update(Event::TripEnded, &mut model);
    assert!(model.trip.is_awaiting_feedback());
    assert!(model.trip.selected_route().is_none());
    let view = ViewModel::project(&model);
    assert!(view.live_trip.is_none());
    assert!(view.feedback.is_some());

    // Submit feedback: exactly one metric increment, history tail matches,
    // sheet closed, summary page shown.
    let count_before = model.metrics.count();
    let history_before = model.metrics.history_vec().len();
    let update = app.update(
        Event::FeedbackSubmitted {
            rating: 4,
            note: Some("well lit the whole way".into()),
        },
        &mut model,
    );

    assert!(model.trip.is_idle());
    assert_eq!(model.metrics.count(), count_before + 1);
    assert_eq!(
        model.metrics.history_vec().last(),
        Some(&model.metrics.count())
    );
    assert_eq!(model.metrics.history_vec().len(), history_before + 1);
    assert_eq!(model.active_page, Page::Metrics);
    assert!(model.active_toast.is_some());

    let view = ViewModel::project(&model);
    assert!(view.feedback.is_none());
    assert!(view.can_start_trip);

    // The new counter and history were both pushed to storage.
    let writes = update
        .effects
        .iter()
        .filter(|e| matches!(e, Effect::Storage(_)))
        .count();
    assert_eq!(writes, 2);
}

#[test]
fn end_trip_while_idle_is_a_noop() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::TripEnded, &mut model);
    assert!(model.trip.is_idle());
    assert!(ViewModel::project(&model).feedback.is_none());
}

#[test]
fn dismissing_feedback_records_nothing() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let count_before = model.metrics.count();

    start(&app, &mut model, "cheapest");
    app.update(Event::TripEnded, &mut model);
    let update = app.update(Event::FeedbackDismissed, &mut model);

    assert!(model.trip.is_idle());
    assert_eq!(model.metrics.count(), count_before);
    assert!(!update
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Storage(_))));
}

#[test]
fn out_of_range_rating_leaves_feedback_pending() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    start(&app, &mut model, "fastest");
    app.update(Event::TripEnded, &mut model);
    app.update(
        Event::FeedbackSubmitted {
            rating: 9,
            note: None,
        },
        &mut model,
    );

    assert!(model.trip.is_awaiting_feedback());
    assert_eq!(model.metrics.count(), smart_commute_core::DEFAULT_MAC_COUNT);
}

#[test]
fn feedback_form_edits_apply_only_while_pending() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    // No feedback pending: edits are ignored.
    app.update(Event::FeedbackRatingSet { rating: 2 }, &mut model);
    app.update(
        Event::FeedbackNoteEdited {
            note: "ignored".into(),
        },
        &mut model,
    );
    assert_eq!(model.feedback.rating().value(), 5);
    assert_eq!(model.feedback.note(), "");

    start(&app, &mut model, "fastest");
    app.update(Event::TripEnded, &mut model);
    app.update(Event::FeedbackRatingSet { rating: 3 }, &mut model);
    app.update(
        Event::FeedbackNoteEdited {
            note: "bumpy stretch near the flyover".into(),
        },
        &mut model,
    );

    let view = ViewModel::project(&model);
    let feedback = view.feedback.unwrap();
    assert_eq!(feedback.rating, 3);
    assert_eq!(feedback.note, "bumpy stretch near the flyover");
}

#[test]
fn metric_history_stays_bounded_over_many_trips() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    for _ in 0..25 {
        start(&app, &mut model, "fastest");
        app.update(Event::TripEnded, &mut model);
        app.update(
            Event::FeedbackSubmitted {
                rating: 5,
                note: None,
            },
            &mut model,
        );
    }

    let view = ViewModel::project(&model);
    let metrics = view.metrics.unwrap();
    assert_eq!(metrics.history.len(), 20);
    assert_eq!(metrics.history.last(), Some(&metrics.count));
    assert_eq!(metrics.count, smart_commute_core::DEFAULT_MAC_COUNT + 25);
    assert_eq!(metrics.delta, 1);
}
