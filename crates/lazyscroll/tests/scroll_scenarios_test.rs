/// End-to-end scroll scenarios: a tracker with a stack of children, scrolled
/// the way a host would report it.
use lazyscroll::{MainAxisSpan, Rect, ScrollTrackerOptions, WatcherOptions};
use lazyscroll_testing::{assert_events, assert_span_approx_eq, CallbackRecorder, TestScene};

const CHILD_EXTENT: f32 = 400.0;

#[test]
fn three_children_enter_one_after_another() {
    let scene = TestScene::vertical(320.0, 400.0);
    let recorder = CallbackRecorder::new();
    let views = scene.stack(3, CHILD_EXTENT);
    let _children: Vec<_> = views
        .iter()
        .enumerate()
        .map(|(index, view)| {
            scene
                .mount(
                    view,
                    recorder.enter_only(&format!("child{}", index + 1)),
                    WatcherOptions::default(),
                )
                .expect("valid options")
        })
        .collect();

    assert_events(&recorder.events(), &["child1:enter"]);

    scene.scroll_by(1.0);
    assert_events(&recorder.events(), &["child1:enter", "child2:enter"]);

    scene.scroll_to(400.0);
    assert_events(&recorder.events(), &["child1:enter", "child2:enter"]);

    scene.scroll_to(800.0);
    assert_events(
        &recorder.events(),
        &["child1:enter", "child2:enter", "child3:enter"],
    );
}

#[test]
fn negative_offset_delays_the_trigger() {
    let scene = TestScene::with_options(
        Rect::new(0.0, 0.0, 320.0, 300.0),
        ScrollTrackerOptions::default().with_offset(-100.0),
    );
    let recorder = CallbackRecorder::new();
    let views = scene.stack(2, CHILD_EXTENT);
    let _first = scene
        .mount(&views[0], recorder.enter_only("first"), WatcherOptions::default())
        .expect("valid options");
    let _second = scene
        .mount(&views[1], recorder.enter_only("second"), WatcherOptions::default())
        .expect("valid options");
    assert_events(&recorder.events(), &["first:enter"]);

    scene.scroll_to(200.0);
    assert_eq!(recorder.count("second:enter"), 0);

    scene.scroll_to(201.0);
    assert_eq!(recorder.count("second:enter"), 1);
}

#[test]
fn positive_offset_fires_before_the_child_is_on_screen() {
    let scene = TestScene::with_options(
        Rect::new(0.0, 0.0, 320.0, 300.0),
        ScrollTrackerOptions::default().with_offset(200.0),
    );
    let recorder = CallbackRecorder::new();
    let view = scene.child_at(450.0, 100.0);
    let _child = scene
        .mount(&view, recorder.enter_only("prefetch"), WatcherOptions::default())
        .expect("valid options");

    assert_events(&recorder.events(), &["prefetch:enter"]);
}

#[test]
fn horizontal_strip_tracks_the_x_axis() {
    let scene = TestScene::horizontal(400.0, 120.0);
    let recorder = CallbackRecorder::new();
    let views = scene.stack(3, CHILD_EXTENT);
    let _children: Vec<_> = views
        .iter()
        .enumerate()
        .map(|(index, view)| {
            scene
                .mount(
                    view,
                    recorder.threshold(&format!("tile{index}")),
                    WatcherOptions::default(),
                )
                .expect("valid options")
        })
        .collect();
    assert_events(&recorder.events(), &["tile0:enter"]);

    scene.scroll_to(1.0);
    assert_events(&recorder.events(), &["tile0:enter", "tile1:enter"]);

    scene.scroll_to(500.0);
    assert_events(
        &recorder.events(),
        &["tile0:enter", "tile1:enter", "tile0:exit", "tile2:enter"],
    );
}

#[test]
fn children_below_the_fold_stay_silent() {
    let scene = TestScene::vertical(320.0, 400.0);
    let recorder = CallbackRecorder::new();
    let views = scene.stack(10, 100.0);
    let _children: Vec<_> = views
        .iter()
        .enumerate()
        .map(|(index, view)| {
            scene
                .mount(
                    view,
                    recorder.enter_only(&index.to_string()),
                    WatcherOptions::default(),
                )
                .expect("valid options")
        })
        .collect();

    assert_events(
        &recorder.events(),
        &["0:enter", "1:enter", "2:enter", "3:enter"],
    );
}

#[test]
fn container_below_window_origin_offsets_every_child() {
    let scene = TestScene::with_options(
        Rect::new(0.0, 120.0, 320.0, 400.0),
        ScrollTrackerOptions::default(),
    );
    let recorder = CallbackRecorder::new();
    let views = scene.stack(2, CHILD_EXTENT);
    let _first = scene
        .mount(&views[0], recorder.enter_only("first"), WatcherOptions::default())
        .expect("valid options");
    let _second = scene
        .mount(&views[1], recorder.enter_only("second"), WatcherOptions::default())
        .expect("valid options");

    let state = scene.tracker().published_state();
    assert_eq!(state.container_start, 120.0);
    assert_eq!(state.container_end, 520.0);
    assert_events(&recorder.events(), &["first:enter"]);

    scene.scroll_to(1.0);
    assert_events(&recorder.events(), &["first:enter", "second:enter"]);
}

#[test]
fn measurements_are_reported_in_window_space() {
    let scene = TestScene::with_options(
        Rect::new(0.0, 120.0, 320.0, 400.0),
        ScrollTrackerOptions::default(),
    );
    let recorder = CallbackRecorder::new();
    let view = scene.child_at(500.0, 100.0);
    let child = scene
        .mount(&view, recorder.threshold("card"), WatcherOptions::default())
        .expect("valid options");

    scene.scroll_to(250.5);
    let measured = child
        .watcher()
        .and_then(|watcher| watcher.last_measurement())
        .expect("child was measured");
    assert_span_approx_eq(
        measured,
        MainAxisSpan::new(369.5, 100.0),
        0.01,
        "container origin plus content offset minus scroll",
    );
    assert_events(&recorder.events(), &["card:enter"]);
}
