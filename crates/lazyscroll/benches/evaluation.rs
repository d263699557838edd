use lazyscroll::{LazyChild, Rect, ScrollTrackerOptions, WatcherOptions};
use lazyscroll_testing::{CallbackRecorder, TestScene};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const CHILD_EXTENT: f32 = 120.0;
const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1080.0, 1920.0);
const WATCHER_SAMPLES: &[usize] = &[16, 128, 1024];
const SCROLL_STEPS: usize = 64;

fn scene_with_children(count: usize, recorder: &CallbackRecorder) -> (TestScene, Vec<LazyChild>) {
    let scene = TestScene::with_options(
        VIEWPORT,
        ScrollTrackerOptions::default()
            .with_scroll_throttle_ms(0)
            .with_offset(200.0),
    );
    let views = scene.stack(count, CHILD_EXTENT);
    let children = views
        .iter()
        .enumerate()
        .map(|(index, view)| {
            let options = WatcherOptions::default().with_percent_visible_threshold(0.5);
            match scene.mount(view, recorder.all(&index.to_string()), options) {
                Ok(child) => child,
                Err(err) => panic!("bench options rejected: {err}"),
            }
        })
        .collect();
    (scene, children)
}

fn bench_scroll_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_fan_out");
    for &count in WATCHER_SAMPLES {
        let recorder = CallbackRecorder::new();
        let (scene, children) = scene_with_children(count, &recorder);
        let max_offset = (count as f32 * CHILD_EXTENT - VIEWPORT.height).max(0.0);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                for step in 0..SCROLL_STEPS {
                    // Sweep down and back up, off the child grid.
                    let phase = step as f32 / SCROLL_STEPS as f32;
                    let offset = max_offset * (1.0 - (2.0 * phase - 1.0).abs()) + 0.5;
                    scene.scroll_raw(black_box(offset));
                }
                recorder.clear();
            });
        });
        drop(children);
    }
    group.finish();
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount_and_layout");
    for &count in WATCHER_SAMPLES {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let recorder = CallbackRecorder::new();
                let (scene, children) = scene_with_children(count, &recorder);
                black_box((scene.frames(), children.len()))
            });
        });
    }
    group.finish();
}

criterion_group!(evaluation, bench_scroll_fan_out, bench_mount);
criterion_main!(evaluation);
