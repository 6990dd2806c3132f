//! Tick benchmark: Measure the cost of one countdown second.
//!
//! Target: < 10µs per tick with one bar observer

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hourglass::{
    format_remaining, BarColour, BarStyle, BossBarRenderer, ManualScheduler, RendererKind,
    TerminalPlatform, TimerEngine, TimerRenderer,
};

/// Renderer that draws nothing, isolating the engine itself.
struct NullRenderer;

impl TimerRenderer for NullRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::ActionBar
    }

    fn on_start(&mut self, message: &str) {
        black_box(message);
    }

    fn on_update(&mut self, message: &str, progress: f64) {
        black_box((message, progress));
    }

    fn on_stop(&mut self) {}
}

fn message(secs: u64) -> String {
    format!("Border shrinks in {}", format_remaining(secs))
}

fn engine_tick(c: &mut Criterion) {
    let mut engine = TimerEngine::new(Box::new(NullRenderer), ManualScheduler::new());
    engine.start(message, u64::MAX / 2).unwrap();

    c.bench_function("engine_tick_null_renderer", |b| {
        b.iter(|| engine.tick().unwrap())
    });
}

fn bar_tick(c: &mut Criterion) {
    for (name, style) in [
        ("bar_tick_solid", BarStyle::Solid),
        ("bar_tick_segmented_20", BarStyle::Segmented20),
    ] {
        let platform = TerminalPlatform::default();
        platform.connect(std::io::sink(), 120);
        let renderer = BossBarRenderer::new(&platform, BarColour::Green, style).unwrap();
        let mut engine = TimerEngine::new(Box::new(renderer), ManualScheduler::new());
        engine.start(message, u64::MAX / 2).unwrap();

        c.bench_function(name, |b| b.iter(|| engine.tick().unwrap()));
    }
}

criterion_group!(benches, engine_tick, bar_tick);
criterion_main!(benches);
