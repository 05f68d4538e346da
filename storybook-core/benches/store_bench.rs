use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use storybook_core::{Action, AssetCache, Catalog, CoreConfig, InputEvent, ManualFetcher, PlaybackState, Player, SilentTrack};

fn make_catalog_json(slides: usize) -> String {
    let mut buf = String::with_capacity(slides * 400);
    buf.push('[');
    for i in 0..slides {
        if i > 0 {
            buf.push(',');
        }
        let background = if i % 4 == 3 {
            format!("/assets/clip{i}.mp4")
        } else {
            format!("/assets/bg{i}.png")
        };
        buf.push_str(&format!(
            r#"{{"id":{i},"title":"Slide {i}","backgroundImage":"{background}","audioTrack":"/assets/track{i}.mp3",
               "objects":[{{"id":"obj{i}","gifUrl":"/assets/obj{i}.png","position":{{"x":0.2,"y":0.3}},
               "size":{{"width":0.1,"height":0.1}},"interaction":{{"type":"sound","data":{{"soundUrl":"/assets/s{i}.mp3"}}}}}}]}}"#
        ));
    }
    buf.push(']');
    buf
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    group.sample_size(20);

    let json = make_catalog_json(1_000);
    group.bench_function("parse 1k slides", |b| {
        b.iter(|| Catalog::from_json_str(&json))
    });

    group.bench_function("dispatch 10k actions", |b| {
        b.iter_batched(
            || PlaybackState::new(1_000),
            |mut state| {
                for i in 0..10_000usize {
                    let action = match i % 5 {
                        0 => Action::Next,
                        1 => Action::MarkInteracted(format!("obj{}", i % 64)),
                        2 => Action::Prev,
                        3 => Action::ToggleAudio,
                        _ => Action::GoTo(i % 1_000),
                    };
                    state.dispatch(action);
                }
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_player(c: &mut Criterion) {
    let catalog = match Catalog::from_json_str(&make_catalog_json(64)) {
        Ok(c) => c,
        Err(e) => panic!("bench catalog: {e}"),
    };
    let mut group = c.benchmark_group("player");
    group.sample_size(10);

    group.bench_function("walk 64 slides", |b| {
        b.iter_batched(
            || {
                let fetcher = ManualFetcher::new();
                let cache = AssetCache::new(Box::new(fetcher.clone()), Duration::from_secs(3));
                (Player::new(catalog.clone(), cache, SilentTrack::new(), CoreConfig::default()), fetcher)
            },
            |(mut player, fetcher)| {
                player.feed(InputEvent::Start);
                for _ in 0..64 {
                    fetcher.complete_all(1920, 1080);
                    for _ in 0..4 {
                        player.update(Duration::from_millis(16));
                    }
                    let _ = player.layers();
                    player.feed(InputEvent::Next);
                }
                player
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_store, bench_player);
criterion_main!(benches);
