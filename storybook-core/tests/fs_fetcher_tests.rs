use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use storybook_core::assets::{AssetCache, AssetFetcher, AssetStatus, FetchResult, Fetched, FsFetcher, Priority};
use storybook_core::catalog::AssetKind;
use storybook_core::error::AssetError;

fn write_assets(root: &Path) {
    fs::create_dir_all(root.join("images")).unwrap();
    image::RgbaImage::new(3, 2).save(root.join("images/ok.png")).unwrap();
    fs::write(root.join("images/corrupt.png"), b"definitely not a png").unwrap();
    fs::write(root.join("images/empty.mp4"), b"").unwrap();
    fs::write(root.join("images/clip.mp4"), vec![0u8; 64]).unwrap();
}

fn settle_cache(cache: &mut AssetCache, urls: &[&str]) {
    for _ in 0..500 {
        cache.update(Duration::ZERO);
        if urls.iter().all(|u| cache.status(u).is_settled()) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("assets never settled: {:?}", urls.iter().map(|u| cache.status(u)).collect::<Vec<_>>());
}

fn drain(fetcher: &mut FsFetcher, expected: usize) -> Vec<FetchResult> {
    let mut results = Vec::new();
    for _ in 0..500 {
        results.extend(fetcher.poll());
        if results.len() >= expected {
            return results;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("only {} of {} results arrived", results.len(), expected);
}

#[test]
fn test_cache_over_filesystem_settles_every_outcome() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());

    let fetcher = FsFetcher::new(dir.path(), 2).unwrap();
    let mut cache = AssetCache::new(Box::new(fetcher), Duration::from_secs(3));

    let urls = ["/images/ok.png", "/images/missing.png", "/images/corrupt.png", "/images/empty.mp4", "/images/clip.mp4"];
    cache.preload_image(urls[0]);
    cache.preload_image(urls[1]);
    cache.preload_image(urls[2]);
    cache.preload_video(urls[3]);
    cache.preload_video(urls[4]);
    settle_cache(&mut cache, &urls);

    let image = cache.get_ready_image("/images/ok.png").unwrap();
    assert_eq!((image.width, image.height), (3, 2));
    assert!(image.pixels.is_some());

    assert_eq!(cache.status("/images/missing.png"), AssetStatus::Unavailable);
    assert_eq!(cache.status("/images/corrupt.png"), AssetStatus::Unavailable);
    assert_eq!(cache.status("/images/empty.mp4"), AssetStatus::Unavailable);
    assert!(cache.get_ready_image("/images/corrupt.png").is_none());

    let video = cache.get_ready_video("/images/clip.mp4").unwrap();
    assert!(video.borrow().is_buffered());
    assert_eq!(video.borrow().info().byte_len, 64);
    assert_eq!(cache.fetch_count(), 5);
}

#[test]
fn test_fetcher_reports_typed_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut fetcher = FsFetcher::new(dir.path(), 1).unwrap();

    fetcher.request("/images/empty.mp4", AssetKind::Video, Priority::Critical);
    fetcher.request("/images/corrupt.png", AssetKind::Image, Priority::Critical);
    fetcher.request("/images/missing.png", AssetKind::Image, Priority::Critical);

    for result in drain(&mut fetcher, 3) {
        match result.url.as_str() {
            "/images/empty.mp4" => assert!(matches!(result.outcome, Err(AssetError::Empty { .. }))),
            "/images/corrupt.png" => assert!(matches!(result.outcome, Err(AssetError::Decode { .. }))),
            "/images/missing.png" => assert!(matches!(result.outcome, Err(AssetError::Io { .. }))),
            other => panic!("unexpected result for {}", other),
        }
    }
    assert_eq!(fetcher.in_flight(), 0);
}

#[test]
fn test_resolve_strips_leading_slash() {
    let root = Path::new("/srv/story");
    assert_eq!(FsFetcher::resolve(root, "/images/a.png"), root.join("images/a.png"));
    assert_eq!(FsFetcher::resolve(root, " images/a.png "), root.join("images/a.png"));
}

#[test]
fn test_background_waits_behind_critical_and_can_be_promoted() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut fetcher = FsFetcher::new(dir.path(), 1).unwrap();

    fetcher.request("/images/clip.mp4", AssetKind::Video, Priority::Background);
    assert_eq!(fetcher.queued_background(), 1);
    assert_eq!(fetcher.in_flight(), 0);

    fetcher.request("/images/ok.png", AssetKind::Image, Priority::Critical);
    fetcher.prioritize("/images/clip.mp4");
    assert_eq!(fetcher.queued_background(), 0);
    assert_eq!(fetcher.in_flight(), 2);

    let results = drain(&mut fetcher, 2);
    assert!(results.iter().all(|r| r.outcome.is_ok()));
    assert!(results.iter().any(|r| matches!(r.outcome, Ok(Fetched::Image(_)))));
}

#[test]
fn test_background_dispatches_once_critical_work_drains() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let mut fetcher = FsFetcher::new(dir.path(), 1).unwrap();

    fetcher.request("/images/ok.png", AssetKind::Image, Priority::Critical);
    fetcher.request("/images/clip.mp4", AssetKind::Video, Priority::Background);
    assert_eq!(fetcher.queued_background(), 1);

    let first = drain(&mut fetcher, 1);
    assert_eq!(first[0].url, "/images/ok.png");
    assert_eq!(fetcher.queued_background(), 0);

    let second = drain(&mut fetcher, 1);
    assert_eq!(second[0].url, "/images/clip.mp4");
}
