use std::time::Duration;
use rustc_hash::FxHashMap;

use crate::assets::fetch::{AssetFetcher, FetchResult, Fetched};
use crate::assets::media::{ImageHandle, VideoElement, VideoHandle, VideoInfo};
use crate::catalog::{AssetKind, Catalog};
use crate::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Ready,
    /// Settled without usable media. Never blocks a slide.
    Unavailable,
}

impl AssetStatus {
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Critical,
    Background,
}

enum Entry {
    Pending { kind: AssetKind, priority: Priority, waited: Duration },
    Image(ImageHandle),
    Video(VideoHandle),
    Unavailable,
}

impl Entry {
    fn status(&self) -> AssetStatus {
        match self {
            Entry::Pending { .. } => AssetStatus::Pending,
            Entry::Image(_) | Entry::Video(_) => AssetStatus::Ready,
            Entry::Unavailable => AssetStatus::Unavailable,
        }
    }
}

/// Critical assets of one slide change (current + next slide).
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadBatch {
    pub slide: usize,
    critical: Vec<String>,
}

impl PreloadBatch {
    pub fn critical(&self) -> &[String] {
        &self.critical
    }

    pub fn is_settled(&self, cache: &AssetCache) -> bool {
        self.critical.iter().all(|url| cache.status(url).is_settled())
    }
}

/// Session-lifetime media cache: created once at startup, never evicted.
/// At most one fetch is ever issued per URL.
pub struct AssetCache {
    fetcher: Box<dyn AssetFetcher>,
    entries: FxHashMap<String, Entry>,
    video_timeout: Duration,
    fetch_count: usize,
}

impl AssetCache {
    pub fn new(fetcher: Box<dyn AssetFetcher>, video_timeout: Duration) -> Self {
        Self {
            fetcher,
            entries: FxHashMap::default(),
            video_timeout,
            fetch_count: 0,
        }
    }

    pub fn preload_image(&mut self, url: &str) -> AssetStatus {
        self.preload(url, AssetKind::Image, Priority::Critical)
    }

    pub fn preload_video(&mut self, url: &str) -> AssetStatus {
        self.preload(url, AssetKind::Video, Priority::Critical)
    }

    pub fn preload(&mut self, url: &str, kind: AssetKind, priority: Priority) -> AssetStatus {
        let url = url.trim();
        if url.is_empty() {
            return AssetStatus::Unavailable;
        }

        if let Some(entry) = self.entries.get_mut(url) {
            if let Entry::Pending { priority: p, .. } = entry {
                if priority == Priority::Critical && *p == Priority::Background {
                    *p = Priority::Critical;
                    self.fetcher.prioritize(url);
                }
            }
            return entry.status();
        }

        self.entries.insert(url.to_string(), Entry::Pending { kind, priority, waited: Duration::ZERO });
        self.fetch_count += 1;
        self.fetcher.request(url, kind, priority);
        AssetStatus::Pending
    }

    /// Requests current and next slide as critical, everything else in the background.
    pub fn preload_slide(&mut self, catalog: &Catalog, index: usize) -> PreloadBatch {
        let mut critical = Vec::new();
        for i in [index, index + 1] {
            let Some(slide) = catalog.get(i) else { continue };
            for (url, kind) in slide.visual_assets() {
                self.preload(&url, kind, Priority::Critical);
                if !critical.contains(&url) {
                    critical.push(url);
                }
            }
        }

        for (i, slide) in catalog.slides().iter().enumerate() {
            if i == index || i == index + 1 {
                continue;
            }
            for (url, kind) in slide.visual_assets() {
                self.preload(&url, kind, Priority::Background);
            }
        }

        log::debug!("Preload for slide {}: {} critical assets", index, critical.len());
        PreloadBatch { slide: index, critical }
    }

    pub fn status(&self, url: &str) -> AssetStatus {
        match self.entries.get(url.trim()) {
            Some(entry) => entry.status(),
            None => AssetStatus::Unavailable,
        }
    }

    pub fn is_known(&self, url: &str) -> bool {
        self.entries.contains_key(url.trim())
    }

    pub fn get_ready_image(&self, url: &str) -> Option<ImageHandle> {
        match self.entries.get(url.trim()) {
            Some(Entry::Image(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn get_ready_video(&self, url: &str) -> Option<VideoHandle> {
        match self.entries.get(url.trim()) {
            Some(Entry::Video(handle)) => Some(handle.clone()),
            _ => None,
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn update(&mut self, dt: Duration) {
        for result in self.fetcher.poll() {
            self.settle(result);
        }

        let timeout = self.video_timeout;
        for (url, entry) in self.entries.iter_mut() {
            let Entry::Pending { kind: AssetKind::Video, waited, .. } = entry else { continue };
            *waited += dt;
            if *waited >= timeout {
                let waited = *waited;
                log::warn!("{}, showing it anyway", AssetError::Timeout { url: url.clone(), waited });
                *entry = Entry::Video(VideoElement::new(url.clone(), VideoInfo::default(), false).into_handle());
            }
        }
    }

    fn settle(&mut self, result: FetchResult) {
        let FetchResult { url, outcome } = result;
        let Some(entry) = self.entries.get_mut(&url) else {
            log::debug!("Dropping result for unrequested asset {}", url);
            return;
        };

        let pending = match entry {
            Entry::Pending { priority, .. } => Some(*priority),
            _ => None,
        };

        match (pending, outcome) {
            (Some(_), Ok(Fetched::Image(handle))) => {
                log::debug!("Image ready: {} ({}x{})", url, handle.width, handle.height);
                *entry = Entry::Image(handle);
            }
            (Some(_), Ok(Fetched::Video(info))) => {
                log::debug!("Video ready: {}", url);
                *entry = Entry::Video(VideoElement::new(url, info, true).into_handle());
            }
            (Some(priority), Err(e)) => {
                match priority {
                    Priority::Critical => log::warn!("Missing asset: {}", e),
                    Priority::Background => log::debug!("Background prefetch failed: {}", e),
                }
                *entry = Entry::Unavailable;
            }
            (None, Ok(Fetched::Video(info))) => {
                // Arrived after the readiness timeout already released it.
                if let Entry::Video(handle) = entry {
                    handle.borrow_mut().mark_buffered(info);
                }
            }
            _ => log::debug!("Ignoring late result for {}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::fetch::ManualFetcher;

    #[test]
    fn empty_url_settles_without_fetch() {
        let fetcher = ManualFetcher::new();
        let mut cache = AssetCache::new(Box::new(fetcher.clone()), Duration::from_secs(3));
        assert_eq!(cache.preload_image("  "), AssetStatus::Unavailable);
        assert!(fetcher.requests().is_empty());
        assert_eq!(cache.fetch_count(), 0);
    }

    #[test]
    fn critical_request_promotes_queued_background_fetch() {
        let fetcher = ManualFetcher::new();
        let mut cache = AssetCache::new(Box::new(fetcher.clone()), Duration::from_secs(3));
        cache.preload("/later.png", AssetKind::Image, Priority::Background);
        assert_eq!(fetcher.priority_of("/later.png"), Some(Priority::Background));

        cache.preload_image("/later.png");
        cache.preload_image("/later.png");
        assert_eq!(fetcher.prioritized(), vec!["/later.png".to_string()]);
        assert_eq!(fetcher.request_count("/later.png"), 1);
    }

    #[test]
    fn late_video_result_marks_timed_out_element_buffered() {
        let fetcher = ManualFetcher::new();
        let mut cache = AssetCache::new(Box::new(fetcher.clone()), Duration::from_millis(100));
        cache.preload_video("/v.mp4");
        cache.update(Duration::from_millis(100));

        let handle = cache.get_ready_video("/v.mp4").unwrap();
        assert!(!handle.borrow().is_buffered());

        fetcher.complete_video("/v.mp4", VideoInfo { byte_len: 9, duration: None });
        cache.update(Duration::ZERO);
        assert!(handle.borrow().is_buffered());
    }
}
