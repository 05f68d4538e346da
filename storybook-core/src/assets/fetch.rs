use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use rustc_hash::FxHashMap;

use crate::assets::cache::Priority;
use crate::assets::media::{ImageHandle, VideoInfo};
use crate::catalog::AssetKind;
use crate::error::AssetError;

#[derive(Debug)]
pub enum Fetched {
    Image(ImageHandle),
    Video(VideoInfo),
}

#[derive(Debug)]
pub struct FetchResult {
    pub url: String,
    pub outcome: Result<Fetched, AssetError>,
}

/// Source of media bytes. `request` starts work; results surface through `poll`.
pub trait AssetFetcher {
    fn request(&mut self, url: &str, kind: AssetKind, priority: Priority);
    fn poll(&mut self) -> Vec<FetchResult>;
    /// A queued background request became critical.
    fn prioritize(&mut self, _url: &str) {}
}

/// Runs one load, turning a panic inside it into a decode failure.
fn load_guarded(url: String, load: impl FnOnce(&str) -> Result<Fetched, AssetError>) -> FetchResult {
    let outcome = match catch_unwind(AssertUnwindSafe(|| load(&url))) {
        Ok(outcome) => outcome,
        Err(_) => Err(AssetError::Decode { url: url.clone(), msg: "loader panicked".to_string() }),
    };
    FetchResult { url, outcome }
}

/// Reads assets below a root directory on a bounded worker pool.
///
/// Critical requests go to the pool at once. Background requests wait in a local
/// queue until no critical load is in flight.
pub struct FsFetcher {
    root: PathBuf,
    pool: rayon::ThreadPool,
    tx: Sender<FetchResult>,
    rx: Receiver<FetchResult>,
    in_flight: FxHashMap<String, Priority>,
    background: VecDeque<(String, AssetKind)>,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>, threads: usize) -> anyhow::Result<Self> {
        if threads == 0 {
            anyhow::bail!("asset loader 'loader_threads' must be >= 1");
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("asset-loader-{}", i))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build asset loader pool: {e}"))?;

        let (tx, rx) = mpsc::channel();
        Ok(Self {
            root: root.into(),
            pool,
            tx,
            rx,
            in_flight: FxHashMap::default(),
            background: VecDeque::new(),
        })
    }

    pub fn resolve(root: &Path, url: &str) -> PathBuf {
        root.join(url.trim().trim_start_matches('/'))
    }

    /// Background requests not yet handed to the pool.
    pub fn queued_background(&self) -> usize {
        self.background.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn load_image(path: &Path, url: &str) -> Result<Fetched, AssetError> {
        let bytes = fs::read(path).map_err(|source| AssetError::Io { url: url.to_string(), source })?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| AssetError::Decode {
            url: url.to_string(),
            msg: e.to_string(),
        })?;
        Ok(Fetched::Image(ImageHandle::from_rgba(url, decoded.to_rgba8())))
    }

    fn load_video(path: &Path, url: &str) -> Result<Fetched, AssetError> {
        let meta = fs::metadata(path).map_err(|source| AssetError::Io { url: url.to_string(), source })?;
        if meta.len() == 0 {
            return Err(AssetError::Empty { url: url.to_string() });
        }
        Ok(Fetched::Video(VideoInfo { byte_len: meta.len(), duration: None }))
    }

    fn dispatch(&mut self, url: String, kind: AssetKind, priority: Priority) {
        let path = Self::resolve(&self.root, &url);
        let tx = self.tx.clone();
        log::debug!("Fetching asset: {} -> {:?}", url, path);
        self.in_flight.insert(url.clone(), priority);

        self.pool.spawn_fifo(move || {
            let result = load_guarded(url, |url| match kind {
                AssetKind::Image => Self::load_image(&path, url),
                AssetKind::Video => Self::load_video(&path, url),
            });
            // Receiver gone means the cache was dropped; nothing to report to.
            let _ = tx.send(result);
        });
    }

    fn critical_in_flight(&self) -> bool {
        self.in_flight.values().any(|p| *p == Priority::Critical)
    }
}

impl AssetFetcher for FsFetcher {
    fn request(&mut self, url: &str, kind: AssetKind, priority: Priority) {
        match priority {
            Priority::Critical => self.dispatch(url.to_string(), kind, priority),
            Priority::Background => self.background.push_back((url.to_string(), kind)),
        }
    }

    fn prioritize(&mut self, url: &str) {
        if let Some(pos) = self.background.iter().position(|(u, _)| u == url) {
            if let Some((url, kind)) = self.background.remove(pos) {
                self.dispatch(url, kind, Priority::Critical);
            }
        } else if let Some(p) = self.in_flight.get_mut(url) {
            *p = Priority::Critical;
        }
    }

    fn poll(&mut self) -> Vec<FetchResult> {
        let results: Vec<FetchResult> = self.rx.try_iter().collect();
        for result in &results {
            self.in_flight.remove(&result.url);
        }

        if !self.critical_in_flight() {
            while let Some((url, kind)) = self.background.pop_front() {
                self.dispatch(url, kind, Priority::Background);
            }
        }
        results
    }
}

#[derive(Default)]
struct ManualState {
    requests: Vec<(String, AssetKind)>,
    priorities: Vec<(String, Priority)>,
    prioritized: Vec<String>,
    answered: Vec<String>,
    completed: Vec<FetchResult>,
}

/// Scripted fetcher: records requests, delivers whatever outcome it is told to.
/// Clones share state, so a copy kept outside the cache can drive it.
#[derive(Clone, Default)]
pub struct ManualFetcher {
    state: Rc<RefCell<ManualState>>,
}

impl ManualFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<(String, AssetKind)> {
        self.state.borrow().requests.clone()
    }

    /// Priority the request for `url` was first issued with.
    pub fn priority_of(&self, url: &str) -> Option<Priority> {
        self.state.borrow().priorities.iter().find(|(u, _)| u == url).map(|(_, p)| *p)
    }

    /// URLs promoted to critical after their request was issued.
    pub fn prioritized(&self) -> Vec<String> {
        self.state.borrow().prioritized.clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.state.borrow().requests.iter().filter(|(u, _)| u == url).count()
    }

    pub fn complete_image(&self, url: &str, width: u32, height: u32) {
        self.push(url, Ok(Fetched::Image(ImageHandle::new(url, width, height))));
    }

    pub fn complete_video(&self, url: &str, info: VideoInfo) {
        self.push(url, Ok(Fetched::Video(info)));
    }

    pub fn fail(&self, url: &str) {
        self.push(url, Err(AssetError::Empty { url: url.to_string() }));
    }

    /// Resolves every outstanding request: images as `width`x`height`, videos as buffered.
    pub fn complete_all(&self, width: u32, height: u32) {
        let pending: Vec<_> = {
            let state = self.state.borrow();
            state.requests.iter()
                .filter(|(u, _)| !state.answered.contains(u))
                .cloned()
                .collect()
        };
        for (url, kind) in pending {
            match kind {
                AssetKind::Image => self.complete_image(&url, width, height),
                AssetKind::Video => self.complete_video(&url, VideoInfo { byte_len: 1, duration: None }),
            }
        }
    }

    fn push(&self, url: &str, outcome: Result<Fetched, AssetError>) {
        let mut state = self.state.borrow_mut();
        state.answered.push(url.to_string());
        state.completed.push(FetchResult { url: url.to_string(), outcome });
    }
}

impl AssetFetcher for ManualFetcher {
    fn request(&mut self, url: &str, kind: AssetKind, priority: Priority) {
        let mut state = self.state.borrow_mut();
        state.requests.push((url.to_string(), kind));
        state.priorities.push((url.to_string(), priority));
    }

    fn prioritize(&mut self, url: &str) {
        self.state.borrow_mut().prioritized.push(url.to_string());
    }

    fn poll(&mut self) -> Vec<FetchResult> {
        self.state.borrow_mut().completed.drain(..).collect()
    }
}
