mod setup;
mod config_gen;
#[cfg(feature = "audio")]
mod audio;

use std::thread;
use std::time::Duration;
use anyhow::Context;
use storybook_core::assets::{AssetCache, FsFetcher};
use storybook_core::config::CoreConfig;
use storybook_core::renderer::Renderer;
use storybook_core::{AssetIndex, Catalog, InputEvent, OutputEvent, Player, TerminalRenderer};

#[cfg(feature = "audio")]
type Track = audio::KiraTrack;
#[cfg(not(feature = "audio"))]
type Track = storybook_core::SilentTrack;

const FRAME: Duration = Duration::from_millis(16);
/// Time that passes when the user just presses enter.
const IDLE_STEP: Duration = Duration::from_millis(500);

fn main() {
    setup::init();
    log::info!(">>> Storybook Desktop Launcher Started <<<");

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cfg = CoreConfig::from_global();
    log::info!("Loading story from config: {}", cfg.system.catalog_path);

    let catalog = Catalog::load(&cfg.system.catalog_path)
        .with_context(|| format!("Story '{}' could not be loaded. Please check config.toml.", cfg.system.catalog_path))?;

    let index = AssetIndex::scan(&cfg.system.assets_path);
    for url in index.missing(&catalog) {
        log::warn!("Missing asset: {}", url);
    }

    let fetcher = FsFetcher::new(&cfg.system.assets_path, cfg.engine.loader_threads)?;
    let cache = AssetCache::new(Box::new(fetcher), cfg.engine.video_ready_timeout());
    let track = make_track(&cfg)?;
    let mut player = Player::new(catalog, cache, track, cfg);
    let mut renderer = TerminalRenderer;

    println!("Commands: s(tart) n(ext) p(rev) g N t(ap) h ID @ X Y a(udio) r(eset) size W H exit");
    loop {
        wait_until_loaded(&mut player);

        let events = player.drain();
        play_effects(&mut player, &events);

        match renderer.render(&player.layers(), &events) {
            Some(InputEvent::Exit) => {
                player.feed(InputEvent::Exit);
                break;
            }
            Some(event) => {
                player.feed(event);
                player.update(FRAME);
            }
            None => advance(&mut player, IDLE_STEP),
        }
    }

    log::info!("Bye");
    Ok(())
}

#[cfg(feature = "audio")]
fn make_track(cfg: &CoreConfig) -> anyhow::Result<Track> {
    audio::KiraTrack::new(&cfg.system.assets_path)
}

#[cfg(not(feature = "audio"))]
fn make_track(_cfg: &CoreConfig) -> anyhow::Result<Track> {
    log::info!("Built without the audio feature, sound is only logged");
    Ok(Track::new())
}

/// Decoding runs on worker threads, so real time has to pass here.
fn wait_until_loaded(player: &mut Player<Track>) {
    let mut frames = 0u32;
    while player.layers().is_loading() && frames < 1_000 {
        thread::sleep(FRAME);
        player.update(FRAME);
        frames += 1;
    }
    // One more frame to land the fade-in.
    player.update(FRAME);
}

fn advance(player: &mut Player<Track>, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        player.update(FRAME);
        elapsed += FRAME;
    }
}

#[cfg(feature = "audio")]
fn play_effects(player: &mut Player<Track>, events: &[OutputEvent]) {
    for event in events {
        if let OutputEvent::PlaySound { url, volume } = event {
            player.track_mut().play_effect(url, *volume);
        }
    }
}

#[cfg(not(feature = "audio"))]
fn play_effects(_player: &mut Player<Track>, events: &[OutputEvent]) {
    for event in events {
        if let OutputEvent::PlaySound { url, .. } = event {
            log::debug!("Sound effect (muted build): {}", url);
        }
    }
}
