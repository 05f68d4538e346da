#![allow(dead_code)]

use std::time::Duration;

use storybook_core::audio::SilentTrack;
use storybook_core::{AssetCache, Catalog, CoreConfig, ManualFetcher, Player};

pub const FRAME: Duration = Duration::from_millis(16);

pub const STORY: &str = r#"
[
  {
    "id": 1,
    "title": "Forest",
    "backgroundImage": "/images/s1/bg.png",
    "audioTrack": "/audio/forest.mp3",
    "clickSound": "/audio/click.mp3",
    "objects": [
      {
        "id": "lamp",
        "gifUrl": "/images/s1/lamp.png",
        "position": { "x": 0.1, "y": 0.1 },
        "size": { "width": 0.2, "height": 0.2 },
        "interaction": [
          { "type": "sound", "data": { "soundUrl": "/audio/ding.mp3" } },
          { "type": "replace", "data": { "replacementGif": "/images/s1/lamp_on.png", "duration": 2000 } }
        ]
      },
      {
        "id": "sign",
        "gifUrl": "/images/s1/sign.png",
        "position": { "x": 0.15, "y": 0.15 },
        "size": { "width": 0.1, "height": 0.1 },
        "zIndex": 12,
        "interaction": { "type": "link", "data": { "url": "https://example.org/forest", "target": "_blank" } }
      },
      {
        "id": "roots",
        "gifUrl": "/images/s1/roots.png",
        "position": { "x": 0.0, "y": 0.8 },
        "size": { "width": 1.0, "height": 0.2 },
        "mobilePosition": { "x": 0.0, "y": 0.7 },
        "zIndex": 2
      }
    ]
  },
  {
    "id": 2,
    "title": "River",
    "backgroundImage": "/images/s2/river.mp4",
    "baseLayer": "/images/s2/base.png",
    "toggleBaseLayer": "/images/s2/base_alt.png",
    "objects": [
      {
        "id": "fish",
        "gifUrl": "/images/s2/fish.png",
        "activeGifUrl": "/images/s2/fish_jump.png",
        "position": { "x": 0.5, "y": 0.5 },
        "size": { "width": 0.1, "height": 0.1 },
        "centered": true
      }
    ]
  },
  {
    "id": 3,
    "title": "Night",
    "backgroundImage": "/images/s3/night.png",
    "backgroundSequence": ["/images/s3/f0.png", "/images/s3/f1.png", "/images/s3/f2.png"],
    "sequenceSound": "/audio/tick.mp3",
    "audioTrack": "/audio/night.mp3"
  },
  {
    "id": 4,
    "title": "Dance",
    "backgroundImage": "/images/s4/hall.png",
    "objects": [
      {
        "id": "dancer",
        "gifUrl": "/images/s4/dancer.png",
        "activeGifUrl": "/images/s4/dancer_spin.png",
        "position": { "x": 0.4, "y": 0.4 },
        "size": { "width": 0.2, "height": 0.3 },
        "customClass": "dance",
        "noHover": true
      }
    ]
  },
  {
    "id": 5,
    "title": "Sky",
    "backgroundImage": "/images/s5/sky.mp4",
    "baseLayer": "/images/s5/clouds.png",
    "isBackgroundBottom": true,
    "backgroundHeight": 720
  },
  {
    "id": 6,
    "title": "The End",
    "backgroundImage": "/images/s6/end.png",
    "objects": [
      {
        "id": "book",
        "gifUrl": "/images/s6/book.png",
        "position": { "x": 0.3, "y": 0.3 },
        "size": { "width": 0.2, "height": 0.2 },
        "interaction": { "type": "download", "data": { "url": "/files/story.pdf", "filename": "story.pdf" } }
      }
    ]
  }
]
"#;

pub fn story() -> Catalog {
    Catalog::from_json_str(STORY).unwrap_or_else(|e| panic!("fixture failed to parse: {e:#}"))
}

pub fn cache() -> (AssetCache, ManualFetcher) {
    let fetcher = ManualFetcher::new();
    let cache = AssetCache::new(Box::new(fetcher.clone()), Duration::from_secs(3));
    (cache, fetcher)
}

pub fn player() -> (Player<SilentTrack>, ManualFetcher) {
    let (cache, fetcher) = cache();
    (Player::new(story(), cache, SilentTrack::new(), CoreConfig::default()), fetcher)
}

/// Resolves every request and pumps until the current slide has faded in.
pub fn settle(player: &mut Player<SilentTrack>, fetcher: &ManualFetcher) {
    fetcher.complete_all(800, 600);
    for _ in 0..3 {
        player.update(FRAME);
    }
}
