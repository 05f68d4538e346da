mod common;

use std::fs;
use std::time::Duration;

use storybook_core::catalog::{AssetKind, Background, Interaction};
use storybook_core::{AssetIndex, Catalog};

#[test]
fn test_sample_story_parses() {
    let catalog = common::story();
    assert_eq!(catalog.len(), 6);

    let forest = catalog.get(0).unwrap();
    assert_eq!(forest.title, "Forest");
    assert_eq!(forest.hotspots.len(), 3);
    assert_eq!(forest.audio_track.as_deref(), Some("/audio/forest.mp3"));

    let lamp = forest.hotspot("lamp").unwrap();
    assert_eq!(lamp.interactions, vec![
        Interaction::Sound { url: "/audio/ding.mp3".into() },
        Interaction::Replace { url: "/images/s1/lamp_on.png".into(), duration: Some(Duration::from_millis(2000)) },
    ]);
    assert_eq!(lamp.z(), 10);
    assert!(forest.hotspot("roots").unwrap().is_behind_background());
}

#[test]
fn test_video_backgrounds_are_tagged() {
    let catalog = common::story();
    let river = catalog.get(1).unwrap();
    assert_eq!(river.background, Background::Video("/images/s2/river.mp4".into()));
    assert_eq!(river.sizing_image(), Some("/images/s2/base.png"));

    let sky = catalog.get(4).unwrap();
    assert!(sky.background.is_video());
    assert!(sky.background_bottom);
    assert_eq!(sky.aspect_hint(), Some(720));

    let visuals = river.visual_assets();
    assert_eq!(visuals[0], ("/images/s2/river.mp4".to_string(), AssetKind::Video));
    assert!(visuals.iter().skip(1).all(|(_, k)| *k == AssetKind::Image));
}

#[test]
fn test_malformed_interactions_are_skipped() {
    let json = r#"[{
        "id": 1, "backgroundImage": "/bg.png",
        "objects": [{
            "id": 7, "gifUrl": "/o.png",
            "position": {"x": 0.2, "y": 1.4}, "size": {"width": 0.1, "height": 0.1},
            "interaction": [
                {"type": "sound", "data": {}},
                {"type": "teleport", "data": {"to": 3}},
                {"type": "link", "data": {"href": " https://example.org "}}
            ]
        }]
    }]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    let hotspot = &catalog.get(0).unwrap().hotspots[0];

    assert_eq!(hotspot.id, "7");
    assert_eq!(hotspot.position.y, 1.0);
    assert_eq!(hotspot.interactions, vec![
        Interaction::Link { url: "https://example.org".into(), target: None },
    ]);
}

#[test]
fn test_interaction_without_type_or_not_an_object_is_skipped() {
    let json = r#"[{
        "id": 1, "backgroundImage": "/bg.png",
        "objects": [{
            "id": "door", "gifUrl": "/door.png",
            "position": {"x": 0.1, "y": 0.1}, "size": {"width": 0.2, "height": 0.2},
            "interaction": [
                {"data": {"soundUrl": "/knock.mp3"}},
                "sound",
                42,
                {"type": "link", "data": {"url": "https://example.org/door"}}
            ]
        }]
    }]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().hotspots[0].interactions, vec![
        Interaction::Link { url: "https://example.org/door".into(), target: None },
    ]);

    // A lone malformed interaction leaves the hotspot without any.
    let json = r#"[{
        "id": 1, "backgroundImage": "/bg.png",
        "objects": [{
            "id": "door", "gifUrl": "/door.png",
            "position": {"x": 0.1, "y": 0.1}, "size": {"width": 0.2, "height": 0.2},
            "interaction": {"data": {}}
        }]
    }]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert!(catalog.get(0).unwrap().hotspots[0].interactions.is_empty());
}

#[test]
fn test_structurally_broken_slide_only_rejects_itself() {
    let json = r#"{"slides": [
        {"id": 1, "backgroundImage": "/one.png",
         "objects": [{"id": "a", "gifUrl": "/a.png", "size": {"width": 0.1, "height": 0.1}}]},
        {"id": "two", "backgroundImage": "/two.png"},
        {"id": 3, "backgroundImage": "/three.png"},
        "not a slide"
    ]}"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().id, 3);

    let only_broken = r#"[{"id": 1, "backgroundImage": "/one.png", "objects": [{"id": "a"}]}]"#;
    assert!(Catalog::from_json_str(only_broken).is_err());
}

#[test]
fn test_toml_broken_slide_only_rejects_itself() {
    let toml = r#"
[[slides]]
id = 1
backgroundImage = "/one.png"

[[slides.objects]]
id = "star"
gifUrl = "/star.png"
size = { width = 0.1, height = 0.1 }

[[slides]]
id = 2
backgroundImage = "/two.png"
"#;
    let catalog = Catalog::from_toml_str(toml).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().id, 2);
}

#[test]
fn test_urls_are_trimmed_and_blank_optionals_dropped() {
    let json = r#"{"slides": [{
        "id": 1, "backgroundImage": "  /bg.webm ", "baseLayer": "  ", "clickSound": " /c.mp3"
    }]}"#;
    let slide = Catalog::from_json_str(json).unwrap().get(0).cloned().unwrap();
    assert_eq!(slide.background, Background::Video("/bg.webm".into()));
    assert_eq!(slide.base_layer, None);
    assert_eq!(slide.click_sound.as_deref(), Some("/c.mp3"));
}

#[test]
fn test_bad_slides_are_rejected_and_empty_catalog_fails() {
    let json = r#"[
        {"id": 1, "backgroundImage": ""},
        {"id": 2, "backgroundImage": "/two.png"},
        {"id": 2, "backgroundImage": "/dup.png"}
    ]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().background.url(), "/two.png");

    assert!(Catalog::from_json_str(r#"[{"id": 1, "backgroundImage": " "}]"#).is_err());
    assert!(Catalog::from_json_str("[]").is_err());
    assert!(Catalog::from_json_str("{ nope").is_err());
}

#[test]
fn test_toml_story() {
    let toml = r#"
[[slides]]
id = 1
title = "One"
backgroundImage = "/one.png"
backgroundSequence = ["/f0.png", "/f1.png"]
sequenceInterval = 250

[[slides.objects]]
id = "star"
gifUrl = "/star.png"
position = { x = 0.5, y = 0.5 }
size = { width = 0.1, height = 0.1 }
interaction = { type = "replace", data = { url = "/star_on.png" } }
"#;
    let catalog = Catalog::from_toml_str(toml).unwrap();
    let slide = catalog.get(0).unwrap();
    let seq = slide.sequence.as_ref().unwrap();
    assert_eq!(seq.frames.len(), 2);
    assert_eq!(seq.interval, Some(Duration::from_millis(250)));
    assert_eq!(slide.hotspots[0].interactions, vec![
        Interaction::Replace { url: "/star_on.png".into(), duration: None },
    ]);
}

#[test]
fn test_load_from_file_and_index_missing_assets() {
    let dir = tempfile::tempdir().unwrap();
    let story = dir.path().join("story.json");
    fs::write(&story, common::STORY).unwrap();

    let assets = dir.path().join("assets");
    fs::create_dir_all(assets.join("images/s1")).unwrap();
    fs::write(assets.join("images/s1/bg.png"), b"png").unwrap();
    fs::write(assets.join("images/s1/lamp.png"), b"png").unwrap();

    let catalog = Catalog::load(&story).unwrap();
    let index = AssetIndex::scan(&assets);

    assert_eq!(index.len(), 2);
    assert!(index.contains("/images/s1/bg.png"));
    let missing = index.missing(&catalog);
    assert!(missing.contains(&"/images/s1/sign.png".to_string()));
    assert!(!missing.contains(&"/images/s1/bg.png".to_string()));
}
