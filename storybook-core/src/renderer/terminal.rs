use std::io::{stdin, stdout, BufRead, Write};

use crate::engine::{BackgroundFrame, Layer, LayerStack};
use crate::event::{InputEvent, OutputEvent};
use crate::renderer::Renderer;

pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &LayerStack, events: &[OutputEvent]) -> Option<InputEvent> {
        for ev in events {
            println!("{}", describe_event(ev));
        }
        print_frame(frame);
        self.wait_command()
    }
}

impl TerminalRenderer {
    /// Blank input lets time pass; io errors end the session.
    fn wait_command(&mut self) -> Option<InputEvent> {
        let stdin = stdin();
        loop {
            print!("> ");
            if stdout().flush().is_err() {
                return Some(InputEvent::Exit);
            }
            let mut buf = String::new();
            match stdin.lock().read_line(&mut buf) {
                Ok(0) | Err(_) => return Some(InputEvent::Exit),
                Ok(_) => {}
            }
            match parse_command(&buf) {
                Ok(cmd) => return cmd,
                Err(msg) => println!("invalid: {}", msg),
            }
        }
    }
}

fn print_frame(frame: &LayerStack) {
    println!("--- [{}] {} ---", frame.slide + 1, frame.title);
    if frame.is_loading() {
        println!("  (loading)");
    }
    for layer in &frame.layers {
        match layer {
            Layer::Ambient { url } => println!("  ambient   {}", url),
            Layer::Base { url } => println!("  base      {}", url),
            Layer::MainBackground { frame: bg, effect } => {
                let effect = effect.as_deref().unwrap_or("-");
                match bg {
                    BackgroundFrame::Image { url } => println!("  main      {} effect:{}", url, effect),
                    BackgroundFrame::Video { url, playing, rate, position } => println!(
                        "  main      {} {} x{} @{:.1}s",
                        url, if *playing { "playing" } else { "paused" }, rate, position.as_secs_f32()
                    ),
                    BackgroundFrame::Blank => println!("  main      (blank)"),
                }
            }
            Layer::SequenceFrame { url, index } => println!("  sequence  #{} {}", index, url),
            Layer::BehindHotspots(views) | Layer::FrontHotspots(views) => {
                for v in views {
                    println!(
                        "  {:<9} {:<12} z:{:<3} ({:.2},{:.2} {:.2}x{:.2}) {}{}",
                        layer.name(), v.id, v.z_index, v.rect.x, v.rect.y, v.rect.w, v.rect.h, v.image,
                        if v.interacted { " *" } else { "" }
                    );
                }
            }
            Layer::Navigation(nav) => {
                let mut parts = Vec::new();
                if nav.show_prev { parts.push("[p]rev"); }
                if nav.show_next { parts.push("[n]ext"); }
                if nav.show_audio_toggle {
                    parts.push(if nav.audio_on { "[a]udio on" } else { "[a]udio off" });
                }
                println!("  nav       {}", parts.join("  "));
            }
        }
    }
}

fn describe_event(ev: &OutputEvent) -> String {
    match ev {
        OutputEvent::PlaySound { url, volume } => format!("[Sound] {} volume:{}", url, volume),
        OutputEvent::OpenUrl { url, target } => format!("[Open] {} target:{}", url, target.as_deref().unwrap_or("_blank")),
        OutputEvent::Download { url, filename } => format!("[Download] {} as {}", url, filename.as_deref().unwrap_or("-")),
        OutputEvent::SlideChanged { index } => format!("[Slide] {}", index + 1),
        OutputEvent::AudioBlocked => "[Audio] playback blocked".to_string(),
    }
}

/// Parses one line of terminal input. `Ok(None)` means "advance time".
pub fn parse_command(line: &str) -> Result<Option<InputEvent>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else { return Ok(None) };
    let args: Vec<&str> = parts.collect();

    let event = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("n" | "next", []) => InputEvent::Next,
        ("p" | "prev", []) => InputEvent::Prev,
        ("g" | "goto", [n]) => {
            let n: usize = n.parse().map_err(|_| format!("bad slide number '{}'", n))?;
            // One-based on the terminal.
            if n == 0 {
                return Err(format!("bad slide number '{}'", n));
            }
            InputEvent::GoTo { index: n - 1 }
        }
        ("t" | "tap", []) => InputEvent::TapBackground,
        ("h" | "hit", [id]) => InputEvent::TapHotspot { id: id.to_string() },
        ("@", [x, y]) => {
            let x: f32 = x.parse().map_err(|_| format!("bad coordinate '{}'", x))?;
            let y: f32 = y.parse().map_err(|_| format!("bad coordinate '{}'", y))?;
            InputEvent::TapAt { x, y }
        }
        ("a" | "audio", []) => InputEvent::ToggleAudio,
        ("s" | "start", []) => InputEvent::Start,
        ("r" | "reset", []) => InputEvent::Reset,
        ("size", [w, h]) => {
            let width: u32 = w.parse().map_err(|_| format!("bad width '{}'", w))?;
            let height: u32 = h.parse().map_err(|_| format!("bad height '{}'", h))?;
            InputEvent::Resize { width, height }
        }
        ("q" | "exit", []) => InputEvent::Exit,
        (other, _) => return Err(format!("unknown command '{}'", other)),
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_advances_time() {
        assert_eq!(parse_command("  \n"), Ok(None));
    }

    #[test]
    fn goto_is_one_based() {
        assert_eq!(parse_command("g 3"), Ok(Some(InputEvent::GoTo { index: 2 })));
        assert!(parse_command("g x").is_err());
        assert_eq!(parse_command("g 0"), Err("bad slide number '0'".to_string()));
        assert_eq!(parse_command("goto 1"), Ok(Some(InputEvent::GoTo { index: 0 })));
    }

    #[test]
    fn tap_at_coordinates() {
        assert_eq!(parse_command("@ 0.5 0.25"), Ok(Some(InputEvent::TapAt { x: 0.5, y: 0.25 })));
    }

    #[test]
    fn hotspot_and_unknown() {
        assert_eq!(parse_command("h lamp"), Ok(Some(InputEvent::TapHotspot { id: "lamp".into() })));
        assert!(parse_command("jump").is_err());
        assert!(parse_command("n 2").is_err());
    }
}
