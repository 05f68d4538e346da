use std::fs;
use std::path::Path;
use storybook_core::config::CoreConfig;

/// Writes a `config.toml` holding every default, so users have something to edit.
pub fn ensure_config_exists(path: &str) {
    if Path::new(path).exists() {
        return;
    }

    println!("Creating default configuration at '{}'...", path);

    let toml_str = match toml::to_string_pretty(&CoreConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to serialize default config: {}", e);
            return;
        }
    };

    if let Err(e) = fs::write(path, toml_str) {
        eprintln!("Failed to write config file: {}", e);
    } else {
        println!("Config file created successfully.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_sections() {
        let text = toml::to_string_pretty(&CoreConfig::default()).unwrap();
        let table: toml::Table = toml::from_str(&text).unwrap();
        assert!(table.contains_key("system"));
        assert!(table.contains_key("engine"));
        assert!(table.contains_key("audio"));

        let back: CoreConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.engine.sequence_interval_ms, 500);
        assert_eq!(back.audio.fade_steps, 20);
    }
}
