use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use env_logger::{Builder, Target};
use storybook_core::config::SystemConfig;

use crate::config_gen;

pub const CONFIG_PATH: &str = "config.toml";

pub fn init() {
    config_gen::ensure_config_exists(CONFIG_PATH);

    if let Err(e) = storybook_shared::config::init(CONFIG_PATH) {
        eprintln!("Config load warning: {}", e);
    }

    init_logger();
}

fn init_logger() {
    let sys_cfg: SystemConfig = storybook_shared::config::get("system");
    if let Err(e) = fs::create_dir_all(&sys_cfg.log_path) {
        eprintln!("Failed to create log dir: {}", e);
    }

    let log_file_path = std::path::Path::new(&sys_cfg.log_path).join("storybook.log");

    struct TeeWriter<W1, W2>(W1, W2);
    impl<W1: Write, W2: Write> Write for TeeWriter<W1, W2> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = self.0.write(buf)?;
            self.1.write_all(&buf[..n])?;
            Ok(n)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.0.flush()?;
            self.1.flush()?;
            Ok(())
        }
    }

    let mut builder = Builder::from_env(env_logger::Env::default().default_filter_or(&sys_cfg.log_level));
    // The terminal is the UI; without a log file, logs go to stderr only.
    match OpenOptions::new().create(true).append(true).open(&log_file_path) {
        Ok(log_file) => {
            builder.target(Target::Pipe(Box::new(TeeWriter(std::io::stderr(), log_file))));
        }
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_file_path, e);
            builder.target(Target::Stderr);
        }
    }

    builder.init();
}
