use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::traits::PlayerBackend;
use crate::error::{Error, Result};
use crate::gui::Geometry;

/// VLC backend. Spawns `vlc` with the rc (remote control) interface and
/// drives it over the child's stdin. A reader thread turns the asynchronous
/// `get_time` replies on stdout into a shared position cache, so nothing on
/// the tick path ever blocks on the pipe.
pub struct VlcPlayer {
    extra_args: Option<String>,
    process: Option<Child>,
    stdin: Option<ChildStdin>,
    position_secs: Arc<AtomicU64>,
}

impl VlcPlayer {
    pub fn new(extra_args: Option<String>) -> Self {
        Self {
            extra_args,
            process: None,
            stdin: None,
            position_secs: Arc::new(AtomicU64::new(0)),
        }
    }

    fn command_args(&self, geometry: &Geometry) -> Vec<String> {
        let mut args = vec![
            "--intf".to_string(),
            "rc".to_string(),
            "--quiet".to_string(),
        ];
        if geometry.fullscreen {
            args.push("--fullscreen".to_string());
        } else {
            args.push(format!("--width={}", geometry.width));
            args.push(format!("--height={}", geometry.height));
        }
        if let Some(extra) = &self.extra_args {
            args.extend(extra.split_whitespace().map(str::to_string));
        }
        args
    }

    fn send(&mut self, command: &str) -> Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(Error::ipc("vlc is not attached"));
        };
        writeln!(stdin, "{}", command)?;
        stdin.flush()?;
        Ok(())
    }
}

impl PlayerBackend for VlcPlayer {
    fn name(&self) -> &'static str {
        "vlc"
    }

    fn attach(&mut self, geometry: &Geometry) -> Result<()> {
        let mut cmd = Command::new("vlc");
        cmd.args(self.command_args(geometry))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        tracing::debug!(?geometry, "spawning vlc");
        let mut process = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::BackendUnavailable {
                name: "VLC",
                reason: "the `vlc` binary was not found on PATH".to_string(),
            },
            _ => Error::Io(e),
        })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::ipc("vlc stdin was not captured"))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::ipc("vlc stdout was not captured"))?;

        // The rc interface interleaves prompts and status lines with
        // replies; a `get_time` reply is a bare number of seconds.
        let position = Arc::clone(&self.position_secs);
        std::thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if let Ok(seconds) = line.trim().trim_start_matches("> ").parse::<u64>() {
                    position.store(seconds, Ordering::Relaxed);
                }
            }
        });

        self.stdin = Some(stdin);
        self.process = Some(process);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.send("play")
    }

    fn stop(&mut self) -> Result<()> {
        // rc's `pause` is a toggle; the sync layer only sends a pause while
        // playback is running, which keeps the toggle honest.
        self.send("pause")
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        self.send(&format!("seek {}", position_ms / 1000))
    }

    fn position_ms(&mut self) -> Result<u64> {
        // Request a fresh reading; the reply lands in the cache via the
        // reader thread, so the value returned here is at most one poll old.
        self.send("get_time")?;
        Ok(self.position_secs.load(Ordering::Relaxed) * 1000)
    }

    fn set_source(&mut self, url: &str) -> Result<()> {
        tracing::info!(url, "loading media in vlc");
        self.send(&format!("add {}", url))
    }

    fn is_alive(&mut self) -> bool {
        match self.process.as_mut() {
            Some(process) => matches!(process.try_wait(), Ok(None)),
            None => true,
        }
    }
}

impl Drop for VlcPlayer {
    fn drop(&mut self) {
        let _ = self.send("quit");
        if let Some(mut process) = self.process.take() {
            let _ = process.kill();
            let _ = process.wait();
        }
    }
}
