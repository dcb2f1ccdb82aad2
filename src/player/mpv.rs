use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use serde_json::{json, Value};

use super::traits::PlayerBackend;
use crate::error::{Error, Result};
use crate::gui::Geometry;

/// How long to wait between attempts to reach the IPC socket after spawning.
const SOCKET_RETRY_DELAY: Duration = Duration::from_millis(100);
const SOCKET_RETRIES: u32 = 20;

/// mpv backend. Spawns `mpv` as a child process with `--input-ipc-server`
/// and drives playback over its JSON IPC socket; the mpv window itself is
/// the video surface. The socket stays in non-blocking mode so position
/// updates are drained opportunistically on each tick instead of waiting
/// for replies.
pub struct MpvPlayer {
    extra_flags: Option<String>,
    socket_path: String,
    process: Option<Child>,
    connection: Option<BufReader<UnixStream>>,
    request_id: u64,
    last_position: f64,
}

impl MpvPlayer {
    pub fn new(extra_flags: Option<String>) -> Self {
        Self {
            extra_flags,
            socket_path: format!("/tmp/vidsync-mpv-{}", std::process::id()),
            process: None,
            connection: None,
            request_id: 1,
            last_position: 0.0,
        }
    }

    fn command_args(&self, geometry: &Geometry) -> Vec<String> {
        let mut args = vec![
            format!("--input-ipc-server={}", self.socket_path),
            "--idle=yes".to_string(),
            "--force-window=yes".to_string(),
            "--no-terminal".to_string(),
            "--keep-open=yes".to_string(),
        ];
        if geometry.fullscreen {
            args.push("--fs=yes".to_string());
        } else {
            args.push(format!("--geometry={}x{}", geometry.width, geometry.height));
        }
        if let Some(flags) = &self.extra_flags {
            args.extend(flags.split_whitespace().map(str::to_string));
        }
        args
    }

    fn connect_socket(&self) -> Result<UnixStream> {
        for _ in 0..SOCKET_RETRIES {
            match UnixStream::connect(&self.socket_path) {
                Ok(stream) => {
                    stream.set_nonblocking(true)?;
                    return Ok(stream);
                }
                Err(_) => std::thread::sleep(SOCKET_RETRY_DELAY),
            }
        }
        Err(Error::ipc(format!(
            "mpv did not open its IPC socket at {}",
            self.socket_path
        )))
    }

    fn send_command(&mut self, command: Value) -> Result<()> {
        let Some(conn) = self.connection.as_mut() else {
            return Err(Error::ipc("mpv is not attached"));
        };
        let message = json!({ "command": command, "request_id": self.request_id });
        self.request_id += 1;
        let stream = conn.get_mut();
        writeln!(stream, "{}", message)?;
        stream.flush()?;
        Ok(())
    }

    /// Drain pending IPC messages without blocking, keeping the most recent
    /// observed playback position.
    fn pump_messages(&mut self) {
        let Some(conn) = self.connection.as_mut() else {
            return;
        };
        loop {
            let mut line = String::new();
            match conn.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let Ok(msg) = serde_json::from_str::<Value>(&line) else {
                        continue;
                    };
                    if msg["event"] == "property-change" && msg["name"] == "time-pos" {
                        if let Some(position) = msg["data"].as_f64() {
                            self.last_position = position;
                        }
                    }
                }
                // WouldBlock when the socket is drained, or the pipe closed.
                Err(_) => break,
            }
        }
    }
}

impl PlayerBackend for MpvPlayer {
    fn name(&self) -> &'static str {
        "mpv"
    }

    fn attach(&mut self, geometry: &Geometry) -> Result<()> {
        let mut cmd = Command::new("mpv");
        cmd.args(self.command_args(geometry))
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        tracing::debug!(?geometry, "spawning mpv");
        let process = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::BackendUnavailable {
                name: "MPV",
                reason: "the `mpv` binary was not found on PATH".to_string(),
            },
            _ => Error::Io(e),
        })?;
        self.process = Some(process);

        let stream = self.connect_socket()?;
        self.connection = Some(BufReader::new(stream));

        // Position arrives as property-change events from here on.
        self.send_command(json!(["observe_property", 1, "time-pos"]))?;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.send_command(json!(["set_property", "pause", false]))
    }

    fn stop(&mut self) -> Result<()> {
        self.send_command(json!(["set_property", "pause", true]))
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<()> {
        let seconds = position_ms as f64 / 1000.0;
        self.send_command(json!(["seek", seconds, "absolute"]))
    }

    fn position_ms(&mut self) -> Result<u64> {
        self.pump_messages();
        Ok((self.last_position.max(0.0) * 1000.0) as u64)
    }

    fn set_source(&mut self, url: &str) -> Result<()> {
        tracing::info!(url, "loading media in mpv");
        self.send_command(json!(["loadfile", url, "replace"]))
    }

    fn is_alive(&mut self) -> bool {
        match self.process.as_mut() {
            Some(process) => matches!(process.try_wait(), Ok(None)),
            None => true,
        }
    }
}

impl Drop for MpvPlayer {
    fn drop(&mut self) {
        if let Some(mut process) = self.process.take() {
            let _ = process.kill();
            let _ = process.wait();
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
