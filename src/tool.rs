//! Companion update tool.
//!
//! After a save that changed the manifest, the interactive flow offers to
//! run `<tool> update` (west by default). Output from both stdout and stderr
//! is handed to the caller one line at a time as it arrives.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{Error, Result};

/// Which stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// One line of tool output, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: Stream,
    pub text: String,
}

/// Find `name` on `PATH`.
pub fn locate(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find_map(|dir| executable_in(&dir, name))
}

/// Whether `name` can be found on `PATH`.
pub fn is_available(name: &str) -> bool {
    locate(name).is_some()
}

fn executable_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let candidate = dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX));
    candidate.is_file().then_some(candidate)
}

/// Run `tool` with `args`, calling `on_line` for every output line.
///
/// Returns the exit status once both streams are drained and the process
/// has exited. A non-zero status is not an error here; the caller decides.
pub fn run_streaming<I, S>(
    tool: &str,
    args: I,
    mut on_line: impl FnMut(OutputLine),
) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    log::info!("Running {}", tool);
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::Tool {
            tool: tool.to_string(),
            message: format!("failed to start: {}", e),
        })?;

    let (sender, receiver) = mpsc::channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(forward_lines(stdout, Stream::Stdout, sender.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(forward_lines(stderr, Stream::Stderr, sender.clone()));
    }
    drop(sender);

    // Ends once both reader threads have dropped their senders.
    for line in receiver {
        on_line(line);
    }
    for reader in readers {
        let _ = reader.join();
    }

    child.wait().map_err(|e| Error::Tool {
        tool: tool.to_string(),
        message: format!("failed to wait for process: {}", e),
    })
}

fn forward_lines<R>(
    source: R,
    stream: Stream,
    sender: mpsc::Sender<OutputLine>,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(source);
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buffer)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    if sender.send(OutputLine { stream, text }).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
