//! Child process plumbing: spawning, lossy line reading, graceful stop

use crate::downloader::command::ToolCommand;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Start the tool with stdout and stderr piped
pub fn spawn_tool(command: &ToolCommand) -> io::Result<Child> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);

    cmd.spawn()
}

/// Line reader that replaces invalid UTF-8 instead of failing.
///
/// `next_line` is cancel safe: bytes read before the future is dropped stay
/// in the internal buffer and are returned by the next call.
pub struct LossyLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LossyLines<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    /// Next line without its terminator, or `None` at end of stream
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.reader.read_until(b'\n', &mut self.buf).await?;
        if self.buf.is_empty() {
            return Ok(None);
        }

        let bytes = std::mem::take(&mut self.buf);
        let line = String::from_utf8_lossy(&bytes);
        Ok(Some(line.trim_end().to_string()))
    }
}

/// Result of asking the child to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Requested,
    AlreadyExited,
}

/// Ask the child to exit. On Unix this sends SIGTERM so yt-dlp can clean up
/// its partial files; there is no follow-up kill.
pub fn request_termination(child: &mut Child) -> io::Result<Termination> {
    if child.try_wait()?.is_some() {
        return Ok(Termination::AlreadyExited);
    }

    match send_terminate(child) {
        Ok(()) => Ok(Termination::Requested),
        Err(e) => {
            // The process may have exited between the check and the signal
            if child.try_wait()?.is_some() {
                Ok(Termination::AlreadyExited)
            } else {
                Err(e)
            }
        }
    }
}

#[cfg(unix)]
fn send_terminate(child: &mut Child) -> io::Result<()> {
    let pid = child
        .id()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "process already reaped"))?;
    terminate_pid(pid)
}

#[cfg(not(unix))]
fn send_terminate(child: &mut Child) -> io::Result<()> {
    debug!(pid = ?child.id(), "terminating process");
    child.start_kill()
}

/// Graceful stop by process id, for callers that do not own the `Child`
#[cfg(unix)]
pub fn terminate_pid(pid: u32) -> io::Result<()> {
    debug!(pid, "sending SIGTERM");
    run_stop_command("kill", &["-TERM", &pid.to_string()])
}

/// Graceful stop by process id, for callers that do not own the `Child`
#[cfg(windows)]
pub fn terminate_pid(pid: u32) -> io::Result<()> {
    debug!(pid, "requesting process exit");
    run_stop_command("taskkill", &["/PID", &pid.to_string()])
}

#[cfg(not(any(unix, windows)))]
pub fn terminate_pid(pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot signal process {}", pid),
    ))
}

#[cfg(any(unix, windows))]
fn run_stop_command(program: &str, args: &[&str]) -> io::Result<()> {
    let mut cmd = std::process::Command::new(program);
    cmd.args(args).stdout(Stdio::null()).stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let status = cmd.status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} {} exited with {}", program, args.join(" "), status),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let data: &[u8] = b"ok line\r\nbad \xff byte\nlast";
        let mut lines = LossyLines::new(data);

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("ok line"));
        assert_eq!(
            lines.next_line().await.unwrap().as_deref(),
            Some("bad \u{FFFD} byte")
        );
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("last"));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_lines_are_kept() {
        let data: &[u8] = b"a\n\nb\n";
        let mut lines = LossyLines::new(data);

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("a"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("b"));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn terminate_by_pid_stops_a_sleeping_child() {
        let command = ToolCommand {
            program: "sleep".into(),
            args: vec!["30".into()],
        };
        let mut child = spawn_tool(&command).unwrap();
        let pid = child.id().unwrap();

        terminate_pid(pid).unwrap();
        let status = child.wait().await.unwrap();
        assert!(!status.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn terminate_stops_a_sleeping_child() {
        let command = ToolCommand {
            program: "sleep".into(),
            args: vec!["30".into()],
        };
        let mut child = spawn_tool(&command).unwrap();

        assert_eq!(request_termination(&mut child).unwrap(), Termination::Requested);
        let status = child.wait().await.unwrap();
        assert!(!status.success());
        assert_eq!(
            request_termination(&mut child).unwrap(),
            Termination::AlreadyExited
        );
    }
}
