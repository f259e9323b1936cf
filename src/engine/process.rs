//! Bounded child process execution
//!
//! Every compiler and program invocation goes through [`run_with_timeout`]:
//! the child gets its own process group, stdin is fed from a separate task,
//! stdout/stderr are drained concurrently, and on expiry the whole group is
//! killed so nothing outlives the invocation.

use std::ffi::{OsStr, OsString};
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};

/// How long to keep draining pipes after the child exited
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Program, arguments and working directory of one invocation
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

/// Captured result of a process that exited on its own
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    /// `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Outcome of a bounded run
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Exited(ProcessOutput),
    /// Wall-clock limit hit; the process group was killed and output discarded
    TimedOut,
}

/// Failure to start or wait for the process
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("executable not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Run `spec` with `input` on stdin, bounded by `limit`.
///
/// At most `max_output` bytes are kept from each of stdout and stderr; the
/// rest is read and discarded so the child never blocks on a full pipe.
pub async fn run_with_timeout(
    spec: &CommandSpec,
    input: &str,
    limit: Duration,
    max_output: usize,
) -> Result<ProcessOutcome, SpawnError> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.current_dir {
        command.current_dir(dir);
    }
    #[cfg(unix)]
    command.process_group(0);

    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => SpawnError::NotFound(spec.program.display().to_string()),
        _ => SpawnError::Io(e),
    })?;
    let pid = child.id();

    let stdin = child.stdin.take();
    let input = input.as_bytes().to_vec();
    let writer = tokio::spawn(async move {
        // The program may exit without reading its input
        if let Some(mut stdin) = stdin
            && let Err(e) = stdin.write_all(&input).await
            && e.kind() != ErrorKind::BrokenPipe
        {
            tracing::debug!("Failed to write stdin: {}", e);
        }
    });
    let stdout = child
        .stdout
        .take()
        .map(|pipe| Capture::spawn(pipe, max_output));
    let stderr = child
        .stderr
        .take()
        .map(|pipe| Capture::spawn(pipe, max_output));

    let waited = timeout(limit, wait_for_exit(&mut child, pid)).await;
    match waited {
        Ok(Ok(status)) => {
            writer.abort();
            let (stdout, stderr) = tokio::join!(Capture::finish(stdout), Capture::finish(stderr));

            tracing::debug!(
                program = %spec.program.display(),
                exit_code = ?status.code(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Process exited"
            );

            Ok(ProcessOutcome::Exited(ProcessOutput {
                success: status.success(),
                exit_code: status.code(),
                stdout,
                stderr,
            }))
        }
        Ok(Err(e)) => {
            kill_group(pid);
            let _ = child.kill().await;
            abort_all(writer, stdout, stderr);
            Err(SpawnError::Io(e))
        }
        Err(_) => {
            tracing::debug!(
                program = %spec.program.display(),
                limit_ms = limit.as_millis() as u64,
                "Process timed out, killing process group"
            );
            kill_group(pid);
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to kill timed out process: {}", e);
            }
            abort_all(writer, stdout, stderr);
            Ok(ProcessOutcome::TimedOut)
        }
    }
}

/// Wait for the child to exit, then reap it.
///
/// On Linux the exit is first observed without reaping. While the child is
/// an unreaped zombie its pid, and so its process group id, cannot be
/// reused, which makes it safe to kill whatever the program left running in
/// its group before the final `wait`.
#[cfg_attr(not(target_os = "linux"), allow(unused_variables))]
async fn wait_for_exit(child: &mut Child, pid: Option<u32>) -> io::Result<ExitStatus> {
    #[cfg(target_os = "linux")]
    if let Some(pid) = pid {
        match exited_unreaped(pid).await {
            Ok(()) => kill_group(Some(pid)),
            Err(e) => tracing::debug!(pid, "Failed to observe exit: {}", e),
        }
    }
    child.wait().await
}

#[cfg(target_os = "linux")]
async fn exited_unreaped(pid: u32) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::wait::{Id, WaitPidFlag, waitid};
    use nix::unistd::Pid;

    tokio::task::spawn_blocking(move || {
        let flags = WaitPidFlag::WEXITED | WaitPidFlag::WNOWAIT;
        loop {
            match waitid(Id::Pid(Pid::from_raw(pid as i32)), flags) {
                Ok(_) => return Ok(()),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(io::Error::from(e)),
            }
        }
    })
    .await
    .map_err(io::Error::other)?
}

type Captured = Arc<Mutex<Vec<u8>>>;

/// One output pipe being drained into a shared buffer
struct Capture {
    bytes: Captured,
    reader: JoinHandle<io::Result<()>>,
}

impl Capture {
    fn spawn<R>(pipe: R, limit: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let bytes = Captured::default();
        let reader = tokio::spawn(read_capped(pipe, limit, bytes.clone()));
        Self { bytes, reader }
    }

    /// Wait for EOF within [`PIPE_DRAIN_GRACE`] and return what was read.
    ///
    /// Bytes read before the grace expires are kept; only the pipe is given up.
    async fn finish(capture: Option<Self>) -> String {
        let Some(mut capture) = capture else {
            return String::new();
        };
        match timeout(PIPE_DRAIN_GRACE, &mut capture.reader).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => tracing::warn!("Failed to read process output: {}", e),
            Ok(Err(e)) => tracing::warn!("Output reader task failed: {}", e),
            Err(_) => {
                // A descendant escaped the process group and still holds the pipe
                tracing::warn!("Output pipe still open after exit, keeping what was read");
                capture.reader.abort();
            }
        }
        let bytes = capture.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn abort(self) {
        self.reader.abort();
    }
}

async fn read_capped<R>(mut reader: R, limit: usize, bytes: Captured) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; 8 * 1024];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        let mut bytes = bytes.lock().unwrap_or_else(PoisonError::into_inner);
        let room = limit.saturating_sub(bytes.len());
        bytes.extend_from_slice(&chunk[..n.min(room)]);
    }
}

fn abort_all(writer: JoinHandle<()>, stdout: Option<Capture>, stderr: Option<Capture>) {
    writer.abort();
    for capture in [stdout, stderr].into_iter().flatten() {
        capture.abort();
    }
}

#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };
    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => tracing::warn!(pid, "Failed to kill process group: {}", e),
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}
