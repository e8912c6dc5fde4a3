use crate::foundation::error::{ReelError, ReelResult};
use crate::graph::command::Command;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How often a running process is checked for exit, cancellation and timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Number of trailing stderr lines kept for error reports.
const STDERR_TAIL_LINES: usize = 20;

/// Process-level settings for [`Executor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutorOpts {
    /// Program to run; resolved through `PATH` when relative.
    pub ffmpeg_path: PathBuf,
    /// Kill the process after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ExecutorOpts {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout: Some(Duration::from_secs(10 * 60)),
        }
    }
}

/// Shared flag that asks a running execution to stop.
///
/// Clones observe the same flag, so one clone can be handed to another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, not-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Return `true` once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs a [`Command`] through the system `ffmpeg`.
#[derive(Clone, Debug, Default)]
pub struct Executor {
    opts: ExecutorOpts,
    dry_run: bool,
    verbose: bool,
}

impl Executor {
    /// Executor with the given process settings, not in dry-run or verbose mode.
    pub fn new(opts: ExecutorOpts) -> Self {
        Self {
            opts,
            dry_run: false,
            verbose: false,
        }
    }

    /// Only log the command line instead of spawning.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Log the command line and forward process output at info level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Process settings in use.
    pub fn opts(&self) -> &ExecutorOpts {
        &self.opts
    }

    /// Full argument vector passed to the program: `-y` followed by [`Command::args`].
    pub fn build_args(cmd: &Command) -> Vec<String> {
        let mut args = vec!["-y".to_string()];
        args.extend(cmd.args());
        args
    }

    /// Run `<ffmpeg> -version` and return the first line of its banner.
    pub fn check_ffmpeg(&self) -> ReelResult<String> {
        let out = std::process::Command::new(&self.opts.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ReelError::execution(format!(
                    "ffmpeg not found at '{}' (is it installed and on PATH?): {e}",
                    self.opts.ffmpeg_path.display()
                ))
            })?;
        if !out.status.success() {
            return Err(ReelError::execution(format!(
                "'{} -version' exited with status {}",
                self.opts.ffmpeg_path.display(),
                out.status
            )));
        }
        let banner = String::from_utf8_lossy(&out.stdout);
        Ok(banner.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Run `cmd` to completion.
    pub fn execute(&self, cmd: &Command) -> ReelResult<()> {
        self.execute_with_cancel(cmd, &CancelToken::default())
    }

    /// Run `cmd`, stopping early when `cancel` fires or the timeout elapses.
    ///
    /// A command without outputs is rejected before anything is spawned. In dry-run mode the
    /// command line is logged and nothing is spawned.
    #[tracing::instrument(skip_all, fields(program = %self.opts.ffmpeg_path.display(), dry_run = self.dry_run))]
    pub fn execute_with_cancel(&self, cmd: &Command, cancel: &CancelToken) -> ReelResult<()> {
        if cmd.outputs.is_empty() {
            return Err(ReelError::precondition(
                "command has no outputs; configure an output before executing",
            ));
        }

        let args = Self::build_args(cmd);
        if self.dry_run {
            tracing::info!(command = %cmd, "dry run, not executing");
            return Ok(());
        }
        if self.verbose {
            tracing::info!(command = %cmd, "executing");
        } else {
            tracing::debug!(command = %cmd, "executing");
        }
        if cancel.is_cancelled() {
            return Err(ReelError::cancelled("cancelled before start"));
        }

        for output in &cmd.outputs {
            ensure_parent_dir(Path::new(&output.path))?;
        }

        let mut child = std::process::Command::new(&self.opts.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReelError::execution(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.opts.ffmpeg_path.display()
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::execution("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::execution("failed to open ffmpeg stderr (unexpected)"))?;
        let stdout_drain = drain_lines(stdout, "stdout", self.verbose);
        let stderr_drain = drain_lines(stderr, "stderr", self.verbose);

        let waited = wait_for_exit(&mut child, cancel, self.opts.timeout);
        join_drain(stdout_drain)?;
        let tail = join_drain(stderr_drain)?;
        let status = waited?;

        if !status.success() {
            let tail = Vec::from(tail).join("\n");
            return Err(ReelError::execution(format!(
                "ffmpeg exited with status {status}: {}",
                tail.trim()
            )));
        }
        tracing::info!(outputs = cmd.outputs.len(), "ffmpeg finished");
        Ok(())
    }
}

/// The part of a child process the wait loop drives.
trait Reapable {
    fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>>;
    fn kill(&mut self) -> std::io::Result<()>;
    fn wait(&mut self) -> std::io::Result<ExitStatus>;
}

impl Reapable for Child {
    fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        Child::try_wait(self)
    }

    fn kill(&mut self) -> std::io::Result<()> {
        Child::kill(self)
    }

    fn wait(&mut self) -> std::io::Result<ExitStatus> {
        Child::wait(self)
    }
}

/// Poll `child` until it exits, `cancel` fires or `timeout` elapses.
///
/// Every early return kills and reaps the child first, so its pipes close.
fn wait_for_exit<P: Reapable>(
    child: &mut P,
    cancel: &CancelToken,
    timeout: Option<Duration>,
) -> ReelResult<ExitStatus> {
    let deadline = timeout.map(|t| Instant::now() + t);
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                stop(child);
                return Err(ReelError::execution(format!("failed to poll ffmpeg: {e}")));
            }
        }

        let reason = if cancel.is_cancelled() {
            Some("cancelled by caller".to_string())
        } else if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            Some(format!("timed out after {:?}", timeout.unwrap_or_default()))
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::warn!(%reason, "stopping ffmpeg");
            stop(child);
            return Err(ReelError::cancelled(reason));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn stop<P: Reapable>(child: &mut P) {
    let _ = child.kill();
    let _ = child.wait();
}

fn drain_lines<R>(
    reader: R,
    stream: &'static str,
    verbose: bool,
) -> JoinHandle<std::io::Result<VecDeque<String>>>
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf).trim_end().to_string();
            if verbose {
                tracing::info!(stream, "{line}");
            } else {
                tracing::trace!(stream, "{line}");
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        Ok(tail)
    })
}

fn join_drain(
    handle: JoinHandle<std::io::Result<VecDeque<String>>>,
) -> ReelResult<VecDeque<String>> {
    handle
        .join()
        .map_err(|_| ReelError::execution("ffmpeg output drain thread panicked"))?
        .map_err(|e| ReelError::execution(format!("ffmpeg output read failed: {e}")))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/executor.rs"]
mod tests;
