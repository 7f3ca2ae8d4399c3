use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::error::SandboxError;
use super::toolchain::Toolchains;
use super::workspace::Workspace;
use super::{RunFailure, RunOutput, Sandbox};
use crate::config::SandboxConfig;

/// Sandbox backed by plain OS subprocesses.
///
/// Isolation is limited to a private working directory, wall-clock timeouts and a cap on
/// captured output. Each subprocess leads its own process group; the group is killed as
/// soon as the leader exits or the deadline passes, so nothing it spawned outlives the run.
pub struct ProcessSandbox {
    toolchains: Toolchains,
    work_dir: PathBuf,
    compile_timeout: Duration,
    execution_timeout: Duration,
    max_output_bytes: u64,
}

/// A subprocess that exited before its deadline.
#[derive(Debug)]
struct Finished {
    status: ExitStatus,
    stdout: String,
    stderr: String,
    elapsed: Duration,
}

impl ProcessSandbox {
    pub fn new(toolchains: Toolchains, config: &SandboxConfig) -> Self {
        Self {
            toolchains,
            work_dir: config.work_dir(),
            compile_timeout: config.compile_timeout(),
            execution_timeout: config.execution_timeout(),
            max_output_bytes: config.max_output_bytes,
        }
    }

    pub fn toolchains(&self) -> &Toolchains {
        &self.toolchains
    }

    fn command(&self, workspace: &Workspace, argv: &[String]) -> Result<Command, SandboxError> {
        let (program, args) = argv.split_first().ok_or(SandboxError::EmptyCommand)?;
        let program = match program.strip_prefix("./") {
            Some(local) => workspace.path().join(local),
            None => PathBuf::from(program),
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(workspace.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .process_group(0);
        Ok(command)
    }

    /// Spawn `argv`, feed it `input` and drain its output, all under `limit`.
    ///
    /// Returns `Ok(None)` when the deadline passed. On every path the process group is
    /// dead by the time this returns.
    async fn execute(
        &self,
        workspace: &Workspace,
        argv: &[String],
        input: &str,
        limit: Duration,
    ) -> Result<Option<Finished>, SandboxError> {
        let mut child = self
            .command(workspace, argv)?
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                program: argv[0].clone(),
                source,
            })?;

        // Taken now: the id is gone once the leader has been reaped.
        let pgid = child.id();

        let started = Instant::now();
        let collected =
            timeout(limit, collect(&mut child, pgid, input, self.max_output_bytes)).await;
        let elapsed = started.elapsed();

        match collected {
            Ok(Ok((status, stdout, stderr))) => Ok(Some(Finished {
                status,
                stdout,
                stderr,
                elapsed,
            })),
            Ok(Err(e)) => {
                debug!(program = %argv[0], error = %e, "Collection failed, killing process group");
                terminate(&mut child, pgid).await;
                Err(e)
            }
            Err(_) => {
                debug!(program = %argv[0], ?limit, "Deadline passed, killing process group");
                terminate(&mut child, pgid).await;
                Ok(None)
            }
        }
    }

    async fn judge_once(
        &self,
        language: &str,
        source: &str,
        stdin: &str,
    ) -> Result<RunOutput, RunFailure> {
        let toolchain = self
            .toolchains
            .get(language)
            .ok_or_else(|| RunFailure::runtime(format!("Unsupported language: {language}")))?;

        let workspace = Workspace::create(&self.work_dir).await?;
        workspace.write_file(&toolchain.source_file, source).await?;

        if let Some(compile) = &toolchain.compile {
            let finished = self
                .execute(&workspace, compile, "", self.compile_timeout)
                .await?
                .ok_or(RunFailure::CompileTimeout)?;

            if !finished.status.success() {
                let mut diagnostics = finished.stderr;
                if diagnostics.trim().is_empty() {
                    diagnostics = finished.stdout;
                }
                return Err(RunFailure::CompileError {
                    stderr: diagnostics,
                });
            }
        }

        let finished = self
            .execute(&workspace, &toolchain.run, stdin, self.execution_timeout)
            .await?
            .ok_or(RunFailure::ExecutionTimeout)?;

        if !finished.status.success() {
            let stderr = finished.stderr.trim();
            let message = if stderr.is_empty() {
                format!("Process exited with {}", finished.status)
            } else {
                stderr.to_string()
            };
            return Err(RunFailure::RuntimeError { message });
        }

        Ok(RunOutput {
            stdout: finished.stdout,
            elapsed: finished.elapsed,
        })
    }
}

#[async_trait]
impl Sandbox for ProcessSandbox {
    #[instrument(
        skip(self, source, stdin),
        fields(source_len = source.len(), stdin_len = stdin.len())
    )]
    async fn run(
        &self,
        language: &str,
        source: &str,
        stdin: &str,
    ) -> Result<RunOutput, RunFailure> {
        let result = self.judge_once(language, source, stdin).await;
        if let Err(failure) = &result {
            debug!(%failure, "Sandbox run failed");
        }
        result
    }
}

/// Write stdin, drain stdout and stderr, and reap the child, concurrently.
///
/// Once the leader exits its group is killed, so descendants still holding the pipes
/// cannot keep the drains open.
async fn collect(
    child: &mut Child,
    pgid: Option<u32>,
    input: &str,
    max_output_bytes: u64,
) -> Result<(ExitStatus, String, String), SandboxError> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let feed = async move {
        if let Some(mut pipe) = stdin {
            match pipe.write_all(input.as_bytes()).await {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
            // Dropping the pipe closes the child's stdin.
        }
        Ok::<(), SandboxError>(())
    };

    let reap = async {
        let status = child.wait().await?;
        kill_group(pgid);
        Ok::<_, SandboxError>(status)
    };

    let (_, out, err, status) = tokio::try_join!(
        feed,
        drain(stdout, max_output_bytes),
        drain(stderr, max_output_bytes),
        reap
    )?;
    Ok((status, out, err))
}

/// Read a pipe to EOF, failing as soon as it yields more than `limit` bytes.
async fn drain<R: AsyncRead + Unpin>(
    pipe: Option<R>,
    limit: u64,
) -> Result<String, SandboxError> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        let mut capped = pipe.take(limit.saturating_add(1));
        capped.read_to_end(&mut buf).await?;
        if buf.len() as u64 > limit {
            return Err(SandboxError::OutputLimit { limit });
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// SIGKILL every process in the group led by `pgid`.
fn kill_group(pgid: Option<u32>) {
    let Some(pid) = pgid else {
        return;
    };
    // SAFETY: kill(2) with a negative pid signals the group led by our own child.
    let rc = unsafe { libc::kill(-(pid as libc::pid_t), libc::SIGKILL) };
    if rc != 0 {
        let error = io::Error::last_os_error();
        // ESRCH: the group is already empty.
        if error.raw_os_error() != Some(libc::ESRCH) {
            debug!(pid, %error, "Process group kill failed");
        }
    }
}

/// Kill the whole process group, then kill and reap the leader.
async fn terminate(child: &mut Child, pgid: Option<u32>) {
    kill_group(pgid);
    if let Err(e) = child.kill().await {
        if e.kind() != io::ErrorKind::InvalidInput {
            warn!(error = %e, "Failed to kill subprocess");
        }
    }
}
