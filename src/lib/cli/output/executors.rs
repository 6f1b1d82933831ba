//! Contains helpers and data structures to execute the generated command
//! lines as child processes and relay their output back to the caller

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use color_eyre::{eyre::Context, Result};

use crate::events::LogSink;

/// Spawns `program` with `args` and relays its combined stdout/stderr to the
/// given sink line by line as it is produced, not buffered to completion.
/// Blocks the calling thread until the child exits.
///
/// Output is decoded as UTF-8 with replacement on invalid sequences.
pub fn execute_streamed<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    sink: &dyn LogSink,
) -> Result<ExitStatus> {
    log::debug!("Executing command => {program}");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Could not spawn the command {program:?}"))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // The child's stderr is drained on a secondary scoped thread so a full
    // pipe on either stream can never deadlock the other one
    std::thread::scope(|scope| {
        if let Some(err_pipe) = stderr {
            scope.spawn(move || relay_lines(err_pipe, sink));
        }
        if let Some(out_pipe) = stdout {
            relay_lines(out_pipe, sink);
        }
    });

    child
        .wait()
        .with_context(|| format!("The command {program:?} failed"))
}

/// Outcome of a child-process run bounded by a deadline
#[derive(Debug)]
pub enum TimedRun {
    Exited(ExitStatus),
    /// The deadline elapsed first; the child was killed and its answer
    /// must be treated as unknown
    TimedOut,
}

/// Spawns `program` with `args`, discarding its output, and waits for it at
/// most `timeout`. Used for the narrow presence-check queries, which are the
/// only subprocesses this tool bounds in time.
pub fn run_with_timeout<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    timeout: Duration,
) -> Result<TimedRun> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Could not spawn the command {program:?}"))?;

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child
            .try_wait()
            .with_context(|| format!("Failed polling the command {program:?}"))?
        {
            return Ok(TimedRun::Exited(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(TimedRun::TimedOut);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Reads a pipe to exhaustion, pushing each line into the sink with its
/// trailing line terminator stripped
fn relay_lines<R: Read>(pipe: R, sink: &dyn LogSink) {
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                sink.line(line.trim_end_matches(['\r', '\n']));
            }
        }
    }
}
