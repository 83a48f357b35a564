//! Process plumbing shared by the encoder adapters.

use super::EncoderError;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tracing::debug;

pub(crate) fn program_name(program: &Path) -> String {
    program.display().to_string()
}

fn spawn_error(program: &Path) -> impl FnOnce(std::io::Error) -> EncoderError + '_ {
    move |source| EncoderError::Spawn {
        program: program_name(program),
        source,
    }
}

/// Text to attach to a failure: stderr, optionally preceded by stdout.
pub(crate) fn diagnostics(output: &Output, include_stdout: bool) -> String {
    let mut text = String::new();
    if include_stdout {
        text.push_str(&String::from_utf8_lossy(&output.stdout));
    }
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text.trim().to_string()
}

/// Run `program` to completion with stdin closed, capturing stdout and stderr.
pub(crate) fn run_captured(program: &Path, args: &[String]) -> Result<Output, EncoderError> {
    debug!(program = %program.display(), ?args, "running encoder");
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(spawn_error(program))
}

/// Run `program`, streaming `feed`'s bytes into its stdin while its stdout is
/// drained, and return what it wrote to stdout.
///
/// Writer and reader must run concurrently: with bounded pipe buffers a
/// sequential write-then-read deadlocks once either buffer fills. The writer
/// runs on a scoped thread and is always joined before returning.
pub(crate) fn run_piped<F>(program: &Path, args: &[String], feed: F) -> Result<Vec<u8>, EncoderError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), EncoderError> + Send,
{
    debug!(program = %program.display(), ?args, "running piped encoder");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error(program))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| std::io::Error::other("child stdin was not captured"))?;

    let (output, fed) = std::thread::scope(|scope| {
        let writer = scope.spawn(move || {
            let mut stdin = BufWriter::new(stdin);
            feed(&mut stdin)?;
            stdin.flush()?;
            // Dropping the writer closes the pipe so the encoder sees EOF.
            Ok::<(), EncoderError>(())
        });
        let output = child.wait_with_output();
        let fed = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("input writer panicked").into()));
        (output, fed)
    });

    let output = output?;
    if !output.status.success() {
        return Err(EncoderError::Failed {
            program: program_name(program),
            status: output.status,
            diagnostics: diagnostics(&output, false),
        });
    }
    fed?;
    if output.stdout.is_empty() {
        return Err(EncoderError::EmptyOutput {
            program: program_name(program),
        });
    }
    Ok(output.stdout)
}
