use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Returns `value` if given, otherwise asks on stdin.
///
/// An empty answer falls back to `default`; with no default it is an error.
pub fn path_or_prompt(
    value: Option<PathBuf>,
    question: &str,
    default: Option<&str>,
) -> io::Result<PathBuf> {
    match value {
        Some(path) => Ok(path),
        None => ask(&mut io::stdin().lock(), &mut io::stdout(), question, default),
    }
}

pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: Option<&str>,
) -> io::Result<PathBuf> {
    write!(output, "{question}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    match (answer.is_empty(), default) {
        (false, _) => Ok(PathBuf::from(answer)),
        (true, Some(default)) => Ok(PathBuf::from(default)),
        (true, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no path entered",
        )),
    }
}
