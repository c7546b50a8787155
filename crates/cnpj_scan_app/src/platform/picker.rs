use std::io::{self, BufRead, Write};

/// Asks for a directory on `output` and reads one line from `input`.
///
/// An empty answer takes `default`; with no default the empty string is
/// returned and the wizard reports the missing directory itself.
pub fn prompt_directory(
    input: &mut impl BufRead,
    output: &mut impl Write,
    default: Option<&str>,
) -> io::Result<String> {
    match default {
        Some(dir) => write!(output, "Directory to analyse [{dir}]: ")?,
        None => write!(output, "Directory to analyse: ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(default.unwrap_or_default().to_string());
    }
    Ok(answer.to_string())
}
