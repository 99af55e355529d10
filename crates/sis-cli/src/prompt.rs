//! Line-based rendering of alert prompts.

use std::io::{self, BufRead, Write};

use sis_core::Alert;

/// Index of the action named by `answer`: a label (any case) or a 1-based number.
pub fn match_action<A>(alert: &Alert<A>, answer: &str) -> Option<usize> {
    let answer = answer.trim();
    if let Ok(number) = answer.parse::<usize>() {
        return (1..=alert.actions.len())
            .contains(&number)
            .then(|| number - 1);
    }
    alert
        .actions
        .iter()
        .position(|action| action.label.eq_ignore_ascii_case(answer))
}

/// Print `alert` with its buttons and read the chosen action.
///
/// Returns `None` on end of input or an unrecognized answer.
///
/// # Errors
///
/// Propagates I/O errors from `input` or `output`.
pub fn choose_action<A>(
    alert: &Alert<A>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Option<usize>> {
    writeln!(output, "{}", alert.title)?;
    writeln!(output, "{}", alert.message)?;
    let labels: Vec<&str> = alert
        .actions
        .iter()
        .map(|action| action.label.as_str())
        .collect();
    write!(output, "[{}]: ", labels.join("/"))?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(match_action(alert, &line))
}
