//! Interactive confirmation for destructive commands

use std::io::{self, BufRead, Write};

/// Interpret a reply to a yes/no question; anything but yes is no
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask `question` on stdin unless `assume_yes` is set
pub fn confirm(question: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(parse_answer(&line))
}
