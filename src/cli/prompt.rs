use std::io::{self, BufRead, Write};

const YES: &[&str] = &["yes", "ye", "y"];
const NO: &[&str] = &["no", "n"];

pub const DELETE_USERS_PROMPT: &str = "You have elected to remove all users as well. \
If it is not intended then use option --skip \"users\". Do you want to continue [y/n] (y) ";

/// Ask a yes/no question until the answer is recognized.
///
/// An empty answer takes `default`. End of input counts as "no" so a
/// closed stdin never confirms a destructive step.
pub fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: bool,
) -> io::Result<bool> {
    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let choice = line.trim().to_lowercase();

        if YES.contains(&choice.as_str()) {
            return Ok(true);
        }
        if NO.contains(&choice.as_str()) {
            return Ok(false);
        }
        if choice.is_empty() {
            return Ok(default);
        }
        writeln!(output, "input not recognized, please try again: ")?;
    }
}

/// Confirm user deletion on the terminal
pub fn confirm_user_deletion() -> io::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    ask_yes_no(&mut input, &mut output, DELETE_USERS_PROMPT, true)
}
