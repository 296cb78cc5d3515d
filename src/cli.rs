use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const MODE_PROMPT: &str = "Mode: 1-Webcam, 2-Image file: ";
pub const PATH_PROMPT: &str = "Enter image path: ";
pub const INVALID_CHOICE: &str = "Invalid choice";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Webcam,
    SingleImage { path: PathBuf },
}

fn prompt(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> std::io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks for the session mode. `None` means the answer was not a known choice.
pub fn ask_mode(input: &mut impl BufRead, output: &mut impl Write) -> std::io::Result<Option<Mode>> {
    let choice = prompt(input, output, MODE_PROMPT)?;
    match choice.as_str() {
        "1" => Ok(Some(Mode::Webcam)),
        "2" => {
            let path = prompt(input, output, PATH_PROMPT)?;
            Ok(Some(Mode::SingleImage {
                path: PathBuf::from(path.trim()),
            }))
        }
        _ => Ok(None),
    }
}
