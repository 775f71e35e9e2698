use crate::dialog::{FormPresenter, Prompt};
use std::io::{self, BufRead, Write};
use tracing::warn;

pub const CANCEL: &str = ".cancel";

/// Asks one prompt per line. `.cancel` or end of input cancels the form.
pub struct ConsolePresenter<R, W> {
    pub(super) input: R,
    pub(super) output: W,
}

impl<R: BufRead, W: Write> ConsolePresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn ask(&mut self, prompt: &Prompt) -> io::Result<Option<String>> {
        match &prompt.hint {
            Some(hint) => write!(self.output, "{} [{}]: ", prompt.label, hint)?,
            None => write!(self.output, "{}: ", prompt.label)?,
        }
        self.output.flush()?;
        let answer = self.read_line()?;
        Ok(answer.filter(|line| line.trim() != CANCEL))
    }

    fn try_present(&mut self, title: &str, prompts: &[Prompt]) -> io::Result<Option<Vec<String>>> {
        writeln!(self.output, "-- {title} -- ({CANCEL} to abort)")?;
        let mut answers = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            match self.ask(prompt)? {
                Some(answer) => answers.push(answer),
                None => return Ok(None),
            }
            // A blank first answer skips the rest of the form.
            if answers.len() == 1 && answers[0].trim().is_empty() {
                answers.resize(prompts.len(), String::new());
                break;
            }
        }
        Ok(Some(answers))
    }
}

impl<R: BufRead, W: Write> FormPresenter for ConsolePresenter<R, W> {
    fn present_form(&mut self, title: &str, prompts: &[Prompt]) -> Option<Vec<String>> {
        match self.try_present(title, prompts) {
            Ok(answers) => answers,
            Err(err) => {
                warn!(%err, "console form failed");
                None
            }
        }
    }

    fn report(&mut self, message: &str) {
        if let Err(err) = writeln!(self.output, "! {message}") {
            warn!(%err, "console report failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn presenter(input: &str) -> ConsolePresenter<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePresenter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_one_answer_per_prompt() {
        let mut console = presenter("users\r\n  padded \n");
        let prompts = [Prompt::new("Table name"), Prompt::new("Value").with_hint("I32")];
        let answers = console.present_form("Create table", &prompts).unwrap();
        assert_eq!(answers, vec!["users", "  padded "]);

        let output = String::from_utf8(console.output).unwrap();
        assert!(output.contains("-- Create table --"));
        assert!(output.contains("Value [I32]: "));
    }

    #[test]
    fn test_cancel_and_end_of_input() {
        let mut console = presenter("a\n.cancel\n");
        let prompts = [Prompt::new("One"), Prompt::new("Two")];
        assert!(console.present_form("Form", &prompts).is_none());
        assert!(console.present_form("Form", &prompts).is_none());
    }

    #[test]
    fn test_blank_first_answer_skips_the_rest() {
        let mut console = presenter("\nnext\n");
        let prompts = [Prompt::new("Field"), Prompt::new("Comparison"), Prompt::new("Value")];
        let answers = console.present_form("Add filter", &prompts).unwrap();
        assert_eq!(answers, vec!["", "", ""]);
        assert_eq!(console.read_line().unwrap().as_deref(), Some("next"));
    }

    #[test]
    fn test_report_is_written() {
        let mut console = presenter("");
        console.report("please add a value");
        assert_eq!(String::from_utf8(console.output).unwrap(), "! please add a value\n");
    }
}
