//! Terminal prompter: asks gate questions on a line-oriented terminal.

use mnemonics_core::{DeletePreview, Prompt, Prompter};
use std::io::{BufRead, Write};
use std::path::PathBuf;

const RULE_WIDTH: usize = 50;

/// Reads answers from `input`, writes questions to `output`.
///
/// End of input counts as a rejection, so piping an empty stdin never
/// confirms anything.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    /// Preselected 1-based candidate number (`delete --pick`).
    pick: Option<usize>,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pick: None,
        }
    }

    pub fn with_pick(mut self, pick: Option<usize>) -> Self {
        self.pick = pick;
        self
    }

    fn read_answer(&mut self) -> Option<String> {
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn ask_proceed(&mut self, action: &str, details: &str) -> bool {
        let _ = write!(self.output, "✓ {action}: {details}\nProceed? (Y/n): ");
        match self.read_answer() {
            Some(answer) => matches!(answer.to_lowercase().as_str(), "" | "y" | "yes"),
            None => false,
        }
    }

    fn confirm_delete(&mut self, preview: &DeletePreview) -> bool {
        let rule = "=".repeat(RULE_WIDTH);
        let _ = writeln!(self.output, "\n{rule}\nMEMORY FOUND:\n{rule}");
        let _ = writeln!(self.output, "Title: {}", preview.title);
        let _ = writeln!(self.output, "Type: {}", preview.category);
        let _ = writeln!(self.output, "Path: {}", preview.path.display());
        let _ = writeln!(self.output, "\nContent:\n{}", "-".repeat(20));
        let _ = writeln!(self.output, "{}", preview.content);
        let _ = writeln!(self.output, "{}", "-".repeat(20));
        if !preview.referencers.is_empty() {
            let _ = writeln!(
                self.output,
                "\n📝 This memory is referenced in {} other memory file(s):",
                preview.referencers.len()
            );
            for referencer in &preview.referencers {
                let _ = writeln!(self.output, "   - {}", referencer.display());
            }
        }
        let _ = writeln!(
            self.output,
            "\n{rule}\nDELETION WARNING:\nThis action cannot be undone!\n{rule}"
        );

        loop {
            let _ = write!(self.output, "Confirm deletion? [Y/N]: ");
            match self.read_answer().map(|answer| answer.to_uppercase()) {
                Some(answer) if answer == "Y" => return true,
                Some(answer) if answer == "N" => {
                    let _ = writeln!(self.output, "Deletion cancelled.");
                    return false;
                }
                Some(_) => {
                    let _ = writeln!(self.output, "Please enter 'Y' to confirm or 'N' to cancel.");
                }
                None => return false,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        match prompt {
            Prompt::UpdateExisting { path } => {
                let path = path.display().to_string();
                let _ = writeln!(self.output, "📝 Memory already exists: {path}");
                self.ask_proceed("Update existing memory", &path)
            }
            Prompt::MergeSimilar { best, top } => {
                let _ = writeln!(self.output, "🔍 Similar memory found:");
                for similar in top {
                    let _ = writeln!(
                        self.output,
                        "  - {} (similarity: {:.2})",
                        similar.title, similar.score
                    );
                }
                let details = format!("{} ({:.2})", best.title, best.score);
                self.ask_proceed("Update similar memory", &details)
            }
            Prompt::Delete(preview) => self.confirm_delete(preview),
        }
    }

    fn choose(&mut self, candidates: &[PathBuf]) -> Option<usize> {
        let _ = writeln!(self.output, "\nFound {} matching memories:", candidates.len());
        for (index, candidate) in candidates.iter().enumerate() {
            let _ = writeln!(self.output, "{}. {}", index + 1, candidate.display());
        }

        let number = match self.pick {
            Some(pick) => pick,
            None => {
                let _ = write!(self.output, "Which memory would you like to delete? (number): ");
                match self.read_answer()?.parse::<usize>() {
                    Ok(number) => number,
                    Err(_) => {
                        let _ = writeln!(self.output, "Invalid input. Aborting.");
                        return None;
                    }
                }
            }
        };
        number.checked_sub(1)
    }
}
