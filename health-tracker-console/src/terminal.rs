use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};

use crate::ConsoleResult;

/// The line-based surface the menus talk to
pub trait Terminal {
    fn clear(&mut self) -> ConsoleResult<()>;
    fn say(&mut self, line: &str) -> ConsoleResult<()>;
    fn ask(&mut self, prompt: &str) -> ConsoleResult<String>;
    /// Asks without echoing the answer
    fn ask_secret(&mut self, prompt: &str) -> ConsoleResult<String>;
    fn confirm(&mut self, prompt: &str) -> ConsoleResult<bool>;
    /// Waits for the user to press enter
    fn pause(&mut self, prompt: &str) -> ConsoleResult<()>;
}

/// A [Terminal] on stdout, prompting with dialoguer
pub struct InteractiveTerminal {
    term: Term,
    theme: ColorfulTheme,
}

impl InteractiveTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }
}

impl Default for InteractiveTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for InteractiveTerminal {
    fn clear(&mut self) -> ConsoleResult<()> {
        // Clearing fails when stdout is not a terminal, which is harmless
        if self.term.is_term() {
            self.term.clear_screen()?;
        }

        Ok(())
    }

    fn say(&mut self, line: &str) -> ConsoleResult<()> {
        self.term.write_line(line)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> ConsoleResult<String> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&self.term)?;

        Ok(answer)
    }

    fn ask_secret(&mut self, prompt: &str) -> ConsoleResult<String> {
        let answer = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact_on(&self.term)?;

        Ok(answer)
    }

    fn confirm(&mut self, prompt: &str) -> ConsoleResult<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_on(&self.term)?;

        Ok(answer)
    }

    fn pause(&mut self, prompt: &str) -> ConsoleResult<()> {
        self.term.write_line("")?;
        self.term.write_str(prompt)?;
        self.term.read_line()?;

        Ok(())
    }
}
