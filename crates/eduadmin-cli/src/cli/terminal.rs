use std::io::{BufRead, BufReader, Write};

use eduadmin_core::{Dialog, Page};
use parking_lot::Mutex;

/// `Page` on a terminal: confirmations are read from `input`, view changes are
/// reported on `output`.
pub struct TerminalPage<R, W> {
    auto_confirm: bool,
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalPage<BufReader<std::io::Stdin>, std::io::Stderr> {
    pub fn stdio(auto_confirm: bool) -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stderr(), auto_confirm)
    }
}

impl<R, W> TerminalPage<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W, auto_confirm: bool) -> Self {
        Self {
            auto_confirm,
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn say(&self, line: &str) {
        let mut out = self.output.lock();
        if let Err(e) = writeln!(out, "{}", line) {
            tracing::debug!("terminal write failed: {}", e);
        }
    }
}

/// `o`, `oui`, `y` and `yes` accept, case-insensitively. Anything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "o" | "oui" | "y" | "yes"
    )
}

impl<R, W> Page for TerminalPage<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, prompt: &str) -> bool {
        if self.auto_confirm {
            self.say(&format!("{} [o/N] o", prompt));
            return true;
        }

        {
            let mut out = self.output.lock();
            let _ = write!(out, "{} [o/N] ", prompt);
            let _ = out.flush();
        }

        let mut answer = String::new();
        match self.input.lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }

    fn reload(&self) {
        self.say("↻ Actualisation");
    }

    fn open_dialog(&self, dialog: Dialog) {
        tracing::debug!("open #{}", dialog.element_id());
    }

    fn close_dialog(&self, dialog: Dialog) {
        tracing::debug!("close #{}", dialog.element_id());
    }
}
