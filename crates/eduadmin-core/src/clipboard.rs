use std::io::Write;

use crate::feedback::FeedbackSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    /// System clipboard
    System,
    /// OSC 52 escape, picked up by terminals that support it
    Terminal,
}

/// Copy `text` and report the result with a banner.
/// Falls back to an OSC 52 escape on stdout when no system clipboard is available.
pub fn copy_to_clipboard(text: &str, feedback: &FeedbackSurface) -> Option<CopyMethod> {
    copy_via(text, feedback, system_copy, &mut std::io::stdout())
}

fn system_copy(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(text.to_string()).map_err(|e| e.to_string())
}

fn copy_via<F, W>(
    text: &str,
    feedback: &FeedbackSurface,
    system: F,
    terminal: &mut W,
) -> Option<CopyMethod>
where
    F: FnOnce(&str) -> Result<(), String>,
    W: Write,
{
    let method = match system(text) {
        Ok(()) => Some(CopyMethod::System),
        Err(e) => {
            tracing::debug!("system clipboard unavailable ({}), trying OSC 52", e);
            let written = write!(terminal, "\x1b]52;c;{}\x07", base64_encode(text.as_bytes()))
                .and_then(|_| terminal.flush());
            match written {
                Ok(()) => Some(CopyMethod::Terminal),
                Err(e) => {
                    tracing::warn!("clipboard copy failed: {}", e);
                    None
                }
            }
        }
    };

    match method {
        Some(_) => feedback.success("✅ Copié dans le presse-papiers"),
        None => feedback.danger("❌ Erreur lors de la copie"),
    };
    method
}

const BASE64_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(input: &[u8]) -> String {
    let mut output = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let buffer = chunk
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &b)| acc | (b as u32) << (16 - 8 * i));
        for i in 0..4 {
            if i <= chunk.len() {
                let idx = (buffer >> (18 - 6 * i)) & 0x3F;
                output.push(BASE64_CHARS[idx as usize] as char);
            } else {
                output.push('=');
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64() {
        assert_eq!(base64_encode(b""), "");
        assert_eq!(base64_encode(b"f"), "Zg==");
        assert_eq!(base64_encode(b"fo"), "Zm8=");
        assert_eq!(base64_encode(b"foo"), "Zm9v");
        assert_eq!(base64_encode(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn test_system_clipboard_success() {
        let feedback = FeedbackSurface::default();
        let mut terminal = Vec::new();
        let method = copy_via("lien", &feedback, |_| Ok(()), &mut terminal);

        assert_eq!(method, Some(CopyMethod::System));
        assert!(terminal.is_empty());
        assert_eq!(feedback.active()[0].message, "✅ Copié dans le presse-papiers");
    }

    #[test]
    fn test_falls_back_to_osc52() {
        let feedback = FeedbackSurface::default();
        let mut terminal = Vec::new();
        let method = copy_via("foo", &feedback, |_| Err("no display".to_string()), &mut terminal);

        assert_eq!(method, Some(CopyMethod::Terminal));
        assert_eq!(terminal, b"\x1b]52;c;Zm9v\x07".to_vec());
        assert_eq!(feedback.active().len(), 1);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_both_paths_failing_reports_error() {
        let feedback = FeedbackSurface::default();
        let method = copy_via("foo", &feedback, |_| Err("no display".to_string()), &mut BrokenPipe);

        assert_eq!(method, None);
        assert_eq!(feedback.active()[0].message, "❌ Erreur lors de la copie");
    }
}
