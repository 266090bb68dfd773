//! Status output on the terminal
//!
//! Artifacts go to the output sink; this module only writes the notices and
//! failure lines around them, colored with `termcolor`.

use std::fmt::Display;
use std::io::Write;

use clap::ValueEnum;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// `--color` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// A set `NO_COLOR` turns colors off whatever the flag says
    pub fn choice(self, no_color: bool) -> ColorChoice {
        match self {
            _ if no_color => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }

    pub fn resolve(self) -> ColorChoice {
        self.choice(std::env::var_os("NO_COLOR").is_some())
    }
}

pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        StyledOutput {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// One uncolored line on stdout, e.g. the empty-batch notice
    pub fn notice(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{}", text);
        let _ = self.stdout.flush();
    }

    /// `<class>: <error>` on stderr with the class name highlighted
    pub fn class_failure(&mut self, class: &str, err: &dyn Display) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Yellow)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "{}", class);
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, ": {}", err);
    }

    pub fn fatal(&mut self, text: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = writeln!(self.stderr, "{}", text);
        let _ = self.stderr.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_wins() {
        for mode in [ColorMode::Auto, ColorMode::Always, ColorMode::Never] {
            assert_eq!(mode.choice(true), ColorChoice::Never);
        }
    }

    #[test]
    fn test_mode_without_no_color() {
        assert_eq!(ColorMode::Auto.choice(false), ColorChoice::Auto);
        assert_eq!(ColorMode::Always.choice(false), ColorChoice::Always);
        assert_eq!(ColorMode::Never.choice(false), ColorChoice::Never);
        assert_eq!(ColorMode::default(), ColorMode::Auto);
    }
}
