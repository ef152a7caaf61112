use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dictionary::FREE_DICTIONARY_BASE_URL;

#[derive(Parser, Debug)]
#[command(name = "define-a-word", version, about = "Very Simple Dictionary")]
/// Command-line arguments accepted by the `define-a-word` binary.
pub struct Cli {
    /// Look up a single word, print its definitions and exit instead of
    /// opening the interactive page.
    pub word: Option<String>,

    /// Dictionary endpoint; the lowercased word is appended to it.
    #[arg(long, value_name = "URL", env = "DEFINE_A_WORD_BASE_URL", default_value = FREE_DICTIONARY_BASE_URL)]
    pub base_url: String,

    /// Where diagnostics go while the interactive page owns the terminal.
    #[arg(long, value_name = "FILE", env = "DEFINE_A_WORD_LOG")]
    pub log_file: Option<PathBuf>,

    /// Show unexpected lookup failures in the status line instead of only
    /// logging them.
    #[arg(long)]
    pub show_errors: bool,

    /// Redraw interval in milliseconds; also paces the loading spinner.
    #[arg(long, value_name = "MS", default_value_t = 100)]
    pub tick_rate_ms: u64,
}

impl Cli {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_free_dictionary() {
        let cli = Cli::try_parse_from(["define-a-word"]).unwrap();
        assert_eq!(cli.word, None);
        assert_eq!(cli.base_url, FREE_DICTIONARY_BASE_URL);
        assert!(!cli.show_errors);
        assert_eq!(cli.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn one_shot_word_and_flags() {
        let cli = Cli::try_parse_from([
            "define-a-word",
            "Hello",
            "--show-errors",
            "--base-url",
            "http://localhost:9000/",
            "--tick-rate-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.word.as_deref(), Some("Hello"));
        assert!(cli.show_errors);
        assert_eq!(cli.base_url, "http://localhost:9000/");
        assert_eq!(cli.tick_rate(), Duration::from_millis(1));
    }
}
