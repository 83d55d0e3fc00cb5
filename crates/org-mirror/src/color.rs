use crate::cli::ColorChoice;
use std::io::IsTerminal;

/// Initialize color mode based on CLI choice and environment
pub fn init(choice: ColorChoice) {
    let should_color = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            // Respect NO_COLOR standard (https://no-color.org/)
            if std::env::var("NO_COLOR").is_ok() {
                false
            } else {
                std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
            }
        }
    };

    colored::control::set_override(should_color);
}
