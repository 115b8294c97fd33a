//! Optional ANSI styling shared by the text renderers

use colored::ColoredString;

/// Apply `style` to `text` when colour is enabled, otherwise return it as is
pub fn paint(text: &str, color: bool, style: fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Colorize;

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(paint("Risk: HIGH", false, |s| s.red().bold()), "Risk: HIGH");
    }

    #[test]
    fn test_styled_text_keeps_content() {
        colored::control::set_override(true);
        let styled = paint("ok", true, |s| s.green());
        assert!(styled.contains("ok"));
        assert!(styled.starts_with("\u{1b}["));
    }
}
