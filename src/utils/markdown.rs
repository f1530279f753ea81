use pulldown_cmark::{Options, Parser, html};

/// Render untrusted author markdown to sanitized HTML.
///
/// GFM-style extensions are enabled; the result is passed through ammonia's
/// whitelist cleaner so raw HTML embedded in the markdown never reaches a
/// visitor unescaped.
pub fn to_html(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(text, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);

    ammonia::clean(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let out = to_html("# hi\n\nsome *text*");
        assert!(out.contains("<h1>"));
        assert!(out.contains("<em>text</em>"));
    }

    #[test]
    fn strips_script_tags() {
        let out = to_html("hello <script>alert(1)</script> world");
        assert!(!out.contains("<script>"));
        assert!(out.contains("hello"));
    }

    #[test]
    fn renders_gfm_tables() {
        let out = to_html("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(out.contains("<table>"));
    }
}
