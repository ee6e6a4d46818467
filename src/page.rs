//! The single-page research form.

/// What the result panel shows below the form
pub enum Panel<'a> {
    Empty,
    Report {
        ticker: &'a str,
        markdown: &'a str,
        output_file: &'a str,
    },
    Error(&'a str),
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 18rem; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 2rem; }
input[type=text] { width: 100%; padding: .5rem; margin: .5rem 0 1rem; box-sizing: border-box; }
button { padding: .5rem 1rem; }
.report { white-space: pre-wrap; font-family: inherit; line-height: 1.5; }
.error { color: #8a1c1c; background: #fde8e8; padding: 1rem; border-radius: .25rem; }
.meta { color: #555; font-size: .9rem; }
"#;

pub fn render(ticker: &str, panel: Panel<'_>) -> String {
    let result = match panel {
        Panel::Empty => String::new(),
        Panel::Report {
            ticker,
            markdown,
            output_file,
        } => format!(
            "<h2>Research results</h2>\n<p class=\"meta\">{} &middot; saved to {}</p>\n<div class=\"report\">{}</div>",
            escape_html(ticker),
            escape_html(output_file),
            escape_html(markdown)
        ),
        Panel::Error(message) => format!("<div class=\"error\">{}</div>", escape_html(message)),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Research Crew</title>
<style>{style}</style>
</head>
<body>
<aside>
<h3>Enter the ticker:</h3>
<form method="post" action="/research">
<label for="ticker">Ticker</label>
<input type="text" id="ticker" name="ticker" value="{ticker}" autofocus>
<button type="submit">Research</button>
</form>
</aside>
<main>
{result}
</main>
</body>
</html>
"#,
        style = STYLE,
        ticker = escape_html(ticker),
        result = result
    )
}
