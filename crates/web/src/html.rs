//! HTML fragments served by the query page.
//!
//! Everything the user controls (search terms, document names, requested file names)
//! goes through [`escape_html`] before it is interpolated.


use crate::search::QueryResult;

/// Logo and search form shown on top of every query page.
pub const LANDING_PAGE: &str = concat!(
    "<html><head><title>searchd</title></head>\n",
    "<body>\n",
    "<center style=\"font-size:500%;\">\n",
    "<span style=\"position:relative;bottom:-0.33em;color:orange;\">s</span>",
    "<span style=\"color:red;\">e</span>",
    "<span style=\"color:gold;\">a</span>",
    "<span style=\"color:blue;\">r</span>",
    "<span style=\"color:green;\">c</span>",
    "<span style=\"color:red;\">h</span>\n",
    "</center>\n",
    "<p>\n",
    "<div style=\"height:20px;\"></div>\n",
    "<center>\n",
    "<form action=\"/query\" method=\"get\">\n",
    "<input type=\"text\" size=30 name=\"terms\" />\n",
    "<input type=\"submit\" value=\"Search\" />\n",
    "</form>\n",
    "</center><p>\n",
);

/// Replaces the characters that are special in HTML text and attribute values with
/// entity references.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Body of the 404 response for a missing static file.
pub fn file_not_found(file_name: &str) -> String {
    format!("<html><body>Couldn't find file \"{}\"</body></html>\n", escape_html(file_name))
}

/// Appends the result banner and one list entry per result, in the order given.
pub fn write_results(page: &mut String, terms: &str, results: &[QueryResult]) {
    let terms = escape_html(terms);
    if results.is_empty() {
        page.push_str(&format!("<div>No results found for <b>{terms}</b></div><br>"));
    } else {
        page.push_str(&format!("<div>{} results found for <b>{terms}</b></div><br>", results.len()));
    }

    for result in results {
        let name = escape_html(&result.document_name);
        let entry = if is_absolute_url(&result.document_name) {
            format!("<div><li><a href=\"{name}\" target=\"_blank\">{name}</a> [{}]</li></div>", result.rank)
        } else {
            format!("<div><li><a href=\"/static/{name}\">{name}</a> [{}]</li></div>", result.rank)
        };
        page.push_str(&entry);
    }
}

fn is_absolute_url(name: &str) -> bool {
    name.starts_with("http://") || name.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;");
        assert_eq!(escape_html("plain text"), "plain text");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn not_found_names_the_escaped_file() {
        assert_eq!(file_not_found("<x>.html"), "<html><body>Couldn't find file \"&lt;x&gt;.html\"</body></html>\n");
    }

    #[test]
    fn banner_counts_results() {
        let results = vec![QueryResult::new("doc1", 3), QueryResult::new("doc2", 1)];
        let mut page = String::new();
        write_results(&mut page, "alpha beta", &results);

        assert!(page.starts_with("<div>2 results found for <b>alpha beta</b></div><br>"));
        let first = page.find("/static/doc1\">doc1</a> [3]").unwrap();
        let second = page.find("/static/doc2\">doc2</a> [1]").unwrap();
        assert!(first < second);
    }

    #[test]
    fn zero_results_banner() {
        let mut page = String::new();
        write_results(&mut page, "<nothing>", &[]);
        assert_eq!(page, "<div>No results found for <b>&lt;nothing&gt;</b></div><br>");
    }

    #[test]
    fn absolute_urls_open_in_new_tab() {
        let mut page = String::new();
        write_results(&mut page, "rust", &[QueryResult::new("https://www.rust-lang.org/", 7)]);
        assert!(page.contains("<a href=\"https://www.rust-lang.org/\" target=\"_blank\">https://www.rust-lang.org/</a> [7]"));
        assert!(!page.contains("/static/"));
    }
}
