/// HTML rendering for the file listing.
use daybook_shared::models::ListingPage;

const STYLE: &str = r#"
    <style>
        body { font-size: 1.75vw; font-family: math; }
        li:nth-child(odd) { background: #f0f0f0; }
    </style>
    "#;

/// Render one listing page: style, heading, file links, and paging controls.
pub fn listing(title: &str, page: &ListingPage) -> String {
    let mut html = String::from(STYLE);
    html.push_str(&format!(
        "<h2>{} (Page {} of {})</h2><ul>",
        html_escape(title),
        page.page,
        page.total_pages
    ));

    for file in &page.files {
        html.push_str(&format!(
            r#"<li><a href="/download_file?filename={}">{}</a></li>"#,
            urlencoding::encode(file),
            html_escape(file)
        ));
    }
    html.push_str("</ul>");

    // Paging controls
    html.push_str("<div style='margin-top:20px;'>");
    if let Some(prev) = page.previous_page() {
        html.push_str(&format!(r#"<a href="/files?page={}">Previous</a> "#, prev));
    }
    if let Some(next) = page.next_page() {
        html.push_str(&format!(r#"<a href="/files?page={}">Next</a>"#, next));
    }
    html.push_str("</div>");
    html
}

/// Render a one-paragraph notice, used for listing errors.
pub fn notice(text: &str) -> String {
    format!("<p>{}</p>", html_escape(text))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
