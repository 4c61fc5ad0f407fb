//! HTML escaping for the server-rendered fragments

/// Escape text for element content and quoted attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Accept http(s) and same-site relative URLs; anything else is dropped
pub fn safe_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    // Browsers read `\` as `/`, so `/\host` is protocol-relative too
    let protocol_relative = trimmed.starts_with("//") || trimmed.starts_with("/\\");
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || (trimmed.starts_with('/') && !protocol_relative)
        || lower.starts_with("index.html");
    allowed.then(|| escape(trimmed))
}
