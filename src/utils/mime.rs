//! MIME type display utilities.

/// Get an icon string for a MIME type.
pub fn mime_icon(mime: &str) -> &'static str {
    match mime {
        "application/pdf" => "[pdf]",
        m if m.starts_with("image/") => "[img]",
        m if m.contains("word") => "[doc]",
        m if m.contains("excel") || m.contains("spreadsheet") => "[xls]",
        "text/html" => "[htm]",
        "text/plain" => "[txt]",
        "message/rfc822" => "[eml]",
        "application/zip" | "application/x-zip" | "application/x-zip-compressed" => "[zip]",
        _ => "[---]",
    }
}
