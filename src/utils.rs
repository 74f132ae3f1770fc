/// Convert a diagram title to a file stem, e.g. "Web Service" -> "web_service"
pub fn diagram_filename(title: &str) -> String {
    let mut name = title.trim().to_lowercase().replace(' ', "_");
    name = name.replace(['/', ':', '?', '&', '=', '#', '%', '\\'], "_");

    // Limit filename length
    if name.len() > 100 {
        name.chars().take(100).collect()
    } else {
        name
    }
}
