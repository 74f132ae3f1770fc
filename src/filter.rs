use regex::Regex;

/// Decides which hrefs count as reel links
#[derive(Debug)]
pub struct LinkFilter {
    marker: String,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a filter from a path marker and regex exclude patterns
    pub fn new(marker: &str, exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            marker: marker.to_string(),
            exclude_regexes,
        })
    }

    /// Filter that only checks for the marker
    pub fn marker(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            exclude_regexes: Vec::new(),
        }
    }

    /// True if the href contains the marker and matches no exclude pattern
    pub fn accepts(&self, href: &str) -> bool {
        if !href.contains(&self.marker) {
            return false;
        }

        // Exclusions take precedence
        !self.exclude_regexes.iter().any(|regex| regex.is_match(href))
    }
}
