//! Local threat list consulted before the remote lookup.
//!
//! One entry per line. Blank lines and lines starting with `#` are ignored.
//! An entry containing `://` is a URL prefix; anything else is a host name
//! that also matches its subdomains.
//!
//! ```text
//! # known phishing
//! malware.test
//! https://example.org/download/
//! ```

use std::collections::HashSet;
use std::path::Path;
use url::Url;

use super::service::SafetyError;

#[derive(Debug, Clone, Default)]
pub struct ThreatList {
    hosts: HashSet<String>,
    prefixes: Vec<String>,
}

impl ThreatList {
    /// Reads and parses a threat list file.
    ///
    /// # Errors
    ///
    /// Returns [`SafetyError::ThreatList`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, SafetyError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SafetyError::ThreatList(format!("{}: {e}", path.display())))?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut list = Self::default();

        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.contains("://") {
                list.prefixes.push(line.to_ascii_lowercase());
            } else {
                list.hosts
                    .insert(line.trim_end_matches('.').to_ascii_lowercase());
            }
        }

        list
    }

    pub fn len(&self) -> usize {
        self.hosts.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the entry that flags `url`, if any.
    pub fn find_match(&self, url: &str) -> Option<String> {
        let lowered = url.to_ascii_lowercase();

        if let Some(prefix) = self.prefixes.iter().find(|p| lowered.starts_with(p.as_str())) {
            return Some(prefix.clone());
        }

        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();

        let mut candidate = host.as_str();
        loop {
            if self.hosts.contains(candidate) {
                return Some(candidate.to_string());
            }
            match candidate.split_once('.') {
                Some((_, parent)) if !parent.is_empty() => candidate = parent,
                _ => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "
        # comment
        malware.test

        https://example.org/download/
        Phish.Example.
    ";

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let list = ThreatList::parse(LIST);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_host_and_subdomain_match() {
        let list = ThreatList::parse(LIST);

        assert_eq!(
            list.find_match("https://malware.test/x").as_deref(),
            Some("malware.test")
        );
        assert_eq!(
            list.find_match("http://cdn.malware.test").as_deref(),
            Some("malware.test")
        );
        assert!(list.find_match("https://phish.example/login").is_some());
        assert!(list.find_match("https://notmalware.test").is_none());
    }

    #[test]
    fn test_prefix_match() {
        let list = ThreatList::parse(LIST);

        assert!(list.find_match("https://example.org/download/tool.exe").is_some());
        assert!(list.find_match("https://example.org/about").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ThreatList::load(Path::new("/nonexistent/threats.txt")).unwrap_err();
        assert!(matches!(err, SafetyError::ThreatList(_)));
    }
}
