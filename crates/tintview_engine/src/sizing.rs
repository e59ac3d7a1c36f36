use url::Url;

/// Query parameters that cap the size of images served by known photo hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizingRule {
    /// Case-insensitive substrings; any match anywhere in the URL applies the rule.
    pub hosts: Vec<String>,
    pub width: u32,
    pub quality: u8,
}

impl Default for SizingRule {
    fn default() -> Self {
        Self {
            hosts: vec!["unsplash.com".to_string()],
            width: 1080,
            quality: 80,
        }
    }
}

impl SizingRule {
    pub fn matches(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        self.hosts
            .iter()
            .any(|host| lower.contains(&host.to_ascii_lowercase()))
    }

    /// Sets `w` and `q` on matching URLs, replacing any values already present.
    /// Everything else, including URLs that do not parse, is returned unchanged.
    pub fn apply(&self, url: &str) -> String {
        if !self.matches(url) {
            return url.to_string();
        }
        let Ok(mut parsed) = Url::parse(url) else {
            return url.to_string();
        };

        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(key, _)| key != "w" && key != "q")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        {
            let mut pairs = parsed.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("w", &self.width.to_string());
            pairs.append_pair("q", &self.quality.to_string());
        }
        parsed.into()
    }
}

#[cfg(test)]
mod tests {
    use super::SizingRule;

    #[test]
    fn appends_params_to_matching_host() {
        let rule = SizingRule::default();
        assert_eq!(
            rule.apply("https://images.unsplash.com/photo-123"),
            "https://images.unsplash.com/photo-123?w=1080&q=80"
        );
    }

    #[test]
    fn substring_match_includes_path() {
        let rule = SizingRule::default();
        assert_eq!(
            rule.apply("https://img.example.com/unsplash.com/photo-1"),
            "https://img.example.com/unsplash.com/photo-1?w=1080&q=80"
        );
    }

    #[test]
    fn keeps_other_params_and_replaces_size() {
        let rule = SizingRule::default();
        assert_eq!(
            rule.apply("https://images.unsplash.com/photo-9?ixid=abc&w=4000&fm=jpg&q=100"),
            "https://images.unsplash.com/photo-9?ixid=abc&fm=jpg&w=1080&q=80"
        );
    }

    #[test]
    fn other_hosts_untouched() {
        let rule = SizingRule::default();
        let url = "https://cdn.example.org/cat.png?w=5000";
        assert_eq!(rule.apply(url), url);
    }

    #[test]
    fn unparsable_url_untouched() {
        let rule = SizingRule::default();
        assert_eq!(rule.apply("unsplash.com/photo"), "unsplash.com/photo");
    }

    #[test]
    fn host_match_is_case_insensitive() {
        let rule = SizingRule::default();
        assert!(rule.matches("https://IMAGES.UNSPLASH.COM/x"));
    }
}
