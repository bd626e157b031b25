use serde::{Deserialize, Deserializer, Serialize};

/// One prompt entry pulled out of an awesome-list document.
///
/// Optional text fields treat an empty string the same as a missing one, so
/// hand-edited cache files with `"preview": ""` load cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub attribution: String,
    #[serde(default)]
    pub origin_link: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
}

impl Record {
    /// A title-less record carrying every default the source supplies.
    /// The extractor clones it for each heading it opens.
    pub fn seeded(source: &SourceDescriptor) -> Self {
        Record {
            title: String::new(),
            preview: None,
            body: None,
            attribution: source.attribution.clone(),
            origin_link: source.origin_link(),
            mode: source.mode.clone(),
            category: source.category.clone(),
            sub_category: source.sub_category.clone(),
        }
    }

    /// Title plus at least one of body or preview.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && (non_empty(&self.body).is_some() || non_empty(&self.preview).is_some())
    }

    pub fn body_text(&self) -> Option<&str> {
        non_empty(&self.body)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Where a document lives and which defaults its records start with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub attribution: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_sub_category")]
    pub sub_category: String,
}

fn default_mode() -> String {
    "generate".into()
}

fn default_category() -> String {
    "image".into()
}

fn default_sub_category() -> String {
    "general".into()
}

const RAW_GITHUB_PREFIX: &str = "https://raw.githubusercontent.com/";

impl SourceDescriptor {
    /// Browsable counterpart of `location`.
    ///
    /// `raw.githubusercontent.com/<owner>/<repo>/<ref>/<path>` becomes
    /// `github.com/<owner>/<repo>/blob/<ref>/<path>`; a `/raw/` segment
    /// (GitHub and GitLab web URLs) becomes `/blob/`. Anything else is
    /// returned unchanged.
    pub fn origin_link(&self) -> String {
        if let Some(rest) = self.location.strip_prefix(RAW_GITHUB_PREFIX) {
            let mut parts = rest.splitn(3, '/');
            if let (Some(owner), Some(repo), Some(tail)) = (parts.next(), parts.next(), parts.next()) {
                return format!("https://github.com/{}/{}/blob/{}", owner, repo, tail);
            }
        }
        if self.location.contains("/raw/") {
            return self.location.replacen("/raw/", "/blob/", 1);
        }
        self.location.clone()
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn source(location: &str) -> SourceDescriptor {
        SourceDescriptor {
            name: "test".into(),
            location: location.into(),
            attribution: "someone".into(),
            mode: default_mode(),
            category: default_category(),
            sub_category: default_sub_category(),
        }
    }

    #[test]
    fn raw_github_becomes_blob() {
        let s = source("https://raw.githubusercontent.com/acme/prompts/main/docs/README.md");
        assert_eq!(s.origin_link(), "https://github.com/acme/prompts/blob/main/docs/README.md");
    }

    #[test]
    fn raw_segment_becomes_blob() {
        let s = source("https://gitlab.com/acme/prompts/-/raw/main/README.md");
        assert_eq!(s.origin_link(), "https://gitlab.com/acme/prompts/-/blob/main/README.md");
    }

    #[test]
    fn other_locations_unchanged() {
        let s = source("https://example.com/list.md");
        assert_eq!(s.origin_link(), "https://example.com/list.md");
    }

    #[test]
    fn seeded_copies_defaults() {
        let s = source("https://raw.githubusercontent.com/acme/prompts/main/README.md");
        let r = Record::seeded(&s);
        assert!(r.title.is_empty());
        assert_eq!(r.attribution, "someone");
        assert_eq!(r.origin_link, "https://github.com/acme/prompts/blob/main/README.md");
        assert_eq!(r.category, "image");
        assert!(!r.is_complete());
    }

    #[test]
    fn camel_case_field_names() {
        let mut r = Record::seeded(&source("https://example.com/a.md"));
        r.title = "T".into();
        r.body = Some("b".into());
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("originLink").is_some());
        assert!(json.get("subCategory").is_some());
        assert!(json.get("preview").is_none());
    }

    #[test]
    fn empty_strings_load_as_none() {
        let r: Record =
            serde_json::from_str(r#"{"title":"A","preview":"","body":"  ","mode":"m"}"#).unwrap();
        assert_eq!(r.preview, None);
        assert_eq!(r.body, None);
        assert_eq!(r.mode, "m");
        assert!(!r.is_complete());
    }
}
