use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#{2,}(.*)$").unwrap());
static MD_IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(\s*<?([^)\s>]+)>?").unwrap());
static HTML_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).unwrap()
});
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// What a single document line means to the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `##` or deeper. Carries the stripped heading text, possibly empty.
    Heading { title: &'a str },
    /// Opening fence; `marker` is the full run of backticks or tildes.
    FenceOpen { marker: &'a str },
    /// `>` line. A quote can also carry an image.
    Quote { text: &'a str, image: Option<&'a str> },
    Image { url: &'a str },
    Other,
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(caps) = HEADING_RE.captures(line) {
        let title = caps.get(1).map_or("", |m| m.as_str().trim());
        return LineKind::Heading { title };
    }

    let trimmed = line.trim();
    if let Some(marker) = fence_marker(trimmed) {
        return LineKind::FenceOpen { marker };
    }

    let image = find_image(line);
    if let Some(rest) = trimmed.strip_prefix('>') {
        return LineKind::Quote {
            text: rest.trim(),
            image,
        };
    }

    match image {
        Some(url) => LineKind::Image { url },
        None => LineKind::Other,
    }
}

/// Leading run of three or more backticks or tildes.
pub fn fence_marker(trimmed: &str) -> Option<&str> {
    let first = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == first).count();
    (len >= 3).then(|| &trimmed[..len])
}

/// First image URL on the line. Markdown syntax wins over an HTML tag.
pub fn find_image(line: &str) -> Option<&str> {
    MD_IMAGE_RE
        .captures(line)
        .or_else(|| HTML_IMAGE_RE.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
}

/// Resolve an image reference against the document it came from.
///
/// Best effort only: `../` segments are kept as written and a leading `/`
/// is joined onto the document directory rather than the host root.
pub fn resolve_image_url(url: &str, document_location: &str) -> String {
    if SCHEME_RE.is_match(url) {
        return url.to_string();
    }

    if let Some(rest) = url.strip_prefix("//") {
        let scheme = document_location
            .split_once("://")
            .map_or("https", |(scheme, _)| scheme);
        return format!("{}://{}", scheme, rest);
    }

    let path_start = document_location.find("://").map_or(0, |i| i + 3);
    let base = match document_location[path_start..].rfind('/') {
        Some(i) => &document_location[..path_start + i],
        None => document_location,
    };

    let relative = url.strip_prefix("./").unwrap_or(url);
    if relative.starts_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

// ── Tests ──
