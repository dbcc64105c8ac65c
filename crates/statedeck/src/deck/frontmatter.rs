use serde::Deserialize;

/// Deck-level settings from the optional YAML header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Split a `---`-delimited YAML header from the body.
///
/// A document without a header yields default metadata and the whole text.
pub fn extract(content: &str) -> Result<(DeckMeta, String), serde_yaml::Error> {
    let content = content.replace("\r\n", "\n");
    let Some(rest) = content.strip_prefix("---\n") else {
        return Ok((DeckMeta::default(), content));
    };
    let Some(end) = find_closing(rest) else {
        return Ok((DeckMeta::default(), content));
    };

    let yaml = &rest[..end];
    let body = rest[end..]
        .split_once('\n')
        .map(|(_, b)| b)
        .unwrap_or("")
        .to_string();

    let meta = if yaml.trim().is_empty() {
        DeckMeta::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    Ok((meta, body))
}

/// Byte offset of the closing `---` line.
fn find_closing(rest: &str) -> Option<usize> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_header() {
        let (meta, body) =
            extract("---\ntitle: Hardware Prototyping\ntheme: dark\n---\n# Intro\n").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hardware Prototyping"));
        assert_eq!(meta.theme.as_deref(), Some("dark"));
        assert_eq!(body, "# Intro\n");
    }

    #[test]
    fn test_no_header() {
        let (meta, body) = extract("# Intro\n\nHello").unwrap();
        assert_eq!(meta, DeckMeta::default());
        assert_eq!(body, "# Intro\n\nHello");
    }

    #[test]
    fn test_unclosed_header_is_body() {
        let (meta, body) = extract("---\ntitle: x\n").unwrap();
        assert_eq!(meta, DeckMeta::default());
        assert!(body.starts_with("---"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(extract("---\ntitle: [unclosed\n---\nbody").is_err());
    }
}
