//! Video metadata as reported by the extractor.

use indexmap::IndexMap;
use serde::Deserialize;

/// Folder name used when a video has no usable title.
pub const FALLBACK_TITLE: &str = "MyVideo";

/// One automatic caption rendition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionTrack {
    pub url: String,
    #[serde(default)]
    pub ext: Option<String>,
}

#[derive(Deserialize)]
struct RawInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    automatic_captions: Option<IndexMap<String, Vec<CaptionTrack>>>,
}

/// Metadata of a single video.
///
/// The original JSON is kept verbatim so the download step can hand it
/// back to the extractor without a second network round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: Option<String>,
    /// Raw language tag, e.g. `en-US`.
    pub language: Option<String>,
    /// Caption tracks keyed by language, in the order the extractor listed them.
    pub automatic_captions: IndexMap<String, Vec<CaptionTrack>>,
    pub json: String,
}

impl VideoInfo {
    /// Parse an info JSON document.
    pub fn from_json(json: impl Into<String>) -> Result<Self, serde_json::Error> {
        let json = json.into();
        let raw: RawInfo = serde_json::from_str(&json)?;
        Ok(Self {
            title: raw.title,
            language: raw.language,
            automatic_captions: raw.automatic_captions.unwrap_or_default(),
            json,
        })
    }

    /// Title to use for the work folder, before sanitization.
    pub fn folder_title(&self) -> &str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(FALLBACK_TITLE)
    }

    /// Primary language subtag, lowercased.
    pub fn language_code(&self) -> Option<String> {
        self.language.as_deref().and_then(normalize_language)
    }
}

/// `"en-US"` becomes `"en"`. Empty tags yield `None`.
pub fn normalize_language(tag: &str) -> Option<String> {
    let primary = tag.trim().to_lowercase();
    let primary = primary.split('-').next().unwrap_or_default();
    (!primary.is_empty()).then(|| primary.to_string())
}

/// URL of the caption track to fetch when the written subtitle is in the
/// wrong language: the last rendition of the first track whose key starts
/// with `language`.
pub fn caption_repair_url(
    captions: &IndexMap<String, Vec<CaptionTrack>>,
    language: &str,
) -> Option<String> {
    captions
        .iter()
        .find(|(key, _)| key.starts_with(language))
        .and_then(|(_, tracks)| tracks.last())
        .map(|track| track.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = r#"{
        "id": "abc",
        "title": "A talk",
        "language": "en-US",
        "automatic_captions": {
            "de": [{"ext": "vtt", "url": "https://c/de.vtt"}],
            "en-orig": [
                {"ext": "json3", "url": "https://c/en.json3"},
                {"ext": "vtt", "url": "https://c/en.vtt"}
            ],
            "en": [{"ext": "vtt", "url": "https://c/en-second.vtt"}]
        }
    }"#;

    #[test]
    fn test_normalize_language() {
        assert_eq!(normalize_language("en-US").as_deref(), Some("en"));
        assert_eq!(normalize_language("ZH-Hans-CN").as_deref(), Some("zh"));
        assert_eq!(normalize_language("fr").as_deref(), Some("fr"));
        assert_eq!(normalize_language("  "), None);
    }

    #[test]
    fn test_caption_key_order_is_preserved() {
        let info = tokio_test::assert_ok!(VideoInfo::from_json(INFO));
        let keys: Vec<_> = info.automatic_captions.keys().cloned().collect();
        assert_eq!(keys, ["de", "en-orig", "en"]);
    }

    #[test]
    fn test_repair_url_is_last_track_of_first_matching_key() {
        let info = VideoInfo::from_json(INFO).unwrap();
        let lang = info.language_code().unwrap();
        assert_eq!(
            caption_repair_url(&info.automatic_captions, &lang).as_deref(),
            Some("https://c/en.vtt")
        );
        assert_eq!(caption_repair_url(&info.automatic_captions, "ja"), None);
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let info = VideoInfo::from_json(r#"{"title": "   ", "automatic_captions": null}"#).unwrap();
        assert_eq!(info.folder_title(), FALLBACK_TITLE);
        assert_eq!(info.language_code(), None);
        assert!(info.automatic_captions.is_empty());
    }
}
