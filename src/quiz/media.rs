// src/quiz/media.rs

use regex::Regex;
use url::Url;

use crate::quiz::MediaRef;

/// Storage bucket holding call recordings.
const AUDIO_BUCKET: &str = "zvuk";

/// Storage bucket holding photographs.
const IMAGE_BUCKET: &str = "slike";

/// Photographer credits, keyed by the 2-3 letter prefix of the image
/// file name (e.g. "JNA_kos_03" is credited to Jelena Nikolić Antonijević).
const AUTHOR_CODES: &[(&str, &str)] = &[
    ("JNA", "Jelena Nikolić Antonijević"),
    ("BO", "Boris Okanović"),
    ("MM", "Miroslav Mareš"),
    ("EK", "Ekaterina Krasnova"),
    ("ZN", "Zorana Nikodijević"),
    ("DS", "Dragan Stanojević"),
    ("MR", "Mirjana Rankov"),
];

/// Resolves media identifiers into fetchable URLs under a fixed external
/// storage path template, and image file names into author attributions.
/// Shapes URLs only; reachability is not validated.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    base: Url,
    author_prefix: Regex,
}

impl MediaResolver {
    pub fn new(storage_base_url: &str) -> Result<Self, url::ParseError> {
        // Ensure a trailing slash so Url::join keeps the last path segment.
        let normalized = if storage_base_url.ends_with('/') {
            storage_base_url.to_string()
        } else {
            format!("{}/", storage_base_url)
        };
        let base = Url::parse(&normalized)?;
        let author_prefix = Regex::new(r"^([A-Z]{2,3})_").expect("author prefix pattern is valid");
        Ok(MediaResolver {
            base,
            author_prefix,
        })
    }

    /// Audio for a species is a single deterministic file named after its
    /// Latin name.
    pub fn audio(&self, name_latin: &str) -> MediaRef {
        let url = self
            .base
            .join(&format!("{}/{}.mp3", AUDIO_BUCKET, name_latin))
            .map(|u| u.to_string())
            .unwrap_or_default();
        MediaRef { url, author: None }
    }

    /// An image file key resolves to a URL plus an optional author credit.
    /// An empty file key yields an empty media reference, not an error.
    pub fn image(&self, file_name: &str) -> MediaRef {
        if file_name.is_empty() {
            return MediaRef::default();
        }
        let url = self
            .base
            .join(&format!("{}/{}.jpg", IMAGE_BUCKET, file_name))
            .map(|u| u.to_string())
            .unwrap_or_default();
        MediaRef {
            url,
            author: self.author_for(file_name),
        }
    }

    /// Matches the file name prefix against the author code table.
    /// Unknown prefixes yield no attribution.
    pub fn author_for(&self, file_name: &str) -> Option<String> {
        let code = self
            .author_prefix
            .captures(file_name)
            .and_then(|c| c.get(1))?
            .as_str();
        AUTHOR_CODES
            .iter()
            .find(|(prefix, _)| *prefix == code)
            .map(|(_, name)| (*name).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> MediaResolver {
        MediaResolver::new("https://storage.example.com/object/public").unwrap()
    }

    #[test]
    fn audio_url_derives_from_latin_name() {
        let media = resolver().audio("Turdus merula");
        assert_eq!(
            media.url,
            "https://storage.example.com/object/public/zvuk/Turdus%20merula.mp3"
        );
        assert!(media.author.is_none());
    }

    #[test]
    fn image_url_and_author_resolve() {
        let media = resolver().image("JNA_kos_03");
        assert_eq!(
            media.url,
            "https://storage.example.com/object/public/slike/JNA_kos_03.jpg"
        );
        assert_eq!(media.author.as_deref(), Some("Jelena Nikolić Antonijević"));
    }

    #[test]
    fn unknown_author_prefix_yields_no_attribution() {
        let media = resolver().image("XYZQ_kos_01");
        assert!(media.author.is_none());

        // Lowercase prefixes are not author codes.
        assert!(resolver().author_for("jna_kos_03").is_none());
    }

    #[test]
    fn empty_file_key_yields_empty_media() {
        let media = resolver().image("");
        assert_eq!(media.url, "");
        assert!(media.author.is_none());
    }

    #[test]
    fn base_url_without_trailing_slash_is_normalized() {
        let a = MediaResolver::new("https://s.example.com/public").unwrap();
        let b = MediaResolver::new("https://s.example.com/public/").unwrap();
        assert_eq!(a.audio("Parus major").url, b.audio("Parus major").url);
    }
}
