//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field has a default so a partial file, or no file at all, still
//! yields a usable configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Subtitle discovery and pairing.
    #[serde(default)]
    pub matching: MatchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tools: ToolSettings::default(),
            matching: MatchSettings::default(),
        }
    }
}

/// External tool configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSettings {
    /// Path to the mkvmerge executable. A bare name resolves via PATH.
    #[serde(default = "default_mkvmerge")]
    pub mkvmerge: String,
}

fn default_mkvmerge() -> String {
    "mkvmerge".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            mkvmerge: default_mkvmerge(),
        }
    }
}

impl ToolSettings {
    /// The configured mkvmerge path with a leading `~` expanded.
    pub fn mkvmerge_binary(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.mkvmerge).into_owned())
    }
}

/// Subtitle discovery and pairing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchSettings {
    /// Name of the directories that hold loose subtitles.
    #[serde(default = "default_subs_dir_name")]
    pub subs_dir_name: String,

    /// Filename marker to ISO 639-2 code, e.g. "english" -> "eng".
    #[serde(default = "default_language_markers")]
    pub language_markers: BTreeMap<String, String>,
}

fn default_subs_dir_name() -> String {
    "Subs".to_string()
}

fn default_language_markers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("english".to_string(), "eng".to_string()),
        ("dutch".to_string(), "dut".to_string()),
    ])
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            subs_dir_name: default_subs_dir_name(),
            language_markers: default_language_markers(),
        }
    }
}

impl MatchSettings {
    /// Look up the language code for a subtitle file stem.
    ///
    /// Markers match case-insensitively anywhere in the stem. With several
    /// markers present the alphabetically first one wins, so marker keys
    /// should not overlap.
    pub fn language_for_stem(&self, stem: &str) -> Option<&str> {
        let stem = stem.to_lowercase();
        self.language_markers
            .iter()
            .find(|(marker, _)| stem.contains(marker.to_lowercase().as_str()))
            .map(|(_, code)| code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_markers_cover_english_and_dutch() {
        let settings = MatchSettings::default();
        assert_eq!(settings.language_for_stem("2_English"), Some("eng"));
        assert_eq!(settings.language_for_stem("3_Dutch"), Some("dut"));
        assert_eq!(settings.language_for_stem("4_French"), None);
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        let settings = MatchSettings::default();
        assert_eq!(settings.language_for_stem("MOVIE.ENGLISH.FORCED"), Some("eng"));
    }

    #[test]
    fn mixed_case_marker_keys_still_match() {
        let settings: Settings = toml::from_str(
            r#"
            [matching.language_markers]
            English = "eng"
            "#,
        )
        .unwrap();

        assert_eq!(settings.matching.language_for_stem("movie.english"), Some("eng"));
        assert_eq!(settings.matching.language_for_stem("MOVIE.ENGLISH"), Some("eng"));
    }

    #[test]
    fn custom_markers_replace_the_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [matching.language_markers]
            german = "ger"
            "#,
        )
        .unwrap();

        assert_eq!(settings.matching.language_for_stem("show.german"), Some("ger"));
        assert_eq!(settings.matching.language_for_stem("show.english"), None);
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [tools]
            mkvmerge = "/opt/mkvtoolnix/bin/mkvmerge"
            "#,
        )
        .unwrap();

        assert_eq!(settings.tools.mkvmerge, "/opt/mkvtoolnix/bin/mkvmerge");
        assert_eq!(settings.matching.subs_dir_name, "Subs");
        assert!(!settings.matching.language_markers.is_empty());
    }

    #[test]
    fn tilde_is_expanded_in_the_binary_path() {
        let settings = ToolSettings {
            mkvmerge: "~/bin/mkvmerge".to_string(),
        };

        let binary = settings.mkvmerge_binary();
        assert!(!binary.to_string_lossy().starts_with('~'));
        assert!(binary.ends_with("bin/mkvmerge"));
    }
}
