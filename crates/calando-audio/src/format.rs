//! Audio format detection from file extensions.

use std::path::Path;

/// Audio container/codec kinds recognized by file extension.
///
/// Detection never inspects file contents; a mislabelled file is only
/// caught later when decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mod,
    Midi,
    Ogg,
    Mp3,
    Flac,
    Aiff,
    Raw,
    /// Unrecognized or missing extension.
    Others,
}

impl AudioFormat {
    /// Detect the format from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Self::Others;
        };
        match ext.to_ascii_lowercase().as_str() {
            "wav" => Self::Wav,
            "mod" => Self::Mod,
            "mid" | "midi" => Self::Midi,
            "ogg" => Self::Ogg,
            "mp3" => Self::Mp3,
            "flac" => Self::Flac,
            "aiff" => Self::Aiff,
            "raw" => Self::Raw,
            _ => Self::Others,
        }
    }

    /// Whether the decode layer can load this format.
    pub fn is_decodable(self) -> bool {
        matches!(self, Self::Wav | Self::Mp3 | Self::Flac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_known_extensions() {
        assert_eq!(AudioFormat::from_path(Path::new("bgm.wav")), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_path(Path::new("track.mp3")), AudioFormat::Mp3);
        assert_eq!(AudioFormat::from_path(Path::new("loop.flac")), AudioFormat::Flac);
        assert_eq!(AudioFormat::from_path(Path::new("theme.ogg")), AudioFormat::Ogg);
        assert_eq!(AudioFormat::from_path(Path::new("chip.mod")), AudioFormat::Mod);
        assert_eq!(AudioFormat::from_path(Path::new("score.mid")), AudioFormat::Midi);
        assert_eq!(AudioFormat::from_path(Path::new("score.midi")), AudioFormat::Midi);
        assert_eq!(AudioFormat::from_path(Path::new("stab.aiff")), AudioFormat::Aiff);
        assert_eq!(AudioFormat::from_path(Path::new("dump.raw")), AudioFormat::Raw);
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(AudioFormat::from_path(Path::new("song.WAV")), AudioFormat::Wav);
        assert_eq!(AudioFormat::from_path(Path::new("song.FlAc")), AudioFormat::Flac);
    }

    #[test]
    fn unknown_or_missing_extension_is_others() {
        assert_eq!(AudioFormat::from_path(Path::new("track.xyz")), AudioFormat::Others);
        assert_eq!(AudioFormat::from_path(Path::new("noext")), AudioFormat::Others);
        assert_eq!(AudioFormat::from_path(Path::new("")), AudioFormat::Others);
    }

    #[test]
    fn only_wav_mp3_flac_are_decodable() {
        assert!(AudioFormat::Wav.is_decodable());
        assert!(AudioFormat::Mp3.is_decodable());
        assert!(AudioFormat::Flac.is_decodable());
        assert!(!AudioFormat::Ogg.is_decodable());
        assert!(!AudioFormat::Midi.is_decodable());
        assert!(!AudioFormat::Others.is_decodable());
    }
}
