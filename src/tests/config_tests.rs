#[cfg(test)]
mod tests {
    use crate::config::{AudioConfig, Config};

    #[test]
    fn test_default_audio_config() {
        let config = AudioConfig::default();
        assert!(config.music_enabled);
        assert!(config.sound_enabled);
        assert!((config.volume - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::default();
        config.audio.volume = 0.8;
        config.audio.music_enabled = false;

        let serialized = toml::to_string_pretty(&config).expect("serialize");
        let parsed: Config = toml::from_str(&serialized).expect("parse");

        assert!(!parsed.audio.music_enabled);
        assert!(parsed.audio.sound_enabled);
        assert!((parsed.audio.volume - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_file_contents_fail_parse() {
        // Broken config files must surface as parse errors, which the loader
        // downgrades to defaults
        assert!(toml::from_str::<Config>("audio = 3").is_err());
    }
}
