use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

/// Opaque reference to an asset. Never interpreted by the state machine.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AssetRef(String);

crate::impl_string_newtype!(AssetRef);

/// Largest evasion bound, in pixels, on either axis.
pub const MAX_EVASION_BOUND: f64 = 10_000.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("At least one carousel image is required")]
    NoImages,
    #[error("Miss threshold must be at least 1")]
    ZeroThreshold,
    #[error("Timer '{0}' must have a non-zero duration")]
    ZeroInterval(&'static str),
    #[error("Evasion bound '{name}' must lie in [0, {MAX_EVASION_BOUND}], got {value}")]
    InvalidBound { name: &'static str, value: f64 },
    #[error("Volume '{name}' must lie in [0, 1], got {value}")]
    InvalidVolume { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tuning {
    pub reveal_delay_ms: u64,
    pub evasion_max_x: f64,
    pub evasion_max_y: f64,
    pub miss_threshold: u32,
    pub push_interval_ms: u64,
    pub carousel_interval_ms: u64,
    pub background_volume: f64,
    pub decline_volume: f64,
    pub accept_volume: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 1050,
            evasion_max_x: 110.0,
            evasion_max_y: 55.0,
            miss_threshold: 5,
            push_interval_ms: 520,
            carousel_interval_ms: 2200,
            background_volume: 0.33,
            decline_volume: 0.7,
            accept_volume: 0.85,
        }
    }
}

impl Tuning {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn push_interval(&self) -> Duration {
        Duration::from_millis(self.push_interval_ms)
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_millis(self.carousel_interval_ms)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.miss_threshold == 0 {
            return Err(SettingsError::ZeroThreshold);
        }

        for (name, ms) in [
            ("reveal_delay_ms", self.reveal_delay_ms),
            ("push_interval_ms", self.push_interval_ms),
            ("carousel_interval_ms", self.carousel_interval_ms),
        ] {
            if ms == 0 {
                return Err(SettingsError::ZeroInterval(name));
            }
        }

        for (name, value) in [
            ("evasion_max_x", self.evasion_max_x),
            ("evasion_max_y", self.evasion_max_y),
        ] {
            if !(0.0..=MAX_EVASION_BOUND).contains(&value) {
                return Err(SettingsError::InvalidBound { name, value });
            }
        }

        for (name, value) in [
            ("background_volume", self.background_volume),
            ("decline_volume", self.decline_volume),
            ("accept_volume", self.accept_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::InvalidVolume { name, value });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Assets {
    pub images: Vec<AssetRef>,
    pub video: AssetRef,
    pub background_audio: AssetRef,
    pub decline_audio: AssetRef,
    pub accept_audio: AssetRef,
    pub decline_image: AssetRef,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            images: ["yes1.png", "yes2.png", "yes3.png"]
                .into_iter()
                .map(AssetRef::new)
                .collect(),
            video: AssetRef::new("yes_video.mp4"),
            background_audio: AssetRef::new("bg.mp3"),
            decline_audio: AssetRef::new("no_song.wav"),
            accept_audio: AssetRef::new("yes_song.mp3"),
            decline_image: AssetRef::new("rejection.jpeg"),
        }
    }
}

impl Assets {
    pub fn image_count(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.images.len())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub tuning: Tuning,
    pub assets: Assets,
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.assets.images.is_empty() {
            return Err(SettingsError::NoImages);
        }
        self.tuning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.tuning.reveal_delay(), Duration::from_millis(1050));
        assert_eq!(settings.assets.image_count().map(NonZeroUsize::get), Some(3));
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let json = r#"{ "tuning": { "miss_threshold": 3 }, "assets": { "images": ["a.png"] } }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.tuning.miss_threshold, 3);
        assert_eq!(settings.tuning.push_interval_ms, 520);
        assert_eq!(settings.assets.images, vec![AssetRef::new("a.png")]);
        assert_eq!(settings.assets.video.as_str(), "yes_video.mp4");
    }

    fn tuned(mutate: impl FnOnce(&mut Tuning)) -> Settings {
        let mut settings = Settings::default();
        mutate(&mut settings.tuning);
        settings
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::default();
        settings.assets.images.clear();
        assert_eq!(settings.validate(), Err(SettingsError::NoImages));

        assert_eq!(
            tuned(|t| t.miss_threshold = 0).validate(),
            Err(SettingsError::ZeroThreshold)
        );
        assert_eq!(
            tuned(|t| t.push_interval_ms = 0).validate(),
            Err(SettingsError::ZeroInterval("push_interval_ms"))
        );
        assert_eq!(
            tuned(|t| t.evasion_max_y = -1.0).validate(),
            Err(SettingsError::InvalidBound {
                name: "evasion_max_y",
                value: -1.0
            })
        );
        assert_eq!(
            tuned(|t| t.evasion_max_x = f64::MAX).validate(),
            Err(SettingsError::InvalidBound {
                name: "evasion_max_x",
                value: f64::MAX
            })
        );
        assert!(matches!(
            tuned(|t| t.evasion_max_x = f64::NAN).validate(),
            Err(SettingsError::InvalidBound { .. })
        ));
        assert_eq!(tuned(|t| t.evasion_max_y = MAX_EVASION_BOUND).validate(), Ok(()));
        assert_eq!(
            tuned(|t| t.accept_volume = 1.5).validate(),
            Err(SettingsError::InvalidVolume {
                name: "accept_volume",
                value: 1.5
            })
        );
    }
}
