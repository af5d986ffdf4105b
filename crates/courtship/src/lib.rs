pub mod audio;
pub mod carousel;
pub mod control;
pub mod evasion;
pub mod experience;
mod macros;
pub mod media;
pub mod popup;
pub mod presentation;
pub mod push;
pub mod settings;
pub mod stage;
pub mod timer;

pub use audio::{AudioArbiter, Channel, ChannelState, Channels, Volumes};
pub use evasion::{Bounds, Offset};
pub use experience::Experience;
pub use media::{MediaChannel, MemoryChannel, PlayRejected};
pub use popup::PopupState;
pub use presentation::Presentation;
pub use push::PushState;
pub use settings::{AssetRef, Assets, Settings, SettingsError, Tuning};
pub use stage::Stage;
pub use timer::{ManualScheduler, Scheduler, TimerId, TimerKind};
