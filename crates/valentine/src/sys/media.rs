use courtship::{MediaChannel, PlayRejected};
use gtk::prelude::*;
use gtk4 as gtk;
use std::path::Path;

/// One audio file played through GTK's media backend.
pub struct GtkChannel {
    label: &'static str,
    stream: gtk::MediaFile,
}

impl GtkChannel {
    pub fn open(label: &'static str, path: &Path) -> Self {
        if !path.exists() {
            log::warn!("{} audio not found at {}", label, path.display());
        }
        Self {
            label,
            stream: gtk::MediaFile::for_filename(path),
        }
    }
}

impl MediaChannel for GtkChannel {
    fn play(&mut self) -> Result<(), PlayRejected> {
        if let Some(err) = self.stream.error() {
            return Err(PlayRejected::new(format!("{}: {}", self.label, err)));
        }
        self.stream.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.stream.pause();
    }

    fn seek_to_start(&mut self) {
        if self.stream.is_seekable() {
            self.stream.seek(0);
        }
    }

    fn set_volume(&mut self, volume: f64) {
        self.stream.set_volume(volume);
    }

    fn set_looping(&mut self, looping: bool) {
        self.stream.set_loop(looping);
    }
}
