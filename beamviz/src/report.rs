//! This module implements the channel through which exporters tell the user
//! what they're doing. It is passed in explicitly instead of being global so
//! that callers (and tests) can redirect it.

use log::Level;

/// Something that accepts leveled progress notices.
pub trait Reporter {
  /// Reports a message at some level.
  fn notice(&self, level: Level, message: &str);

  /// Reports a warning.
  fn warn(&self, message: &str) {
    self.notice(Level::Warn, message);
  }

  /// Reports regular progress.
  fn info(&self, message: &str) {
    self.notice(Level::Info, message);
  }
}

/// Forwards notices to the `log` facade under this crate's target.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
  fn notice(&self, level: Level, message: &str) {
    log::log!(level, "{}", message);
  }
}

impl<R: Reporter + ?Sized> Reporter for &R {
  fn notice(&self, level: Level, message: &str) {
    (**self).notice(level, message);
  }
}
