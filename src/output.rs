//! LED output adapters

use core::fmt::Debug;

use smart_leds::SmartLedsWrite;

use crate::LedDriver;
use crate::color::Rgb;

/// Drives any `smart-leds` strip (WS2812 and friends)
///
/// Write errors are logged and dropped; the next frame simply tries again.
pub struct SmartLedsOutput<W> {
    writer: W,
}

impl<W> SmartLedsOutput<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Release the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> LedDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    fn show(&mut self, colors: &[Rgb]) {
        if let Err(err) = self.writer.write(colors.iter().copied()) {
            log::debug!("led write failed: {:?}", err);
        }
    }
}
