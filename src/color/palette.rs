//! Named repulsor colors
//!
//! The order of [`PALETTE`] is the order colors are visited when cycling.

use super::{Rgb, rgb_from_u32};

pub const WHITE: Rgb = rgb_from_u32(0x00FF_FFFF);
pub const RED: Rgb = rgb_from_u32(0x00FF_0000);
pub const BLUE: Rgb = rgb_from_u32(0x0000_00FF);
pub const CYAN: Rgb = rgb_from_u32(0x0000_FFFF);
pub const YELLOW: Rgb = rgb_from_u32(0x00FF_FF00);
pub const GREEN: Rgb = rgb_from_u32(0x0000_FF00);
pub const PURPLE: Rgb = rgb_from_u32(0x00FF_00FF);
pub const ORANGE: Rgb = rgb_from_u32(0x00FF_8000);

/// Selectable repulsor colors, white first
pub const PALETTE: [Rgb; 8] = [WHITE, RED, BLUE, CYAN, YELLOW, GREEN, PURPLE, ORANGE];
