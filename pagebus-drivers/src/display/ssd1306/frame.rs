//! Frame buffer layout
//!
//! One byte covers 8 vertically stacked pixels of a column (LSB on top).
//! Bytes run column by column across a page, pages run top to bottom:
//! byte `page * WIDTH + column`.

/// Display width in pixels
pub const WIDTH: usize = 128;

/// Display height in pixels
pub const HEIGHT: usize = 64;

/// Number of 8-pixel pages
pub const PAGES: usize = HEIGHT / 8;

/// Bytes in a full frame
pub const FRAME_LEN: usize = WIDTH * PAGES;

/// Full display image, owned by the caller
pub type FrameBuffer = [u8; FRAME_LEN];

/// All-dark frame
pub const fn blank_frame() -> FrameBuffer {
    [0; FRAME_LEN]
}
