use std::fmt::Write as _;

use gf_core::frame::AsciiGrid;

/// Separator printed under every frame header.
pub const FRAME_DELIMITER: &str = "--------------------------------------------------";

/// One text block: header, delimiter, grid rows, blank line.
///
/// `index` is 0-based; headers number frames from 1.
///
/// # Example
/// ```
/// use gf_core::frame::AsciiGrid;
/// use gf_export::text::{FRAME_DELIMITER, frame_block};
///
/// let block = frame_block(0, 100, &AsciiGrid::new(3, 1));
/// assert_eq!(block, format!("Frame 1 (Delay: 100ms):\n{FRAME_DELIMITER}\n   \n\n"));
/// ```
#[must_use]
pub fn frame_block(index: usize, delay_ms: u32, grid: &AsciiGrid) -> String {
    let mut out = String::with_capacity(
        (usize::from(grid.width) + 1) * usize::from(grid.height) + FRAME_DELIMITER.len() + 32,
    );
    let _ = writeln!(out, "Frame {} (Delay: {delay_ms}ms):", index + 1);
    out.push_str(FRAME_DELIMITER);
    out.push('\n');
    for y in 0..grid.height {
        out.push_str(&grid.row_string(y));
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Concatenate the blocks of every frame, in order.
///
/// `delays_ms` pairs with `grids` by position.
#[must_use]
pub fn compose_text(grids: &[AsciiGrid], delays_ms: &[u32]) -> String {
    grids
        .iter()
        .zip(delays_ms)
        .enumerate()
        .map(|(i, (grid, &delay))| frame_block(i, delay, grid))
        .collect()
}
