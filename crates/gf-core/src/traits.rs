use crate::face::LandmarkSet;
use crate::frame::Frame;

/// Fournit les frames décodées au pipeline, dans l'ordre.
///
/// Implémenté par : `GifSource`, `MemorySource`.
///
/// # Example
/// ```
/// use gf_core::traits::FrameSource;
/// use gf_core::frame::Frame;
///
/// struct Empty;
/// impl FrameSource for Empty {
///     fn next_frame(&mut self) -> Option<Frame> { None }
///     fn frame_count(&self) -> usize { 0 }
///     fn native_size(&self) -> (u32, u32) { (0, 0) }
/// }
/// ```
pub trait FrameSource: Send {
    /// Prochaine frame, `None` une fois la séquence épuisée.
    fn next_frame(&mut self) -> Option<Frame>;

    /// Total number of frames in the sequence.
    fn frame_count(&self) -> usize;

    /// Dimensions communes à toutes les frames.
    fn native_size(&self) -> (u32, u32);
}

/// Détecteur de points faciaux, collaborateur externe.
///
/// Zero sets is a normal answer (no face in the frame).
///
/// # Example
/// ```
/// use gf_core::traits::LandmarkProvider;
/// use gf_core::frame::Frame;
/// use gf_core::face::LandmarkSet;
///
/// struct Blind;
/// impl LandmarkProvider for Blind {
///     fn detect(&self, _frame: &Frame) -> Vec<LandmarkSet> { Vec::new() }
///     fn name(&self) -> &'static str { "blind" }
/// }
/// ```
pub trait LandmarkProvider: Send + Sync {
    /// Landmark sets found in `frame`, possibly none.
    fn detect(&self, frame: &Frame) -> Vec<LandmarkSet>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
