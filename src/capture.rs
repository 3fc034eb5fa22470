use std::sync::{Arc, RwLock};

use image::RgbImage;
use tokio::time::Instant;

/// Immutable snapshot of one captured video frame.
///
/// Cloning shares the pixel buffer; nothing downstream can mutate it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Arc<RgbImage>,
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Arc::new(image),
            captured_at: Instant::now(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Live video source, polled by the scheduler on every tick.
pub trait FrameSource: Send + Sync + 'static {
    /// Latest decodable frame, or `None` while the source is not ready.
    fn current_frame(&self) -> Option<Frame>;
}

/// Single-slot frame holder the capture side publishes into. Each publish
/// replaces the previous frame; readers always see the newest one.
#[derive(Clone, Default)]
pub struct SharedFrameSource {
    slot: Arc<RwLock<Option<Frame>>>,
}

impl SharedFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, image: RgbImage) {
        *self.slot.write().unwrap() = Some(Frame::new(image));
    }

    /// Mark the source as not ready (camera stopped or lost).
    pub fn clear(&self) {
        *self.slot.write().unwrap() = None;
    }
}

impl FrameSource for SharedFrameSource {
    fn current_frame(&self) -> Option<Frame> {
        self.slot.read().unwrap().clone()
    }
}
