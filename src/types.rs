/// A single pixel position. Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One measured object in one frame. Ids are discovery-order indices and are
/// only meaningful within the frame they came from; nothing tracks objects
/// across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeasurement {
    /// Raw side lengths of the minimum-area bounding rectangle. Not
    /// guaranteed to match the visually "horizontal" width; `angle_deg`
    /// disambiguates.
    pub width_px: f64,
    pub height_px: f64,
    /// `None` until the session has been calibrated.
    pub width_m: Option<f64>,
    pub height_m: Option<f64>,
    pub center: Point2D,
    pub angle_deg: f64,
}

/// Discrete input events reported by the display surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Quit,
    CalibrationStart,
    Capture,
    ResumeLive,
    PointerClick(Point2D),
}
