use std::collections::BTreeMap;

use image::{imageops, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::adaptive_threshold;
use imageproc::drawing::draw_line_segment_mut;
use imageproc::geometry::min_area_rect;

use crate::calibration::ScaleFactor;
use crate::font;
use crate::geometry::{polygon_area, RotatedRect};
use crate::types::ObjectMeasurement;

/// Extracts object contours from a frame and converts their bounding
/// geometry to metric units when a scale factor is available.
pub struct ContourMeasurer {
    min_contour_area: f64,
    block_radius: u32,
    box_color: Rgb<u8>,
    label_scale: usize,
}

impl ContourMeasurer {
    pub fn new(
        min_contour_area: f64,
        block_radius: u32,
        box_color: Rgb<u8>,
        label_scale: usize,
    ) -> Self {
        Self {
            min_contour_area,
            block_radius,
            box_color,
            label_scale,
        }
    }

    /// Measures every foreground shape in the frame. Returns an annotated
    /// copy to display and the per-object measurements, keyed by discovery
    /// order. The input frame is left untouched, so re-measuring the same
    /// frame with the same scale factor yields the same mapping.
    pub fn measure(
        &self,
        frame: &RgbImage,
        scale: Option<ScaleFactor>,
    ) -> (RgbImage, BTreeMap<usize, ObjectMeasurement>) {
        let gray = imageops::grayscale(frame);

        // Local-mean threshold rather than a global one: the scenes this
        // runs on have uneven illumination. Inverting afterwards makes dark
        // shapes on a light background the foreground.
        let mut binary = adaptive_threshold(&gray, self.block_radius);
        imageops::invert(&mut binary);

        let contours = find_contours::<i32>(&binary);

        let mut annotated = frame.clone();
        let mut measurements = BTreeMap::new();

        for contour in contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        {
            if polygon_area(&contour.points) < self.min_contour_area {
                continue; // thresholding noise
            }

            let rect = RotatedRect::from_corners(min_area_rect(&contour.points));
            let width_m = scale.map(|s| s.to_meters(rect.width));
            let height_m = scale.map(|s| s.to_meters(rect.height));

            self.draw_box(&mut annotated, &rect);

            let mut label = format!("W: {:.1}px", rect.width);
            if let Some(w_m) = width_m {
                label.push_str(&format!(" ({:.1}cm)", w_m * 100.0));
            }
            self.draw_label(&mut annotated, &rect, &label);

            let id = measurements.len();
            measurements.insert(
                id,
                ObjectMeasurement {
                    width_px: rect.width,
                    height_px: rect.height,
                    width_m,
                    height_m,
                    center: rect.center,
                    angle_deg: rect.angle_deg,
                },
            );
        }

        (annotated, measurements)
    }

    fn draw_box(&self, frame: &mut RgbImage, rect: &RotatedRect) {
        for i in 0..4 {
            let a = rect.corners[i];
            let b = rect.corners[(i + 1) % 4];
            draw_line_segment_mut(frame, (a.x, a.y), (b.x, b.y), self.box_color);
        }
    }

    fn draw_label(&self, frame: &mut RgbImage, rect: &RotatedRect, label: &str) {
        // Center the label on the rectangle center.
        let text_width = font::measure_text_width(label, self.label_scale) as i32;
        let x = rect.center.x as i32 - text_width / 2;
        let y = rect.center.y as i32;
        if y < 0 {
            return;
        }
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let color = (self.box_color[0], self.box_color[1], self.box_color[2]);
        font::draw_text_line(
            frame,
            width,
            height,
            x.max(0) as usize,
            y as usize,
            label,
            color,
            self.label_scale,
        );
    }
}
