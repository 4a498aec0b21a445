use image::{Rgb, RgbImage};

use rusty_ruler::calibration::calibrate;
use rusty_ruler::measure::ContourMeasurer;
use rusty_ruler::types::Point2D;

/// White frame with one filled dark rectangle, the kind of scene the live
/// loop feeds the measurer every tick.
fn frame_with_rect(x: u32, y: u32, w: u32, h: u32) -> RgbImage {
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([255, 255, 255]));
    for py in y..y + h {
        for px in x..x + w {
            frame.put_pixel(px, py, Rgb([0, 0, 0]));
        }
    }
    frame
}

#[test]
fn measure_then_calibrate_then_measure() {
    let measurer = ContourMeasurer::new(1000.0, 5, Rgb([0, 255, 0]), 2);
    let frame = frame_with_rect(100, 100, 200, 100);

    // Before calibration: pixel geometry only.
    let (annotated, before) = measurer.measure(&frame, None);
    assert_eq!(before.len(), 1);
    let m = &before[&0];
    assert!(m.width_m.is_none() && m.height_m.is_none());
    let long = m.width_px.max(m.height_px);
    let short = m.width_px.min(m.height_px);
    assert!((long - 200.0).abs() <= 3.0);
    assert!((short - 100.0).abs() <= 3.0);
    assert_ne!(annotated, frame);

    // Two-point calibration over a 0.5m reference spanning 100px: 200 px/m.
    let scale = calibrate(0.5, &[Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0)])
        .expect("valid calibration input");
    assert!((scale.pixels_per_meter() - 200.0).abs() < 1e-9);

    // After calibration: same pixel geometry, metric fields present.
    let (_, after) = measurer.measure(&frame, Some(scale));
    assert_eq!(after.len(), 1);
    let m2 = &after[&0];
    assert_eq!(m2.width_px, m.width_px);
    assert_eq!(m2.height_px, m.height_px);
    let long_m = m2.width_m.unwrap().max(m2.height_m.unwrap());
    let short_m = m2.width_m.unwrap().min(m2.height_m.unwrap());
    assert!((long_m - 1.0).abs() < 0.03, "long side was {}m", long_m);
    assert!((short_m - 0.5).abs() < 0.03, "short side was {}m", short_m);
}

#[test]
fn noise_stays_out_of_the_mapping() {
    let measurer = ContourMeasurer::new(1000.0, 5, Rgb([0, 255, 0]), 2);

    // A speck far below the noise floor plus one real object.
    let mut frame = frame_with_rect(100, 100, 120, 60);
    for py in 300..310 {
        for px in 400..410 {
            frame.put_pixel(px, py, Rgb([0, 0, 0]));
        }
    }

    let (_, measurements) = measurer.measure(&frame, None);
    assert_eq!(measurements.len(), 1);
}
