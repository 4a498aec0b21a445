use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::*;
use image::RgbImage;

use crate::calibration::{calibrate, ScaleFactor};
use crate::error::MeasureError;
use crate::types::{ObjectMeasurement, Point2D, SessionEvent};

/// Host-supplied source for the reference object's real-world length,
/// requested synchronously once two calibration points are collected. Kept
/// behind a trait so a GUI or networked front end can service it without
/// touching the controller.
pub trait ReferenceLengthPrompt {
    /// Returns the reference length in meters.
    fn request_reference_length(&mut self) -> anyhow::Result<f64>;
}

/// Blocking console prompt. Asks in centimeters and converts to meters.
pub struct StdinPrompt;

impl ReferenceLengthPrompt for StdinPrompt {
    fn request_reference_length(&mut self) -> anyhow::Result<f64> {
        print!("Enter the real length of the reference object in cm: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let cm: f64 = line.trim().parse()?;
        Ok(cm / 100.0)
    }
}

/// Modal session state. Each variant carries only the data valid for it: a
/// frozen frame exists exactly when the mode is Captured, and reference
/// points exist exactly when calibrating.
pub enum SessionMode {
    Live,
    Calibrating { reference_points: Vec<Point2D> },
    Captured { frame: RgbImage },
}

#[derive(Debug, PartialEq)]
pub enum SessionControl {
    Continue,
    Quit,
}

/// Owns the session mode and the published scale factor; the only writer of
/// both. The main loop feeds it one event per tick.
pub struct Session<P: ReferenceLengthPrompt> {
    mode: SessionMode,
    scale: Option<ScaleFactor>,
    prompt: P,
}

impl<P: ReferenceLengthPrompt> Session<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            mode: SessionMode::Live,
            scale: None,
            prompt,
        }
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn scale_factor(&self) -> Option<ScaleFactor> {
        self.scale
    }

    pub fn frozen_frame(&self) -> Option<&RgbImage> {
        match &self.mode {
            SessionMode::Captured { frame } => Some(frame),
            _ => None,
        }
    }

    pub fn reference_points(&self) -> &[Point2D] {
        match &self.mode {
            SessionMode::Calibrating { reference_points } => reference_points,
            _ => &[],
        }
    }

    /// Applies one event. `current_frame` is the frame measured this tick
    /// (frozen when the capture event fires) and `measurements` are its
    /// objects (summarized on capture).
    pub fn handle_event(
        &mut self,
        event: SessionEvent,
        current_frame: &RgbImage,
        measurements: &BTreeMap<usize, ObjectMeasurement>,
    ) -> SessionControl {
        match event {
            SessionEvent::Quit => return SessionControl::Quit,
            SessionEvent::CalibrationStart => match self.mode {
                SessionMode::Live | SessionMode::Captured { .. } => {
                    self.mode = SessionMode::Calibrating {
                        reference_points: Vec::new(),
                    };
                    println!("Calibration mode: click two points on the reference object.");
                }
                SessionMode::Calibrating { .. } => {}
            },
            SessionEvent::PointerClick(point) => self.handle_click(point),
            SessionEvent::Capture => {
                if let SessionMode::Live = self.mode {
                    print_measurement_summary(measurements);
                    self.mode = SessionMode::Captured {
                        frame: current_frame.clone(),
                    };
                    println!("Press 'r' to return to the live view.");
                }
            }
            SessionEvent::ResumeLive => {
                if let SessionMode::Captured { .. } = self.mode {
                    self.mode = SessionMode::Live;
                }
            }
        }
        SessionControl::Continue
    }

    fn handle_click(&mut self, point: Point2D) {
        let points = match &mut self.mode {
            SessionMode::Calibrating { reference_points } => reference_points,
            _ => return,
        };
        points.push(point);
        println!("Point selected: ({:.0}, {:.0})", point.x, point.y);
        if points.len() < 2 {
            return;
        }

        // Both points collected; the point set is consumed whether
        // calibration succeeds or not.
        let collected = std::mem::take(points);
        let result = self
            .prompt
            .request_reference_length()
            .map_err(|e| MeasureError::InvalidCalibrationInput {
                reason: e.to_string(),
            })
            .and_then(|length_m| calibrate(length_m, &collected));

        match result {
            Ok(scale) => {
                self.scale = Some(scale);
                println!(
                    "{}",
                    format!("Scale factor: {:.2} px/m", scale.pixels_per_meter()).green()
                );
                println!("{}", "Calibration complete!".green());
                self.mode = SessionMode::Live;
            }
            Err(e) => {
                // Still calibrating, with an empty point set, so the user
                // can retry.
                println!("{}", format!("Calibration failed: {}", e).red());
            }
        }
    }
}

fn print_measurement_summary(measurements: &BTreeMap<usize, ObjectMeasurement>) {
    println!("\n=== Captured frame measurements ===");
    if measurements.is_empty() {
        println!("No objects detected.");
        return;
    }
    for (id, m) in measurements {
        println!("\nObject {}:", id);
        match m.width_m {
            Some(w) => println!("  Width: {:.1} px ({:.1} cm)", m.width_px, w * 100.0),
            None => println!("  Width: {:.1} px", m.width_px),
        }
        match m.height_m {
            Some(h) => println!("  Height: {:.1} px ({:.1} cm)", m.height_px, h * 100.0),
            None => println!("  Height: {:.1} px", m.height_px),
        }
    }
}
