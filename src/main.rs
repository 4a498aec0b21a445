use clap::Parser;
use imageproc::drawing::draw_filled_circle_mut;

use rusty_ruler::args::Args;
use rusty_ruler::camera::CameraSource;
use rusty_ruler::config::AppConfig;
use rusty_ruler::font::TextRenderer;
use rusty_ruler::measure::ContourMeasurer;
use rusty_ruler::output::WindowOutput;
use rusty_ruler::session::{Session, SessionControl, SessionMode, StdinPrompt};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.list {
        let cameras = nokhwa::query(nokhwa::utils::ApiBackend::Auto)?;
        println!("Available Cameras:");
        println!("{:<5} | {:<30} | {:<10}", "Index", "Name", "Misc");
        println!("{}", "-".repeat(60));
        for cam in cameras {
            println!(
                "{:<5} | {:<30} | {:?}",
                cam.index(),
                cam.human_name(),
                cam.misc()
            );
        }
        return Ok(());
    }

    let config = AppConfig::load()?;

    let mut camera = CameraSource::new(args.cam_index)?;
    let width = camera.width() as usize;
    let height = camera.height() as usize;
    let mut window = WindowOutput::new("Rusty Ruler", width, height)?;

    let measurer = ContourMeasurer::new(
        config.measure.min_contour_area,
        config.measure.block_radius,
        rgb(parse_hex(&config.ui.box_color_hex)),
        config.ui.label_scale,
    );
    let marker_color = rgb(parse_hex(&config.ui.marker_color_hex));
    let guide_color = parse_hex(&config.ui.guide_color_hex);
    let text = TextRenderer::load(
        &config.ui.font_family,
        config.ui.font_size_pt as f32,
        config.ui.label_scale,
    );

    let mut session = Session::new(StdinPrompt);

    println!("Press 'c' to calibrate with a reference object");
    println!("Press 's' to capture and analyze the current frame");
    println!("Press 'r' to return to the live view after a capture");
    println!("Press 'q' to quit");

    while window.is_open() {
        // Re-measure the frozen frame while captured, otherwise pull a fresh
        // frame from the camera. Losing the stream ends the session.
        let frame = match session.frozen_frame() {
            Some(frozen) => frozen.clone(),
            None => match camera.capture() {
                Ok(frame) => frame,
                Err(e) => {
                    println!("{}", e);
                    break;
                }
            },
        };

        let (mut annotated, measurements) = measurer.measure(&frame, session.scale_factor());

        if let SessionMode::Calibrating { reference_points } = session.mode() {
            let guidance = "Click two points on the reference object";
            text.draw(&mut annotated, width, height, 10, 30, guidance, guide_color);
            for point in reference_points {
                draw_filled_circle_mut(
                    &mut annotated,
                    (point.x as i32, point.y as i32),
                    5,
                    marker_color,
                );
            }
        }

        window.update(annotated.as_raw())?;

        if let Some(event) = window.poll_event() {
            if session.handle_event(event, &frame, &measurements) == SessionControl::Quit {
                break;
            }
        }
    }

    Ok(())
}

fn rgb(color: (u8, u8, u8)) -> image::Rgb<u8> {
    image::Rgb([color.0, color.1, color.2])
}

fn parse_hex(hex: &str) -> (u8, u8, u8) {
    if hex.len() == 7 && hex.starts_with('#') {
        let r = u8::from_str_radix(&hex[1..3], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[3..5], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[5..7], 16).unwrap_or(0);
        (r, g, b)
    } else {
        (255, 0, 0) // Default Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#FF0000"), (255, 0, 0));
        assert_eq!(parse_hex("#00FF00"), (0, 255, 0));
        assert_eq!(parse_hex("#0000FF"), (0, 0, 255));
        assert_eq!(parse_hex("#FFFFFF"), (255, 255, 255));
        assert_eq!(parse_hex("invalid"), (255, 0, 0)); // Fallback
    }
}
