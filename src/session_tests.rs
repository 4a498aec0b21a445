#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use image::{Rgb, RgbImage};

    use crate::session::{ReferenceLengthPrompt, Session, SessionControl, SessionMode};
    use crate::types::{ObjectMeasurement, Point2D, SessionEvent};

    struct FixedPrompt(f64);

    impl ReferenceLengthPrompt for FixedPrompt {
        fn request_reference_length(&mut self) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingPrompt;

    impl ReferenceLengthPrompt for FailingPrompt {
        fn request_reference_length(&mut self) -> anyhow::Result<f64> {
            anyhow::bail!("not a number")
        }
    }

    fn frame() -> RgbImage {
        RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))
    }

    fn no_measurements() -> BTreeMap<usize, ObjectMeasurement> {
        BTreeMap::new()
    }

    #[test]
    fn test_session_starts_live_and_uncalibrated() {
        let session = Session::new(FixedPrompt(0.5));
        assert!(matches!(session.mode(), SessionMode::Live));
        assert!(session.scale_factor().is_none());
        assert!(session.frozen_frame().is_none());
    }

    #[test]
    fn test_two_distinct_clicks_calibrate_and_return_to_live() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        assert!(matches!(session.mode(), SessionMode::Calibrating { .. }));

        session.handle_event(
            SessionEvent::PointerClick(Point2D::new(0.0, 0.0)),
            &f,
            &m,
        );
        assert_eq!(session.reference_points().len(), 1);

        session.handle_event(
            SessionEvent::PointerClick(Point2D::new(100.0, 0.0)),
            &f,
            &m,
        );
        let scale = session.scale_factor().expect("calibration should publish a scale");
        assert!((scale.pixels_per_meter() - 200.0).abs() < 1e-9);
        assert!(matches!(session.mode(), SessionMode::Live));
    }

    #[test]
    fn test_coincident_clicks_stay_calibrating_with_cleared_points() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        let p = SessionEvent::PointerClick(Point2D::new(40.0, 40.0));
        session.handle_event(p, &f, &m);
        session.handle_event(p, &f, &m);

        assert!(session.scale_factor().is_none());
        assert!(matches!(session.mode(), SessionMode::Calibrating { .. }));
        assert!(session.reference_points().is_empty());
    }

    #[test]
    fn test_unparseable_reference_length_is_recoverable() {
        let mut session = Session::new(FailingPrompt);
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(0.0, 0.0)), &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(50.0, 0.0)), &f, &m);

        assert!(session.scale_factor().is_none());
        assert!(matches!(session.mode(), SessionMode::Calibrating { .. }));
        assert!(session.reference_points().is_empty());
    }

    #[test]
    fn test_clicks_ignored_outside_calibration() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::PointerClick(Point2D::new(5.0, 5.0)), &f, &m);
        assert!(matches!(session.mode(), SessionMode::Live));
        assert!(session.scale_factor().is_none());
    }

    #[test]
    fn test_capture_freezes_current_frame() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::Capture, &f, &m);
        assert!(matches!(session.mode(), SessionMode::Captured { .. }));
        assert_eq!(session.frozen_frame().unwrap(), &f);

        session.handle_event(SessionEvent::ResumeLive, &f, &m);
        assert!(matches!(session.mode(), SessionMode::Live));
        assert!(session.frozen_frame().is_none());
    }

    #[test]
    fn test_capture_is_noop_while_calibrating() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(1.0, 1.0)), &f, &m);
        session.handle_event(SessionEvent::Capture, &f, &m);

        assert!(matches!(session.mode(), SessionMode::Calibrating { .. }));
        assert_eq!(session.reference_points().len(), 1);
        assert!(session.frozen_frame().is_none());
    }

    #[test]
    fn test_calibration_start_from_captured_drops_frozen_frame() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::Capture, &f, &m);
        session.handle_event(SessionEvent::CalibrationStart, &f, &m);

        assert!(matches!(session.mode(), SessionMode::Calibrating { .. }));
        assert!(session.frozen_frame().is_none());
    }

    #[test]
    fn test_resume_live_is_noop_outside_captured() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::ResumeLive, &f, &m);
        assert!(matches!(session.mode(), SessionMode::Live));

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        session.handle_event(SessionEvent::ResumeLive, &f, &m);
        assert!(matches!(session.mode(), SessionMode::Calibrating { .. }));
    }

    #[test]
    fn test_quit_terminates_from_any_mode() {
        let f = frame();
        let m = no_measurements();

        let mut session = Session::new(FixedPrompt(0.5));
        assert_eq!(
            session.handle_event(SessionEvent::Quit, &f, &m),
            SessionControl::Quit
        );

        let mut session = Session::new(FixedPrompt(0.5));
        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        assert_eq!(
            session.handle_event(SessionEvent::Quit, &f, &m),
            SessionControl::Quit
        );

        let mut session = Session::new(FixedPrompt(0.5));
        session.handle_event(SessionEvent::Capture, &f, &m);
        assert_eq!(
            session.handle_event(SessionEvent::Quit, &f, &m),
            SessionControl::Quit
        );
    }

    #[test]
    fn test_recalibration_overwrites_scale() {
        let mut session = Session::new(FixedPrompt(0.5));
        let f = frame();
        let m = no_measurements();

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(0.0, 0.0)), &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(100.0, 0.0)), &f, &m);
        let first = session.scale_factor().unwrap();

        session.handle_event(SessionEvent::CalibrationStart, &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(0.0, 0.0)), &f, &m);
        session.handle_event(SessionEvent::PointerClick(Point2D::new(50.0, 0.0)), &f, &m);
        let second = session.scale_factor().unwrap();

        assert!((first.pixels_per_meter() - 200.0).abs() < 1e-9);
        assert!((second.pixels_per_meter() - 100.0).abs() < 1e-9);
    }
}
