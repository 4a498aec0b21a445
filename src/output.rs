use anyhow::Result;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::types::{Point2D, SessionEvent};

/// Display surface and input source. The window is fixed-size so pointer
/// coordinates map 1:1 onto frame pixels.
pub struct WindowOutput {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    mouse_down_prev: bool,
}

impl WindowOutput {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| anyhow::anyhow!("Failed to create window: {}", e))?;

        // The ~60 FPS cap doubles as the input poll timeout: update() returns
        // quickly and the loop keeps refreshing while waiting for events.
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));

        Ok(Self {
            window,
            buffer: vec![0; width * height],
            width,
            height,
            mouse_down_prev: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Pushes an RGB8 frame to the window. This also pumps the input queue,
    /// so poll_event must run after update each iteration.
    pub fn update(&mut self, rgb: &[u8]) -> Result<()> {
        if self.buffer.len() != self.width * self.height {
            self.buffer.resize(self.width * self.height, 0);
        }

        for (i, chunk) in rgb.chunks(3).enumerate() {
            if i >= self.buffer.len() {
                break;
            }
            let r = chunk[0] as u32;
            let g = chunk[1] as u32;
            let b = chunk[2] as u32;
            self.buffer[i] = (r << 16) | (g << 8) | b;
        }

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| anyhow::anyhow!(e))
    }

    /// Reports at most one discrete event per loop iteration. Key presses win
    /// over clicks when both arrive in the same tick. Clicks are
    /// edge-detected from the held-button state.
    pub fn poll_event(&mut self) -> Option<SessionEvent> {
        for key in self.window.get_keys_pressed(KeyRepeat::No) {
            match key {
                Key::Q | Key::Escape => return Some(SessionEvent::Quit),
                Key::C => return Some(SessionEvent::CalibrationStart),
                Key::S => return Some(SessionEvent::Capture),
                Key::R => return Some(SessionEvent::ResumeLive),
                _ => {}
            }
        }

        let mouse_down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = mouse_down && !self.mouse_down_prev;
        self.mouse_down_prev = mouse_down;

        if clicked {
            if let Some((x, y)) = self.window.get_mouse_pos(MouseMode::Discard) {
                return Some(SessionEvent::PointerClick(Point2D::new(x, y)));
            }
        }

        None
    }
}
