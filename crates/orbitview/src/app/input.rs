use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use super::App;

/// Wheel pixels per zoom step on touchpads.
const PIXELS_PER_SCROLL_STEP: f64 = 10.0;

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init_window(event_loop) {
            log::error!("failed to start viewer: {e}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
                self.viewer.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                self.render();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_down = modifiers.state().shift_key();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_mouse_down = pressed,
                    MouseButton::Right => self.right_mouse_down = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some((delta_x, delta_y)) =
                    cursor_delta(&mut self.mouse_pos, (position.x, position.y))
                else {
                    return;
                };

                // Left drag rotates; right drag or shift + left drag pans.
                let is_pan = self.right_mouse_down || (self.left_mouse_down && self.shift_down);
                if is_pan {
                    self.viewer.pan(delta_x, delta_y);
                } else if self.left_mouse_down {
                    self.viewer.rotate(delta_x, delta_y);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_pos = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_SCROLL_STEP) as f32,
                };
                self.viewer.zoom(steps);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.close_requested = true;
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}

/// Records `position` and returns the motion since the last known position.
/// The first position after startup or after the cursor left the window
/// yields no motion.
#[allow(clippy::cast_possible_truncation)]
fn cursor_delta(last: &mut Option<(f64, f64)>, position: (f64, f64)) -> Option<(f32, f32)> {
    let previous = last.replace(position)?;
    Some((
        (position.0 - previous.0) as f32,
        (position.1 - previous.1) as f32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_cursor_position_yields_no_motion() {
        let mut last = None;
        assert_eq!(cursor_delta(&mut last, (400.0, 300.0)), None);
        assert_eq!(last, Some((400.0, 300.0)));
        assert_eq!(cursor_delta(&mut last, (410.0, 295.0)), Some((10.0, -5.0)));
    }

    #[test]
    fn test_cursor_reentry_starts_fresh() {
        let mut last = Some((10.0, 10.0));
        assert_eq!(cursor_delta(&mut last, (12.0, 10.0)), Some((2.0, 0.0)));

        // CursorLeft forgets the position.
        last = None;
        assert_eq!(cursor_delta(&mut last, (800.0, 600.0)), None);
        assert_eq!(cursor_delta(&mut last, (800.0, 600.0)), Some((0.0, 0.0)));
    }
}
