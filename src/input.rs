//! Input event injection, presentation thread to render thread.

use crate::ring::RingChannel;

/// Queue depth. Input arrives at human interaction rates, far below 256
/// events per render iteration; overflow is a rare degradation under
/// saturation, not an expected state.
pub const INPUT_QUEUE_CAPACITY: usize = 256;

/// An input event captured by the plugin window, destined for the embedded
/// render engine. Consumed at most once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseMotion {
        x: f32,
        y: f32,
    },
    MouseButton {
        x: f32,
        y: f32,
        button: u32,
        pressed: bool,
    },
    Scroll {
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    Key {
        code: u32,
        pressed: bool,
    },
}

/// FIFO event transport. The presentation thread pushes as events arrive;
/// the render thread drains the queue each iteration.
pub struct InputEventChannel {
    queue: RingChannel<InputEvent, INPUT_QUEUE_CAPACITY>,
}

impl InputEventChannel {
    pub fn new() -> Self {
        Self {
            queue: RingChannel::new(),
        }
    }

    /// Enqueue an event. Returns `false` (event dropped) when the queue is
    /// saturated; never blocks.
    #[inline]
    pub fn push(&self, event: InputEvent) -> bool {
        self.queue.push(event)
    }

    /// Dequeue the oldest pending event. Call in a loop until `None`.
    #[inline]
    pub fn pop(&self) -> Option<InputEvent> {
        self.queue.pop()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn push_mouse_motion(&self, x: f32, y: f32) -> bool {
        self.push(InputEvent::MouseMotion { x, y })
    }

    pub fn push_mouse_button(&self, x: f32, y: f32, button: u32, pressed: bool) -> bool {
        self.push(InputEvent::MouseButton {
            x,
            y,
            button,
            pressed,
        })
    }

    pub fn push_scroll(&self, x: f32, y: f32, dx: f32, dy: f32) -> bool {
        self.push(InputEvent::Scroll { x, y, dx, dy })
    }

    pub fn push_key(&self, code: u32, pressed: bool) -> bool {
        self.push(InputEvent::Key { code, pressed })
    }
}

impl Default for InputEventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let input = InputEventChannel::new();
        assert!(input.push_mouse_motion(1.0, 2.0));
        assert!(input.push_mouse_button(1.0, 2.0, 0, true));
        assert!(input.push_scroll(1.0, 2.0, 0.0, -1.0));
        assert!(input.push_key(65, true));

        assert_eq!(input.pop(), Some(InputEvent::MouseMotion { x: 1.0, y: 2.0 }));
        assert_eq!(
            input.pop(),
            Some(InputEvent::MouseButton {
                x: 1.0,
                y: 2.0,
                button: 0,
                pressed: true
            })
        );
        assert_eq!(
            input.pop(),
            Some(InputEvent::Scroll {
                x: 1.0,
                y: 2.0,
                dx: 0.0,
                dy: -1.0
            })
        );
        assert_eq!(
            input.pop(),
            Some(InputEvent::Key {
                code: 65,
                pressed: true
            })
        );
        assert_eq!(input.pop(), None);
        assert!(input.is_empty());
    }

    #[test]
    fn test_overflow_drops_newest() {
        let input = InputEventChannel::new();
        for i in 0..INPUT_QUEUE_CAPACITY {
            let accepted = input.push_key(i as u32, true);
            assert_eq!(accepted, i < INPUT_QUEUE_CAPACITY - 1);
        }

        // Survivors drain in order, the saturated push left no trace.
        let mut expected = 0u32;
        while let Some(event) = input.pop() {
            assert_eq!(
                event,
                InputEvent::Key {
                    code: expected,
                    pressed: true
                }
            );
            expected += 1;
        }
        assert_eq!(expected as usize, INPUT_QUEUE_CAPACITY - 1);
    }
}
