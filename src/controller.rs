//! The delegate that receives translated gestures.

use crate::gesture::Gesture;

/// Receives gestures from the gatherer.
///
/// Calls are made synchronously from the drain loop, one per gesture and in
/// arrival order. The gatherer waits for each call to return, so
/// implementations should not block for long.
///
/// # Example
///
/// ```
/// use gesture_gatherer::{Gesture, GestureController};
///
/// struct Counter(usize);
///
/// impl GestureController for Counter {
///     fn on_gesture_begin(&mut self, _gesture: Gesture) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait GestureController {
    /// Called when a gesture starts. Ownership of the gesture moves to the controller.
    fn on_gesture_begin(&mut self, gesture: Gesture);
}

/// Implement GestureController for closures.
impl<F> GestureController for F
where
    F: FnMut(Gesture),
{
    fn on_gesture_begin(&mut self, gesture: Gesture) {
        self(gesture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureType;

    fn swipe(fingers: u32) -> Gesture {
        Gesture {
            gesture_type: GestureType::Swipe,
            fingers,
            device: None,
            time_usec: 0,
        }
    }

    #[test]
    fn test_closure_controller() {
        let mut seen = Vec::new();
        {
            let mut controller = |gesture: Gesture| seen.push(gesture.fingers);
            controller.on_gesture_begin(swipe(3));
            controller.on_gesture_begin(swipe(4));
        }
        assert_eq!(seen, vec![3, 4]);
    }
}
