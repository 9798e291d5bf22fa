//! Pointer-driven before/after slider.
//!
//! Mouse and touch feed the same [`PointerEvent`] path. A slider has at most
//! one drag in progress; it belongs to the pointer that started it.

use super::layout::{
    CompareLayout, ContainerRect, DEFAULT_POSITION, clamp_position, compute_layout,
    position_from_pointer, shows_after_label, shows_before_label,
};

pub type PointerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// A pointer sample in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub client_x: f64,
}

impl PointerEvent {
    pub fn mouse(client_x: f64) -> Self {
        Self {
            id: 0,
            kind: PointerKind::Mouse,
            client_x,
        }
    }

    /// Touch ids are offset so they never collide with the mouse.
    pub fn touch(identifier: u32, client_x: f64) -> Self {
        Self {
            id: 1 + u64::from(identifier),
            kind: PointerKind::Touch,
            client_x,
        }
    }
}

/// Whether the slider consumed an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Captured,
    Ignored,
}

/// Snapshot of the slider for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderState {
    pub position: f64,
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub before: String,
    pub after: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            before: "Before".to_string(),
            after: "After".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct CompareSlider {
    position: f64,
    initial_position: f64,
    capture: Option<PointerId>,
    labels: Labels,
    destroyed: bool,
}

impl Default for CompareSlider {
    fn default() -> Self {
        Self::new(DEFAULT_POSITION, Labels::default())
    }
}

impl CompareSlider {
    pub fn new(initial_position: f64, labels: Labels) -> Self {
        let initial_position = clamp_position(initial_position);
        Self {
            position: initial_position,
            initial_position,
            capture: None,
            labels,
            destroyed: false,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.capture.is_some()
    }

    pub fn state(&self) -> SliderState {
        SliderState {
            position: self.position,
            dragging: self.is_dragging(),
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn show_before_label(&self) -> bool {
        shows_before_label(self.position)
    }

    pub fn show_after_label(&self) -> bool {
        shows_after_label(self.position)
    }

    pub fn layout(&self, width: f64, height: f64) -> CompareLayout {
        compute_layout(self.position, width, height)
    }

    /// Start a drag and jump to the pointer.
    ///
    /// A second pointer is ignored while another one holds the drag; a
    /// repeated down from the same pointer restarts it.
    pub fn pointer_down(&mut self, event: PointerEvent, rect: ContainerRect) -> EventStatus {
        if self.destroyed {
            return EventStatus::Ignored;
        }
        if self.capture.is_some_and(|id| id != event.id) {
            return EventStatus::Ignored;
        }
        self.capture = Some(event.id);
        self.track(event.client_x, rect);
        EventStatus::Captured
    }

    /// Follow the pointer while it holds the drag.
    pub fn pointer_move(&mut self, event: PointerEvent, rect: ContainerRect) -> EventStatus {
        if !self.holds(event.id) {
            return EventStatus::Ignored;
        }
        self.track(event.client_x, rect);
        EventStatus::Captured
    }

    /// End the drag; the position stays where it is.
    pub fn pointer_up(&mut self, event: PointerEvent) -> EventStatus {
        self.release(event.id)
    }

    /// The pointer left the container; treated as the end of the drag.
    pub fn pointer_leave(&mut self, event: PointerEvent) -> EventStatus {
        self.release(event.id)
    }

    /// Release any drag and return to the initial position.
    pub fn reset(&mut self) {
        if self.destroyed {
            return;
        }
        self.capture = None;
        self.position = self.initial_position;
    }

    /// Release the pointer capture and stop reacting to events. Idempotent.
    pub fn destroy(&mut self) {
        if self.capture.take().is_some() {
            log::debug!("slider destroyed mid-drag at {:.1}%", self.position);
        }
        self.destroyed = true;
    }

    fn holds(&self, id: PointerId) -> bool {
        !self.destroyed && self.capture == Some(id)
    }

    fn release(&mut self, id: PointerId) -> EventStatus {
        if !self.holds(id) {
            return EventStatus::Ignored;
        }
        self.capture = None;
        EventStatus::Captured
    }

    fn track(&mut self, client_x: f64, rect: ContainerRect) {
        if let Some(position) = position_from_pointer(client_x, rect) {
            self.position = position;
        }
    }
}

impl Drop for CompareSlider {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: ContainerRect = ContainerRect {
        left: 0.0,
        width: 400.0,
    };

    #[test]
    fn starts_at_fifty_not_dragging() {
        let slider = CompareSlider::default();
        assert_eq!(
            slider.state(),
            SliderState {
                position: 50.0,
                dragging: false
            }
        );
        assert!(slider.show_before_label() && slider.show_after_label());
    }

    #[test]
    fn initial_position_is_clamped() {
        assert_eq!(CompareSlider::new(180.0, Labels::default()).position(), 100.0);
    }

    #[test]
    fn down_jumps_and_captures() {
        let mut slider = CompareSlider::default();
        assert_eq!(
            slider.pointer_down(PointerEvent::mouse(100.0), RECT),
            EventStatus::Captured
        );
        assert_eq!(slider.position(), 25.0);
        assert!(slider.is_dragging());
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut slider = CompareSlider::default();
        assert_eq!(
            slider.pointer_move(PointerEvent::mouse(10.0), RECT),
            EventStatus::Ignored
        );
        assert_eq!(slider.position(), 50.0);
    }

    #[test]
    fn sweep_is_monotonic_and_clamped() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(-50.0), RECT);
        assert_eq!(slider.position(), 0.0);

        let mut last = slider.position();
        let mut x = -50.0;
        while x <= 450.0 {
            slider.pointer_move(PointerEvent::mouse(x), RECT);
            let p = slider.position();
            assert!((0.0..=100.0).contains(&p));
            assert!(p >= last, "position went back from {last} to {p}");
            last = p;
            x += 7.5;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn up_freezes_position() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(300.0), RECT);
        slider.pointer_up(PointerEvent::mouse(300.0));
        assert!(!slider.is_dragging());
        slider.pointer_move(PointerEvent::mouse(20.0), RECT);
        assert_eq!(slider.position(), 75.0);
    }

    #[test]
    fn leave_ends_the_drag() {
        let mut slider = CompareSlider::default();
        let touch = PointerEvent::touch(0, 40.0);
        slider.pointer_down(touch, RECT);
        assert_eq!(slider.pointer_leave(touch), EventStatus::Captured);
        assert!(!slider.is_dragging());
        assert_eq!(slider.position(), 10.0);
    }

    #[test]
    fn second_pointer_cannot_steal_the_drag() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::touch(0, 100.0), RECT);
        assert_eq!(
            slider.pointer_down(PointerEvent::touch(1, 380.0), RECT),
            EventStatus::Ignored
        );
        assert_eq!(
            slider.pointer_move(PointerEvent::mouse(380.0), RECT),
            EventStatus::Ignored
        );
        assert_eq!(
            slider.pointer_up(PointerEvent::mouse(380.0)),
            EventStatus::Ignored
        );
        assert_eq!(slider.position(), 25.0);
        assert!(slider.is_dragging());
    }

    #[test]
    fn same_pointer_down_restarts_the_drag() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(100.0), RECT);
        assert_eq!(
            slider.pointer_down(PointerEvent::mouse(200.0), RECT),
            EventStatus::Captured
        );
        assert_eq!(slider.position(), 50.0);
    }

    #[test]
    fn zero_width_container_keeps_position() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(100.0), RECT);
        slider.pointer_move(PointerEvent::mouse(300.0), ContainerRect::new(0.0, 0.0));
        assert_eq!(slider.position(), 25.0);
    }

    #[test]
    fn labels_follow_thresholds() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(40.0), RECT);
        assert!(!slider.show_before_label());
        assert!(slider.show_after_label());

        slider.pointer_move(PointerEvent::mouse(360.0), RECT);
        assert!(slider.show_before_label());
        assert!(!slider.show_after_label());
    }

    #[test]
    fn destroy_releases_and_ignores_later_events() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(100.0), RECT);
        slider.destroy();
        assert!(!slider.is_dragging());
        assert!(slider.is_destroyed());
        assert_eq!(
            slider.pointer_down(PointerEvent::mouse(300.0), RECT),
            EventStatus::Ignored
        );
        slider.reset();
        assert_eq!(slider.position(), 25.0);
        slider.destroy();
    }

    #[test]
    fn reset_returns_to_initial_position() {
        let mut slider = CompareSlider::new(30.0, Labels::default());
        slider.pointer_down(PointerEvent::mouse(400.0), RECT);
        slider.reset();
        assert_eq!(slider.state().position, 30.0);
        assert!(!slider.state().dragging);
    }

    #[test]
    fn layout_uses_current_position() {
        let mut slider = CompareSlider::default();
        slider.pointer_down(PointerEvent::mouse(100.0), RECT);
        assert_eq!(slider.layout(400.0, 300.0).clip_width, 100.0);
    }
}
