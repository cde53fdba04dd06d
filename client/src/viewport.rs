/// Viewport owns the pan offset and zoom scale of the map surface.
/// Mutated only by pointer/wheel handlers; lives for the component's
/// mounted lifetime and is never reset.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub dragging: bool,
    anchor_x: f64,
    anchor_y: f64,
}

const MIN_SCALE: f64 = 0.5;
const MAX_SCALE: f64 = 3.0;
const ZOOM_IN_FACTOR: f64 = 1.1;
const ZOOM_OUT_FACTOR: f64 = 0.9;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            dragging: false,
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }
}

impl Viewport {
    /// Apply one wheel step: scrolling down zooms out, up zooms in.
    /// The scale never leaves [MIN_SCALE, MAX_SCALE].
    pub fn zoom(&mut self, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Anchor a drag gesture at the given pointer position.
    pub fn begin_drag(&mut self, client_x: f64, client_y: f64) {
        self.dragging = true;
        self.anchor_x = client_x - self.offset_x;
        self.anchor_y = client_y - self.offset_y;
    }

    /// Track pointer movement relative to the drag anchor. No-op unless a
    /// drag is active.
    pub fn drag_to(&mut self, client_x: f64, client_y: f64) {
        if !self.dragging {
            return;
        }
        self.offset_x = client_x - self.anchor_x;
        self.offset_y = client_y - self.anchor_y;
    }

    /// Release the active drag, keeping the current offset.
    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// CSS transform bridging the fixed surface to the panned/zoomed view.
    pub fn transform_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset_x, self.offset_y, self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_direction_picks_the_zoom_factor() {
        let mut vp = Viewport::default();
        vp.zoom(-120.0);
        assert!((vp.scale - 1.1).abs() < 1e-12);
        vp.zoom(120.0);
        assert!((vp.scale - 0.99).abs() < 1e-12);
    }

    #[test]
    fn scale_never_leaves_bounds_under_repeated_wheel_events() {
        let mut vp = Viewport::default();
        for _ in 0..200 {
            vp.zoom(-1.0);
            assert!(vp.scale <= MAX_SCALE);
        }
        assert_eq!(vp.scale, MAX_SCALE);
        for _ in 0..200 {
            vp.zoom(1.0);
            assert!(vp.scale >= MIN_SCALE);
        }
        assert_eq!(vp.scale, MIN_SCALE);
    }

    #[test]
    fn drag_tracks_pointer_relative_to_anchor() {
        let mut vp = Viewport::default();
        vp.begin_drag(100.0, 50.0);
        assert!(vp.dragging);
        vp.drag_to(130.0, 45.0);
        assert_eq!((vp.offset_x, vp.offset_y), (30.0, -5.0));

        // A second drag continues from the existing offset.
        vp.end_drag();
        vp.begin_drag(0.0, 0.0);
        vp.drag_to(10.0, 10.0);
        assert_eq!((vp.offset_x, vp.offset_y), (40.0, 5.0));
    }

    #[test]
    fn moves_are_ignored_when_no_drag_is_active() {
        let mut vp = Viewport::default();
        vp.drag_to(500.0, 500.0);
        assert_eq!((vp.offset_x, vp.offset_y), (0.0, 0.0));

        vp.begin_drag(0.0, 0.0);
        vp.end_drag();
        vp.drag_to(500.0, 500.0);
        assert_eq!((vp.offset_x, vp.offset_y), (0.0, 0.0));
    }

    #[test]
    fn transform_combines_offset_and_scale() {
        let mut vp = Viewport::default();
        vp.begin_drag(0.0, 0.0);
        vp.drag_to(12.0, -8.0);
        vp.zoom(-1.0);
        assert_eq!(vp.transform_css(), "translate(12px, -8px) scale(1.1)");
    }
}
