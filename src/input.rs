//! Pointer input adapter.
//!
//! Maps screen coordinates from any pointing device to board zones and turns
//! pick/release gestures into grab/release actions. The board is drawn as
//! fourteen equal columns: six points, the bar, six points, and the off
//! tray on the right. Points 12–23 run left to right along the top half,
//! points 11–0 run left to right along the bottom half.

use backgammon_engine::{Action, POINT_COUNT, Source, Target};
use tracing::{debug, instrument};

const COLUMNS: f32 = 14.0;
const BAR_COLUMN: usize = 6;
const OFF_COLUMN: usize = 13;

/// A region of the board under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// One of the 24 points.
    Point(u8),
    /// The central bar.
    Bar,
    /// The bear-off tray.
    Off,
}

/// Pointer gesture in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pinch or button press.
    Pick {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Release of the pinch or button.
    Release {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
}

/// Fixed board geometry used for hit testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    width: f32,
    height: f32,
}

impl BoardLayout {
    /// Layout covering a `width` by `height` surface with its origin top-left.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zone under `(x, y)`, or `None` outside the board.
    pub fn zone_at(&self, x: f32, y: f32) -> Option<Zone> {
        if !(0.0..self.width).contains(&x) || !(0.0..self.height).contains(&y) {
            return None;
        }

        let column = (x / (self.width / COLUMNS)) as usize;
        let top = y < self.height / 2.0;

        let slot = match column {
            BAR_COLUMN => return Some(Zone::Bar),
            OFF_COLUMN => return Some(Zone::Off),
            c if c < BAR_COLUMN => c,
            c => c - 1,
        };

        // slot counts 0..12 left to right across both quadrants
        let index = if top { 12 + slot } else { 11 - slot };
        debug_assert!(index < POINT_COUNT);
        Some(Zone::Point(index as u8))
    }

    /// Translates a gesture into the action it proposes.
    ///
    /// Picks outside a checker zone propose nothing. Releases anywhere but a
    /// point or the off tray cancel the grab.
    #[instrument(skip(self))]
    pub fn translate(&self, event: PointerEvent) -> Option<Action> {
        let action = match event {
            PointerEvent::Pick { x, y } => match self.zone_at(x, y)? {
                Zone::Point(idx) => Action::Grab {
                    from: Source::Point(idx),
                },
                Zone::Bar => Action::Grab { from: Source::Bar },
                Zone::Off => return None,
            },
            PointerEvent::Release { x, y } => Action::Release {
                to: match self.zone_at(x, y) {
                    Some(Zone::Point(idx)) => Some(Target::Point(idx)),
                    Some(Zone::Off) => Some(Target::Off),
                    Some(Zone::Bar) | None => None,
                },
            },
        };
        debug!(?action, "Pointer gesture translated");
        Some(action)
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(1400.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_points() {
        let layout = BoardLayout::default();
        assert_eq!(layout.zone_at(10.0, 10.0), Some(Zone::Point(12)));
        assert_eq!(layout.zone_at(10.0, 790.0), Some(Zone::Point(11)));
        assert_eq!(layout.zone_at(1290.0, 10.0), Some(Zone::Point(23)));
        assert_eq!(layout.zone_at(1290.0, 790.0), Some(Zone::Point(0)));
    }

    #[test]
    fn test_bar_and_off_columns() {
        let layout = BoardLayout::default();
        assert_eq!(layout.zone_at(650.0, 100.0), Some(Zone::Bar));
        assert_eq!(layout.zone_at(650.0, 700.0), Some(Zone::Bar));
        assert_eq!(layout.zone_at(1350.0, 400.0), Some(Zone::Off));
        // first column right of the bar
        assert_eq!(layout.zone_at(750.0, 100.0), Some(Zone::Point(18)));
        assert_eq!(layout.zone_at(750.0, 700.0), Some(Zone::Point(5)));
    }

    #[test]
    fn test_outside_board() {
        let layout = BoardLayout::default();
        assert_eq!(layout.zone_at(-1.0, 10.0), None);
        assert_eq!(layout.zone_at(10.0, 800.0), None);
        assert_eq!(layout.translate(PointerEvent::Pick { x: 2000.0, y: 1.0 }), None);
    }

    #[test]
    fn test_gestures_become_actions() {
        let layout = BoardLayout::default();
        assert_eq!(
            layout.translate(PointerEvent::Pick { x: 650.0, y: 50.0 }),
            Some(Action::Grab { from: Source::Bar })
        );
        assert_eq!(
            layout.translate(PointerEvent::Pick { x: 1350.0, y: 50.0 }),
            None
        );
        assert_eq!(
            layout.translate(PointerEvent::Release { x: 1350.0, y: 50.0 }),
            Some(Action::Release {
                to: Some(Target::Off)
            })
        );
        assert_eq!(
            layout.translate(PointerEvent::Release { x: -5.0, y: 50.0 }),
            Some(Action::Release { to: None })
        );
    }
}
