//! Pure window geometry: default sizes, cascade placement, and desktop clamping.

use crate::{
    config::DesktopConfig,
    manifest,
    model::{Position, ResizeEdge, Size, WindowGeometry, WindowRecord},
};

/// Upper bound on cascade candidates inspected before accepting an overlap.
const MAX_CASCADE_ATTEMPTS: usize = 64;

/// Desktop size used for layout, substituting the fallback while unmeasured.
pub fn effective_desktop(desktop: Size, config: &DesktopConfig) -> Size {
    if desktop.is_measured() {
        desktop
    } else {
        config.fallback_desktop_size
    }
}

/// Returns the initial size for a window hosting `component`.
///
/// Known components use the catalog size; anything else gets 60% x 70% of the desktop. The result
/// never exceeds the desktop and respects the minimum window size where the desktop allows it.
pub fn default_size(component: &str, desktop: Size, config: &DesktopConfig) -> Size {
    let desktop = effective_desktop(desktop, config);
    let base = manifest::catalog_size(component).unwrap_or(Size {
        width: desktop.width * 3 / 5,
        height: desktop.height * 7 / 10,
    });

    Size {
        width: base.width.max(config.min_window_size.width).min(desktop.width),
        height: base
            .height
            .max(config.min_window_size.height)
            .min(desktop.height),
    }
}

/// Computes where a new window of `size` should open.
///
/// Steps diagonally from the most recently created window, wrapping to the cascade origin once
/// the window would overflow the desktop, and skips spots already occupied by an open window.
pub fn cascade_position(
    open_windows: &[WindowRecord],
    desktop: Size,
    size: Size,
    config: &DesktopConfig,
) -> Position {
    let desktop = effective_desktop(desktop, config);
    let origin = config.cascade_origin;
    let step = config.cascade_step.max(1);
    let fits = |position: Position| {
        position.x + size.width <= desktop.width && position.y + size.height <= desktop.height
    };
    let advance = |position: Position| {
        let next = position.offset(step, step);
        if fits(next) {
            next
        } else {
            origin
        }
    };

    let mut candidate = match open_windows.last() {
        Some(last) => advance(placement_anchor(last)),
        None => origin,
    };

    for _ in 0..MAX_CASCADE_ATTEMPTS {
        if !open_windows.iter().any(|w| w.position == candidate) {
            break;
        }
        let next = advance(candidate);
        if next == candidate {
            break;
        }
        candidate = next;
    }

    clamp_to_desktop(candidate, size, desktop)
}

// A maximized window sits at the origin; cascade from where it was before.
fn placement_anchor(window: &WindowRecord) -> Position {
    match (window.is_maximized, window.prev_state) {
        (true, Some(prev)) => prev.position,
        _ => window.position,
    }
}

/// Constrains `position` so a window of `size` stays inside `desktop`.
///
/// An axis where the window is larger than the desktop clamps to 0. While the desktop is
/// unmeasured only negative coordinates are corrected; the real clamp happens once a size is
/// reported.
pub fn clamp_to_desktop(position: Position, size: Size, desktop: Size) -> Position {
    if !desktop.is_measured() {
        return Position {
            x: position.x.max(0),
            y: position.y.max(0),
        };
    }

    Position {
        x: position.x.clamp(0, (desktop.width - size.width).max(0)),
        y: position.y.clamp(0, (desktop.height - size.height).max(0)),
    }
}

/// Bounds a requested size by the minimum and by the space right/below `position`.
///
/// When the desktop cannot fit the minimum from `position`, the available space wins so the
/// window never extends past the desktop edge.
pub fn clamp_size_to_desktop(position: Position, size: Size, desktop: Size, min: Size) -> Size {
    let size = size.at_least(min);
    if !desktop.is_measured() {
        return size;
    }

    Size {
        width: size.width.min(desktop.width - position.x).max(1),
        height: size.height.min(desktop.height - position.y).max(1),
    }
}

/// Clamps a whole geometry: position first, then the size into the remaining space.
pub fn fit_geometry(geometry: WindowGeometry, desktop: Size, min: Size) -> WindowGeometry {
    let position = clamp_to_desktop(geometry.position, geometry.size, desktop);
    WindowGeometry {
        position,
        size: clamp_size_to_desktop(position, geometry.size, desktop, min),
    }
}

/// Applies a pointer delta to `start` for a drag on `edge`.
///
/// The edge opposite the one being dragged stays anchored: shrinking stops at `min`, and a left
/// or top edge cannot be dragged past the desktop origin.
pub fn resize_geometry(
    start: WindowGeometry,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min: Size,
) -> WindowGeometry {
    let WindowGeometry { position, size } = start;
    let mut next = start;

    if edge.moves_right_edge() {
        next.size.width = (size.width + dx).max(min.width);
    }
    if edge.moves_left_edge() {
        let dx = dx.clamp(-position.x.max(0), (size.width - min.width).max(0));
        next.position.x = position.x + dx;
        next.size.width = size.width - dx;
    }
    if edge.moves_bottom_edge() {
        next.size.height = (size.height + dy).max(min.height);
    }
    if edge.moves_top_edge() {
        let dy = dy.clamp(-position.y.max(0), (size.height - min.height).max(0));
        next.position.y = position.y + dy;
        next.size.height = size.height - dy;
    }

    next
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowId;

    fn desktop() -> Size {
        Size::new(1000, 700)
    }

    fn record(id: &str, position: Position, size: Size) -> WindowRecord {
        WindowRecord {
            id: WindowId::from(id),
            title: id.to_string(),
            component: "Foo".to_string(),
            minimized: false,
            is_maximized: false,
            position,
            size,
            z_index: 1,
            prev_state: None,
        }
    }

    #[test]
    fn default_size_uses_catalog_then_fraction_fallback() {
        let config = DesktopConfig::default();
        assert_eq!(
            default_size("Browse", desktop(), &config),
            Size::new(760, 520)
        );
        assert_eq!(default_size("Foo", desktop(), &config), Size::new(600, 490));
    }

    #[test]
    fn default_size_never_exceeds_small_desktop() {
        let config = DesktopConfig::default();
        let tiny = Size::new(200, 120);
        assert_eq!(default_size("Browse", tiny, &config), tiny);
    }

    #[test]
    fn default_size_uses_fallback_desktop_while_unmeasured() {
        let config = DesktopConfig::default();
        let size = default_size("Foo", Size::ZERO, &config);
        assert_eq!(size, Size::new(1024 * 3 / 5, 730 * 7 / 10));
    }

    #[test]
    fn clamp_keeps_window_inside_desktop() {
        let size = Size::new(300, 200);
        assert_eq!(
            clamp_to_desktop(Position::new(-40, 900), size, desktop()),
            Position::new(0, 500)
        );
        assert_eq!(
            clamp_to_desktop(Position::new(850, 20), size, desktop()),
            Position::new(700, 20)
        );
    }

    #[test]
    fn clamp_pins_oversized_axis_to_zero() {
        let size = Size::new(1400, 200);
        assert_eq!(
            clamp_to_desktop(Position::new(120, 80), size, desktop()),
            Position::new(0, 80)
        );
    }

    #[test]
    fn clamp_defers_while_desktop_unmeasured() {
        let size = Size::new(300, 200);
        assert_eq!(
            clamp_to_desktop(Position::new(-5, 4000), size, Size::ZERO),
            Position::new(0, 4000)
        );
    }

    #[test]
    fn cascade_starts_at_origin_and_steps_diagonally() {
        let config = DesktopConfig::default();
        let size = Size::new(300, 200);
        let first = cascade_position(&[], desktop(), size, &config);
        assert_eq!(first, Position::new(32, 32));

        let open = vec![record("a", first, size)];
        assert_eq!(
            cascade_position(&open, desktop(), size, &config),
            Position::new(56, 56)
        );
    }

    #[test]
    fn cascade_wraps_to_origin_when_window_would_overflow() {
        let config = DesktopConfig::default();
        let size = Size::new(300, 200);
        let open = vec![record("a", Position::new(690, 480), size)];
        assert_eq!(
            cascade_position(&open, desktop(), size, &config),
            Position::new(32, 32)
        );
    }

    #[test]
    fn cascade_skips_occupied_origin_after_wrap() {
        let config = DesktopConfig::default();
        let size = Size::new(300, 200);
        let open = vec![
            record("a", Position::new(32, 32), size),
            record("b", Position::new(690, 480), size),
        ];
        assert_eq!(
            cascade_position(&open, desktop(), size, &config),
            Position::new(56, 56)
        );
    }

    #[test]
    fn cascade_produces_distinct_positions_for_small_batches() {
        let config = DesktopConfig::default();
        let size = Size::new(400, 300);
        let mut open = Vec::new();
        for idx in 0..8 {
            let position = cascade_position(&open, desktop(), size, &config);
            assert!(position.x + size.width <= 1000 && position.y + size.height <= 700);
            open.push(record(&format!("w{idx}"), position, size));
        }
        let mut positions: Vec<_> = open.iter().map(|w| (w.position.x, w.position.y)).collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 8);
    }

    #[test]
    fn cascade_steps_from_pre_maximize_position() {
        let config = DesktopConfig::default();
        let size = Size::new(300, 200);
        let mut maximized = record("a", Position::ORIGIN, desktop());
        maximized.is_maximized = true;
        maximized.prev_state = Some(WindowGeometry {
            position: Position::new(100, 100),
            size,
        });
        assert_eq!(
            cascade_position(&[maximized], desktop(), size, &config),
            Position::new(124, 124)
        );
    }

    #[test]
    fn size_clamp_respects_remaining_space() {
        let min = Size::new(220, 140);
        assert_eq!(
            clamp_size_to_desktop(Position::new(600, 100), Size::new(900, 100), desktop(), min),
            Size::new(400, 140)
        );
    }

    #[test]
    fn west_resize_anchors_right_edge_at_minimum() {
        let min = Size::new(220, 140);
        let start = WindowGeometry {
            position: Position::new(100, 100),
            size: Size::new(300, 200),
        };
        let next = resize_geometry(start, ResizeEdge::West, 200, 0, min);
        assert_eq!(next.position.x, 180);
        assert_eq!(next.size.width, 220);
        assert_eq!(next.position.x + next.size.width, 400);
    }

    #[test]
    fn north_west_resize_stops_at_desktop_origin() {
        let min = Size::new(220, 140);
        let start = WindowGeometry {
            position: Position::new(20, 10),
            size: Size::new(300, 200),
        };
        let next = resize_geometry(start, ResizeEdge::NorthWest, -50, -50, min);
        assert_eq!(next.position, Position::ORIGIN);
        assert_eq!(next.size, Size::new(320, 210));
    }

    #[test]
    fn south_east_resize_grows_and_respects_minimum() {
        let min = Size::new(220, 140);
        let start = WindowGeometry {
            position: Position::new(20, 10),
            size: Size::new(300, 200),
        };
        assert_eq!(
            resize_geometry(start, ResizeEdge::SouthEast, 40, 30, min).size,
            Size::new(340, 230)
        );
        assert_eq!(
            resize_geometry(start, ResizeEdge::SouthEast, -200, -200, min).size,
            min
        );
    }
}
