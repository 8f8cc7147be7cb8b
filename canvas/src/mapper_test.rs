#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// cell_from_point
// =============================================================

#[test]
fn center_of_three_by_three_at_zoom_ten() {
    assert_eq!(cell_from_point(15.0, 15.0, 10, 3), Some(Cell::new(1, 1)));
}

#[test]
fn origin_maps_to_first_cell() {
    assert_eq!(cell_from_point(0.0, 0.0, 10, 3), Some(Cell::new(0, 0)));
}

#[test]
fn x_is_column_and_y_is_row() {
    assert_eq!(cell_from_point(25.0, 5.0, 10, 3), Some(Cell::new(2, 0)));
    assert_eq!(cell_from_point(5.0, 25.0, 10, 3), Some(Cell::new(0, 2)));
}

#[test]
fn far_edge_is_outside_half_open_range() {
    assert_eq!(cell_from_point(30.0, 0.0, 10, 3), None);
    assert_eq!(cell_from_point(0.0, 30.0, 10, 3), None);
}

#[test]
fn just_below_far_edge_is_last_cell() {
    assert_eq!(cell_from_point(29.999, 29.999, 10, 3), Some(Cell::new(2, 2)));
}

#[test]
fn negative_points_are_outside() {
    assert_eq!(cell_from_point(-0.5, 5.0, 10, 3), None);
    assert_eq!(cell_from_point(5.0, -1.0, 10, 3), None);
}

#[test]
fn nan_is_outside() {
    assert_eq!(cell_from_point(f64::NAN, 5.0, 10, 3), None);
}

#[test]
fn zero_zoom_or_empty_grid_maps_nothing() {
    assert_eq!(cell_from_point(1.0, 1.0, 0, 3), None);
    assert_eq!(cell_from_point(1.0, 1.0, 10, 0), None);
}

#[test]
fn every_interior_point_recovers_its_cell() {
    let module = 5;
    for zoom in [1_u32, 3, 7, 12] {
        let size = canvas_size_for(module, zoom, 2.0);
        for y in 0..module {
            for x in 0..module {
                let rect = cell_rect(Cell::new(x, y), zoom);
                assert!(rect.x + rect.width <= f64::from(size.css));
                for (fx, fy) in [(0.01, 0.01), (0.5, 0.5), (0.99, 0.2), (0.3, 0.99)] {
                    let (px, py) = (rect.x + rect.width * fx, rect.y + rect.height * fy);
                    assert!(px > rect.x && px < rect.x + rect.width);
                    assert!(py > rect.y && py < rect.y + rect.height);
                    assert_eq!(cell_from_point(px, py, zoom, module), Some(Cell::new(x, y)));
                }
            }
        }
    }
}

#[test]
fn points_beyond_extent_on_either_axis_are_outside() {
    let zoom = 8;
    let extent = 4.0 * 8.0;
    for v in [extent, extent + 0.1, extent * 3.0] {
        assert_eq!(cell_from_point(v, 1.0, zoom, 4), None);
        assert_eq!(cell_from_point(1.0, v, zoom, 4), None);
    }
}

// =============================================================
// canvas_size_for
// =============================================================

#[test]
fn size_at_unit_dpr() {
    assert_eq!(canvas_size_for(21, 10, 1.0), CanvasSize { css: 210, backing: 210 });
}

#[test]
fn backing_size_floors_fractional_dpr() {
    // 25 * 10 * 1.25 = 312.5
    assert_eq!(canvas_size_for(25, 10, 1.25), CanvasSize { css: 250, backing: 312 });
}

#[test]
fn doubling_zoom_doubles_both_sizes_at_fixed_dpr() {
    let a = canvas_size_for(3, 10, 2.0);
    let b = canvas_size_for(3, 20, 2.0);
    assert_eq!(b.css, a.css * 2);
    assert_eq!(b.backing, a.backing * 2);
}

#[test]
fn invalid_dpr_falls_back_to_one() {
    assert_eq!(canvas_size_for(3, 10, 0.0).backing, 30);
    assert_eq!(canvas_size_for(3, 10, f64::NAN).backing, 30);
    assert_eq!(canvas_size_for(3, 10, -2.0).backing, 30);
}

#[test]
fn normalize_dpr_keeps_valid_ratio() {
    assert_eq!(normalize_dpr(1.5), 1.5);
    assert_eq!(normalize_dpr(f64::INFINITY), 1.0);
}

// =============================================================
// cell_rect / reference sizing
// =============================================================

#[test]
fn cell_rect_is_zoom_square_at_scaled_origin() {
    let rect = cell_rect(Cell::new(2, 1), 10);
    assert_eq!(rect, Rect { x: 20.0, y: 10.0, width: 10.0, height: 10.0 });
}

#[test]
fn reference_size_subtracts_padding() {
    assert_eq!(reference_display_size(524.0), 500);
    assert_eq!(reference_display_size(524.9), 500);
}

#[test]
fn reference_size_has_floor() {
    assert_eq!(reference_display_size(100.0), 256);
    assert_eq!(reference_display_size(0.0), 256);
}
