use approx::assert_abs_diff_eq;
use etch::{FillingRule, Rasterize, Scanline, ScanlineRasterizer};

fn rect(ras: &mut ScanlineRasterizer, x1: f64, y1: f64, x2: f64, y2: f64) {
    ras.move_to(x1, y1);
    ras.line_to(x2, y1);
    ras.line_to(x2, y2);
    ras.line_to(x1, y2);
    ras.close_polygon();
}

fn spans_of(sl: &Scanline) -> Vec<(i64, i64, u64)> {
    sl.spans
        .iter()
        .map(|s| (s.x, s.len, s.covers[0]))
        .collect()
}

/// Sweep until the requested row comes up.
fn sweep_to_row(ras: &mut ScanlineRasterizer, sl: &mut Scanline, y: i64) -> bool {
    while ras.sweep_scanline(sl) {
        if sl.y == y {
            return true;
        }
    }
    false
}

#[test]
fn half_pixel_rect_feathers_every_side() {
    let mut ras = ScanlineRasterizer::new();
    rect(&mut ras, 1.5, 1.5, 8.5, 6.5);

    let mut sl = Scanline::new();
    assert!(ras.rewind_scanlines());

    // top row is half tall, corners a quarter covered
    assert!(ras.sweep_scanline(&mut sl));
    assert_eq!(sl.y, 1);
    assert_eq!(spans_of(&sl), vec![(1, 1, 64), (2, -6, 128), (8, 1, 64)]);

    // interior rows feather only left and right
    assert!(ras.sweep_scanline(&mut sl));
    assert_eq!(sl.y, 2);
    assert_eq!(spans_of(&sl), vec![(1, 1, 128), (2, -6, 255), (8, 1, 128)]);

    let mut rows = vec![1, 2];
    while ras.sweep_scanline(&mut sl) {
        rows.push(sl.y);
    }
    assert_eq!(rows, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn pixel_aligned_square_sweeps_solid_rows() {
    let mut ras = ScanlineRasterizer::new();
    rect(&mut ras, 0.0, 0.0, 10.0, 10.0);

    let mut sl = Scanline::new();
    assert!(ras.rewind_scanlines());
    let mut rows = 0;
    while ras.sweep_scanline(&mut sl) {
        assert_eq!(sl.y, rows);
        assert_eq!(spans_of(&sl), vec![(0, -10, 255)]);
        rows += 1;
    }
    assert_eq!(rows, 10);
}

#[test]
fn filling_rules_disagree_inside_nested_squares() {
    let mut ras = ScanlineRasterizer::new();
    rect(&mut ras, 0.0, 0.0, 8.0, 8.0);
    rect(&mut ras, 2.0, 2.0, 6.0, 6.0);

    let mut sl = Scanline::new();
    assert!(ras.rewind_scanlines());
    assert!(sweep_to_row(&mut ras, &mut sl, 3));
    assert_eq!(spans_of(&sl), vec![(0, -8, 255)]);

    let mut ras = ScanlineRasterizer::new();
    ras.filling_rule(FillingRule::EvenOdd);
    rect(&mut ras, 0.0, 0.0, 8.0, 8.0);
    rect(&mut ras, 2.0, 2.0, 6.0, 6.0);

    assert!(ras.rewind_scanlines());
    assert!(sweep_to_row(&mut ras, &mut sl, 3));
    assert_eq!(spans_of(&sl), vec![(0, -2, 255), (6, -2, 255)]);
}

#[test]
fn clip_box_confines_the_sweep() {
    let mut ras = ScanlineRasterizer::new();
    ras.clip_box(2.0, 2.0, 6.0, 6.0);
    rect(&mut ras, 0.0, 0.0, 10.0, 10.0);

    let mut sl = Scanline::new();
    assert!(ras.rewind_scanlines());
    let mut rows = 0;
    while ras.sweep_scanline(&mut sl) {
        rows += 1;
        assert!(sl.y >= 2 && sl.y < 6);
        for span in &sl.spans {
            let x2 = span.x + span.len.abs();
            assert!(span.x >= 2 && x2 <= 6, "span {:?} escapes", (span.x, span.len));
        }
    }
    assert_eq!(rows, 4);
}

#[test]
fn degenerate_paths_produce_nothing() {
    let mut ras = ScanlineRasterizer::new();
    ras.move_to(3.0, 3.0);
    ras.close_polygon();
    assert!(!ras.rewind_scanlines());

    // a pure horizontal retrace cancels itself
    let mut ras = ScanlineRasterizer::new();
    ras.move_to(0.0, 2.0);
    ras.line_to(9.0, 2.0);
    ras.line_to(0.0, 2.0);
    ras.close_polygon();
    let mut sl = Scanline::new();
    if ras.rewind_scanlines() {
        assert!(!ras.sweep_scanline(&mut sl));
    }
}

fn shoelace(pts: &[(f64, f64)]) -> f64 {
    let mut sum = 0.0;
    for i in 0..pts.len() {
        let (x1, y1) = pts[i];
        let (x2, y2) = pts[(i + 1) % pts.len()];
        sum += x1 * y2 - x2 * y1;
    }
    (sum / 2.0).abs()
}

fn coverage(ras: &mut ScanlineRasterizer) -> f64 {
    let mut sl = Scanline::new();
    let mut sum = 0.0;
    if ras.rewind_scanlines() {
        while ras.sweep_scanline(&mut sl) {
            for span in &sl.spans {
                if span.len > 0 {
                    sum += span.covers.iter().map(|&c| c as f64).sum::<f64>() / 255.0;
                } else {
                    sum += span.covers[0] as f64 * (-span.len) as f64 / 255.0;
                }
            }
        }
    }
    sum
}

#[test]
fn coverage_tracks_polygon_area() {
    let cases = [
        (3, 7.3, 5.1, 12.0, 11.0),
        (5, 9.8, 4.4, 14.5, 10.2),
        (8, 6.1, 8.7, 10.0, 12.3),
    ];
    for &(n, rx, ry, cx, cy) in &cases {
        let pts: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                (cx + rx * t.cos(), cy + ry * t.sin())
            })
            .collect();

        let mut ras = ScanlineRasterizer::new();
        ras.move_to(pts[0].0, pts[0].1);
        for &(x, y) in &pts[1..] {
            ras.line_to(x, y);
        }
        ras.close_polygon();

        assert_abs_diff_eq!(coverage(&mut ras), shoelace(&pts), epsilon = 2.0);
    }
}
