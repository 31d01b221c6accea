use etch::{render_scanlines_compound, Source, StyleHandler};
use etch::{Canvas, CompoundRasterizer, Rgb8, Rgba8, Scanline, Surface};

const RED: Rgba8 = Rgba8 {
    r: 255,
    g: 0,
    b: 0,
    a: 255,
};
const BLUE: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 255,
    a: 255,
};
const GREEN: Rgba8 = Rgba8 {
    r: 0,
    g: 255,
    b: 0,
    a: 255,
};

struct Palette(Vec<Rgba8>);

impl StyleHandler for Palette {
    fn color(&self, style: i16) -> Rgba8 {
        self.0[style as usize]
    }
}

fn rect(ras: &mut CompoundRasterizer, x1: f64, y1: f64, x2: f64, y2: f64) {
    ras.move_to(x1, y1);
    ras.line_to(x2, y1);
    ras.line_to(x2, y2);
    ras.line_to(x1, y2);
    ras.close_polygon();
}

#[test]
fn stacked_styles_land_on_their_own_rows() {
    let mut ras = CompoundRasterizer::new();
    ras.styles(0, -1);
    rect(&mut ras, 0.0, 0.0, 4.0, 2.0);
    ras.styles(1, -1);
    rect(&mut ras, 0.0, 2.0, 4.0, 4.0);

    let mut canvas = Canvas::new(Surface::<Rgb8>::new(4, 4));
    let mut sl = Scanline::new();
    let palette = Palette(vec![RED, BLUE]);
    render_scanlines_compound(&mut ras, &mut sl, &mut canvas, &palette);

    assert_eq!(canvas.surf.get((2, 0)), RED);
    assert_eq!(canvas.surf.get((2, 1)), RED);
    assert_eq!(canvas.surf.get((2, 2)), BLUE);
    assert_eq!(canvas.surf.get((2, 3)), BLUE);
}

#[test]
fn overlap_paints_the_higher_style_last() {
    let mut ras = CompoundRasterizer::new();
    ras.styles(0, -1);
    rect(&mut ras, 0.0, 0.0, 6.0, 2.0);
    ras.styles(1, -1);
    rect(&mut ras, 4.0, 0.0, 10.0, 2.0);

    let mut canvas = Canvas::new(Surface::<Rgb8>::new(10, 2));
    let mut sl = Scanline::new();
    let palette = Palette(vec![RED, BLUE]);
    render_scanlines_compound(&mut ras, &mut sl, &mut canvas, &palette);

    assert_eq!(canvas.surf.get((2, 1)), RED);
    assert_eq!(canvas.surf.get((5, 1)), BLUE);
    assert_eq!(canvas.surf.get((8, 1)), BLUE);
}

#[test]
fn style_ids_are_not_sweep_indexes() {
    let mut ras = CompoundRasterizer::new();
    ras.styles(5, -1);
    rect(&mut ras, 0.0, 0.0, 3.0, 2.0);
    ras.styles(2, -1);
    rect(&mut ras, 5.0, 0.0, 8.0, 2.0);

    assert!(ras.rewind_scanlines());
    let n = ras.sweep_styles().unwrap();
    assert_eq!(n, 2);
    assert_eq!(ras.style_id(0), 2);
    assert_eq!(ras.style_id(1), 5);

    // rendering looks colors up by id, not by sweep order
    let mut ras = CompoundRasterizer::new();
    ras.styles(5, -1);
    rect(&mut ras, 0.0, 0.0, 3.0, 2.0);
    ras.styles(2, -1);
    rect(&mut ras, 5.0, 0.0, 8.0, 2.0);

    let mut canvas = Canvas::new(Surface::<Rgb8>::new(8, 2));
    let mut sl = Scanline::new();
    let palette = Palette(vec![RED, RED, GREEN, RED, RED, BLUE]);
    render_scanlines_compound(&mut ras, &mut sl, &mut canvas, &palette);

    assert_eq!(canvas.surf.get((1, 0)), BLUE);
    assert_eq!(canvas.surf.get((6, 0)), GREEN);
}

#[test]
fn untagged_geometry_renders_nothing() {
    let mut ras = CompoundRasterizer::new();
    rect(&mut ras, 0.0, 0.0, 4.0, 4.0);

    let mut canvas = Canvas::new(Surface::<Rgb8>::new(4, 4));
    let mut sl = Scanline::new();
    let palette = Palette(vec![RED]);
    render_scanlines_compound(&mut ras, &mut sl, &mut canvas, &palette);

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(canvas.surf.get((x, y)), Rgba8::white());
        }
    }
}

#[test]
fn anti_aliasing_survives_the_style_split() {
    // fractional edges still feather per style
    let mut ras = CompoundRasterizer::new();
    ras.styles(0, -1);
    rect(&mut ras, 0.5, 0.0, 4.0, 1.0);

    let mut canvas = Canvas::new(Surface::<Rgb8>::new(5, 1));
    let mut sl = Scanline::new();
    let palette = Palette(vec![Rgba8::black()]);
    render_scanlines_compound(&mut ras, &mut sl, &mut canvas, &palette);

    assert_eq!(canvas.surf.get((0, 0)), Rgba8::new(127, 127, 127, 255));
    assert_eq!(canvas.surf.get((2, 0)), Rgba8::black());
}
