//! Scanline renderers
//!
//! A renderer borrows a [`Canvas`] and a fill color and knows how to
//! put one finished [`Scanline`] onto it. The free functions drive a
//! rasterizer all the way to pixels.

use crate::base::Canvas;
use crate::color::{Color, Rgba8};
use crate::compound::CompoundRasterizer;
use crate::path::VertexSource;
use crate::pixfmt::Pixel;
use crate::raster::Rasterize;
use crate::scan::Scanline;

/// Puts finished scanlines onto pixels.
pub trait Render {
    /// Render a single scanline
    fn render(&mut self, sl: &Scanline);
    /// Set the color used by [`render`](Render::render)
    fn color<C: Color>(&mut self, color: C);
    /// Called once before the first scanline
    fn prepare(&mut self) {}
}

/// Anti-aliased solid renderer
#[derive(Debug)]
pub struct SolidRenderer<'a, T>
where
    T: Pixel,
{
    pub base: &'a mut Canvas<T>,
    pub color: Rgba8,
}

/// Aliased solid renderer, every span lands at full opacity
#[derive(Debug)]
pub struct BinRenderer<'a, T>
where
    T: Pixel,
{
    pub base: &'a mut Canvas<T>,
    pub color: Rgba8,
}

impl<'a, T: Pixel> SolidRenderer<'a, T> {
    /// New renderer drawing black onto `base`.
    pub fn with_base(base: &'a mut Canvas<T>) -> Self {
        Self {
            base,
            color: Rgba8::black(),
        }
    }
}

impl<'a, T: Pixel> BinRenderer<'a, T> {
    /// New renderer drawing black onto `base`.
    pub fn with_base(base: &'a mut Canvas<T>) -> Self {
        Self {
            base,
            color: Rgba8::black(),
        }
    }
}

impl<'a, T: Pixel> Render for SolidRenderer<'a, T> {
    fn render(&mut self, sl: &Scanline) {
        render_scanline_aa_solid(sl, self.base, self.color);
    }
    fn color<C: Color>(&mut self, color: C) {
        self.color = Rgba8::from_color(color);
    }
}

impl<'a, T: Pixel> Render for BinRenderer<'a, T> {
    fn render(&mut self, sl: &Scanline) {
        render_scanline_bin_solid(sl, self.base, self.color);
    }
    fn color<C: Color>(&mut self, color: C) {
        self.color = Rgba8::from_color(color);
    }
}

/// Blend one scanline using its coverage values.
fn render_scanline_aa_solid<T, C>(sl: &Scanline, base: &mut Canvas<T>, color: C)
where
    T: Pixel,
    C: Color,
{
    let y = sl.y;
    for span in &sl.spans {
        let x = span.x;
        if span.len > 0 {
            base.blend_solid_hspan(x, y, span.len, color, &span.covers);
        } else {
            base.blend_hline(x, y, x - span.len - 1, color, span.covers[0]);
        }
    }
}

/// Write one scanline at full coverage, ignoring anti-aliasing.
fn render_scanline_bin_solid<T, C>(sl: &Scanline, base: &mut Canvas<T>, color: C)
where
    T: Pixel,
    C: Color,
{
    for span in &sl.spans {
        base.blend_hline(
            span.x,
            sl.y,
            span.x - 1 + span.len.abs(),
            color,
            T::cover_mask(),
        );
    }
}

/// Render rasterized data using the renderer's current color.
pub fn render_scanlines<REN, RAS>(ras: &mut RAS, sl: &mut Scanline, ren: &mut REN)
where
    REN: Render,
    RAS: Rasterize,
{
    if ras.rewind_scanlines() {
        sl.reset();
        ren.prepare();
        while ras.sweep_scanline(sl) {
            ren.render(sl);
        }
    }
}

/// Rasterize and render each path with its matching color.
pub fn render_all_paths<REN, RAS, VS, C>(
    ras: &mut RAS,
    sl: &mut Scanline,
    ren: &mut REN,
    paths: &[VS],
    colors: &[C],
) where
    C: Color,
    REN: Render,
    RAS: Rasterize,
    VS: VertexSource,
{
    debug_assert!(paths.len() == colors.len());
    for (path, color) in paths.iter().zip(colors.iter()) {
        ras.reset();
        ras.add_path(path);
        ren.color(*color);
        render_scanlines(ras, sl, ren);
    }
}

/// Maps the style ids of a [`CompoundRasterizer`] to fill colors.
pub trait StyleHandler {
    fn color(&self, style: i16) -> Rgba8;
}

/// Style ids index straight into the slice.
impl StyleHandler for [Rgba8] {
    fn color(&self, style: i16) -> Rgba8 {
        self[style as usize]
    }
}

/// Render every style of a compound rasterizer, ascending by id
/// within each row.
pub fn render_scanlines_compound<T, S>(
    ras: &mut CompoundRasterizer,
    sl: &mut Scanline,
    base: &mut Canvas<T>,
    styles: &S,
) where
    T: Pixel,
    S: StyleHandler + ?Sized,
{
    if !ras.rewind_scanlines() {
        return;
    }
    sl.reset();
    while let Some(num_styles) = ras.sweep_styles() {
        for i in 0..num_styles {
            if ras.sweep_scanline_of(i, sl) {
                let color = styles.color(ras.style_id(i));
                render_scanline_aa_solid(sl, base, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb8;
    use crate::path::Path;
    use crate::pixfmt::{Source, Surface};
    use crate::raster::ScanlineRasterizer;

    fn rect(ras: &mut ScanlineRasterizer, x1: f64, y1: f64, x2: f64, y2: f64) {
        ras.move_to(x1, y1);
        ras.line_to(x2, y1);
        ras.line_to(x2, y2);
        ras.line_to(x1, y2);
        ras.close_polygon();
    }

    #[test]
    fn solid_fill_stays_inside_the_rect() {
        let mut canvas = Canvas::new(Surface::<Rgb8>::new(8, 4));
        let mut ras = ScanlineRasterizer::new();
        rect(&mut ras, 1.0, 0.0, 7.0, 4.0);

        let mut sl = Scanline::new();
        let mut ren = SolidRenderer::with_base(&mut canvas);
        ren.color(Rgb8::black());
        render_scanlines(&mut ras, &mut sl, &mut ren);

        assert_eq!(canvas.surf.get((0, 2)), Rgba8::white());
        assert_eq!(canvas.surf.get((1, 2)), Rgba8::black());
        assert_eq!(canvas.surf.get((6, 2)), Rgba8::black());
        assert_eq!(canvas.surf.get((7, 2)), Rgba8::white());
    }

    #[test]
    fn bin_renderer_ignores_partial_coverage() {
        let mut aa = Canvas::new(Surface::<Rgb8>::new(6, 2));
        let mut bin = Canvas::new(Surface::<Rgb8>::new(6, 2));
        let mut ras = ScanlineRasterizer::new();
        let mut sl = Scanline::new();

        rect(&mut ras, 1.5, 0.0, 4.5, 2.0);
        {
            let mut ren = SolidRenderer::with_base(&mut aa);
            ren.color(Rgb8::black());
            render_scanlines(&mut ras, &mut sl, &mut ren);
        }
        ras.reset();
        rect(&mut ras, 1.5, 0.0, 4.5, 2.0);
        {
            let mut ren = BinRenderer::with_base(&mut bin);
            ren.color(Rgb8::black());
            render_scanlines(&mut ras, &mut sl, &mut ren);
        }

        // half covered boundary pixel blends under aa, snaps under bin
        assert_eq!(aa.surf.get((1, 0)), Rgba8::new(127, 127, 127, 255));
        assert_eq!(bin.surf.get((1, 0)), Rgba8::black());
        assert_eq!(aa.surf.get((2, 0)), Rgba8::black());
        assert_eq!(bin.surf.get((2, 0)), Rgba8::black());
    }

    #[test]
    fn all_paths_pair_colors_with_paths() {
        let mut canvas = Canvas::new(Surface::<Rgb8>::new(8, 2));
        let mut p1 = Path::new();
        p1.move_to(0.0, 0.0);
        p1.line_to(2.0, 0.0);
        p1.line_to(2.0, 2.0);
        p1.line_to(0.0, 2.0);
        p1.close_polygon();
        let mut p2 = Path::new();
        p2.move_to(4.0, 0.0);
        p2.line_to(6.0, 0.0);
        p2.line_to(6.0, 2.0);
        p2.line_to(4.0, 2.0);
        p2.close_polygon();

        let red = Rgba8::new(255, 0, 0, 255);
        let blue = Rgba8::new(0, 0, 255, 255);
        let mut ras = ScanlineRasterizer::new();
        let mut sl = Scanline::new();
        let mut ren = SolidRenderer::with_base(&mut canvas);
        render_all_paths(&mut ras, &mut sl, &mut ren, &[p1, p2], &[red, blue]);

        assert_eq!(canvas.surf.get((1, 1)), red);
        assert_eq!(canvas.surf.get((3, 1)), Rgba8::white());
        assert_eq!(canvas.surf.get((5, 1)), blue);
    }

    #[test]
    fn compound_styles_meet_without_a_seam() {
        let mut canvas = Canvas::new(Surface::<Rgb8>::new(8, 2));
        let mut ras = CompoundRasterizer::new();
        ras.styles(0, -1);
        ras.move_to(4.0, 2.0);
        ras.line_to(0.0, 2.0);
        ras.line_to(0.0, 0.0);
        ras.line_to(4.0, 0.0);
        ras.styles(1, -1);
        ras.move_to(4.0, 0.0);
        ras.line_to(8.0, 0.0);
        ras.line_to(8.0, 2.0);
        ras.line_to(4.0, 2.0);
        ras.styles(0, 1);
        ras.move_to(4.0, 0.0);
        ras.line_to(4.0, 2.0);

        let colors = [Rgba8::new(255, 0, 0, 255), Rgba8::new(0, 0, 255, 255)];
        let mut sl = Scanline::new();
        render_scanlines_compound(&mut ras, &mut sl, &mut canvas, &colors[..]);

        // the divider pixel belongs wholly to the right style
        assert_eq!(canvas.surf.get((3, 1)), colors[0]);
        assert_eq!(canvas.surf.get((4, 1)), colors[1]);
        assert_eq!(canvas.surf.get((7, 1)), colors[1]);
    }
}
