//! Reading and writing of image files
//!
//! Thin wrappers around the image crate, fixed to the packed 8 bit
//! layouts the surfaces here produce. The file extension picks the
//! format.

use std::path::Path;

use image::{ColorType, ImageResult};

/// Save a raw pixel buffer. `bpp` selects between RGB and RGBA.
pub fn write_file<P: AsRef<Path>>(
    buf: &[u8],
    width: usize,
    height: usize,
    filename: P,
    bpp: usize,
) -> ImageResult<()> {
    let color = match bpp {
        3 => ColorType::Rgb8,
        4 => ColorType::Rgba8,
        _ => unreachable!("unsupported bytes per pixel: {}", bpp),
    };
    image::save_buffer(filename, buf, width as u32, height as u32, color)
}

/// Load an image as packed RGB bytes plus its dimensions.
pub fn read_file<P: AsRef<Path>>(filename: P) -> ImageResult<(Vec<u8>, usize, usize)> {
    let img = image::open(filename)?.to_rgb8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w as usize, h as usize))
}

/// Compare two image files pixel by pixel, printing every mismatch.
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> ImageResult<bool> {
    let (d1, w1, h1) = read_file(f1)?;
    let (d2, w2, h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 {
        println!("image sizes differ: {}x{} vs {}x{}", w1, h1, w2, h2);
        return Ok(false);
    }
    let mut flag = true;
    for (i, (v1, v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            println!(
                "{} [{},{},{}]: {} {}",
                i,
                (i / 3) % w1,
                (i / 3) / w1,
                i % 3,
                v1,
                v2
            );
            flag = false;
        }
    }
    Ok(flag)
}
