use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tiny_skia::{IntRect, Pixmap};

/// Crop a white-background canvas to the drawn content plus `pad` pixels on
/// every side
///
/// A canvas with nothing drawn on it is returned unchanged.
pub fn crop_to_content(pixmap: &Pixmap, pad: u32) -> Pixmap {
    let (width, height) = (pixmap.width(), pixmap.height());

    let mut min_x = u32::MAX;
    let mut max_x = 0;
    let mut min_y = u32::MAX;
    let mut max_y = 0;

    for (i, p) in pixmap.pixels().iter().enumerate() {
        if p.red() == 255 && p.green() == 255 && p.blue() == 255 && p.alpha() == 255 {
            continue;
        }
        let x = i as u32 % width;
        let y = i as u32 / width;
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_x > max_x {
        return pixmap.clone();
    }

    let left = min_x.saturating_sub(pad) as i32;
    let top = min_y.saturating_sub(pad) as i32;
    let right = (max_x + 1 + pad).min(width) as i32;
    let bottom = (max_y + 1 + pad).min(height) as i32;

    IntRect::from_ltrb(left, top, right, bottom)
        .and_then(|rect| pixmap.clone_rect(rect))
        .unwrap_or_else(|| pixmap.clone())
}

/// Write a canvas as PNG
///
/// # Returns
/// * Number of bytes written
pub fn write_png(pixmap: &Pixmap, path: &Path) -> Result<usize> {
    let data = pixmap
        .encode_png()
        .map_err(|e| Error::Encode(e.to_string()))?;

    let write_error = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&data).map_err(write_error)?;
    writer.flush().map_err(write_error)?;

    Ok(data.len())
}
