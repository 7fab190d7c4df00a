//! QR code rendering to PNG.

use image::{ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// Pixel size of a single QR module.
const MODULE_PIXELS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("failed to encode QR data: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to write QR image: {0}")]
    Image(#[from] image::ImageError),
}

/// Encodes `data` as a black-on-white QR code PNG with a quiet zone.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .quiet_zone(true)
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .build();

    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_render_produces_png() {
        let png = render_qr_png("Asha Rao, Backend, 2025-06-01, 2025-08-31, 2025-05-20, ABC123XYZ")
            .unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_is_square() {
        let png = render_qr_png("hello").unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), decoded.height());
    }
}
