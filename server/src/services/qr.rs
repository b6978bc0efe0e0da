use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;

use crate::utils::error::AppError;

const QR_MIN_DIMENSION: u32 = 200;

/// Turns a ticket payload into an opaque, displayable image string.
/// The result is stored on the ticket as-is.
pub trait CodeRenderer: Send + Sync {
    fn render(&self, payload: &str) -> Result<String, AppError>;
}

/// Renders an SVG QR code wrapped in a `data:` URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrSvgRenderer;

impl CodeRenderer for QrSvgRenderer {
    fn render(&self, payload: &str) -> Result<String, AppError> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| {
            AppError::ExternalServiceError(format!("QR encoding failed: {}", e))
        })?;

        let image = code
            .render::<svg::Color>()
            .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_svg_data_uri() {
        let rendered = QrSvgRenderer.render("booking-1").unwrap();
        let encoded = rendered
            .strip_prefix("data:image/svg+xml;base64,")
            .expect("data uri prefix");

        let svg = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_same_payload_same_image() {
        let a = QrSvgRenderer.render("abc-1").unwrap();
        let b = QrSvgRenderer.render("abc-1").unwrap();
        let c = QrSvgRenderer.render("abc-2").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
