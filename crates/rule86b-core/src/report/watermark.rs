use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CashRuleError;
use crate::types::Rate;
use crate::CashRuleResult;

/// Largest share of the page width a watermark may occupy.
pub const WATERMARK_MAX_WIDTH_SHARE: Rate = dec!(0.4);

/// Alpha applied to the logo so it stays behind the text.
pub const WATERMARK_OPACITY: Rate = dec!(0.18);

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Position and size of a faint centred logo, in points from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkPlacement {
    pub x: Decimal,
    pub y: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    pub opacity: Rate,
}

impl WatermarkPlacement {
    /// Scale an image down to at most 40% of the page width (never up) and
    /// centre it. Returns `None` for a zero-sized image.
    pub fn fit(
        image_width: u32,
        image_height: u32,
        page_width: Decimal,
        page_height: Decimal,
    ) -> Option<Self> {
        if image_width == 0 || image_height == 0 {
            return None;
        }

        let w = Decimal::from(image_width);
        let h = Decimal::from(image_height);
        let max_width = (page_width * WATERMARK_MAX_WIDTH_SHARE).floor();
        let ratio = (max_width / w).min(Decimal::ONE);

        let width = (w * ratio).floor();
        let height = (h * ratio).floor();

        Some(WatermarkPlacement {
            x: (page_width - width) / dec!(2),
            y: (page_height - height) / dec!(2),
            width,
            height,
            opacity: WATERMARK_OPACITY,
        })
    }
}

/// Width and height from a PNG IHDR chunk.
pub fn png_dimensions(bytes: &[u8]) -> CashRuleResult<(u32, u32)> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return Err(CashRuleError::ReportError(
            "logo is not a PNG image".to_string(),
        ));
    }

    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Ok((width, height))
}

#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}
