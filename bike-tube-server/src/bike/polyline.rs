//! Decoder for the encoded polyline format used by Google Directions.

use super::error::ProviderError;

/// Decode a precision-5 polyline into `[lon, lat]` pairs.
pub fn decode(encoded: &str) -> Result<Vec<[f64; 2]>, ProviderError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat += next_value(bytes, &mut index)?;
        lon += next_value(bytes, &mut index)?;
        points.push([lon as f64 / 1e5, lat as f64 / 1e5]);
    }

    Ok(points)
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, ProviderError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| ProviderError::Json("truncated polyline".to_string()))?;
        *index += 1;

        let chunk = i64::from(byte)
            .checked_sub(63)
            .filter(|c| (0..64).contains(c))
            .ok_or_else(|| ProviderError::Json(format!("invalid polyline byte {byte}")))?;

        if shift > 60 {
            return Err(ProviderError::Json("polyline value overflow".to_string()));
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}
