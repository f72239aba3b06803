//! Display helpers

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable file size using 1024-based units
///
/// At most two decimals, trailing zeros dropped: `0 Bytes`, `1.5 KB`,
/// `2 MB`. Sizes beyond the gigabyte range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
