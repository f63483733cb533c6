//! Human-readable labels for download buttons.

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count with 1024-based units and at most one decimal.
///
/// `0` renders as `"0 Bytes"`; anything past gigabytes stays in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.1}", value);
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Display name for a Tauri updater platform key.
pub fn platform_display_name(platform: &str) -> &str {
    match platform {
        "darwin-aarch64" => "macOS (Apple Silicon)",
        "darwin-x86_64" => "macOS (Intel)",
        "linux-x86_64" => "Linux (x64)",
        "linux-aarch64" => "Linux (ARM64)",
        "windows-x86_64" => "Windows (x64)",
        "windows-aarch64" => "Windows (ARM64)",
        other => other,
    }
}
