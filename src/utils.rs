//! Utility functions

use std::path::PathBuf;

// Wide variant with the scan ring — for the sidebar header
pub const LOGO_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 96 64"><defs><style>.d1{fill:#dc2626}.d2{fill:#fca5a5}.r1{fill:none;stroke:#3f3f46;stroke-width:3px}</style></defs><circle class="r1" cx="48" cy="34" r="26"/><path class="d1" d="m48 10c0 0-17 21.5-17 31.5a17 17 0 0 0 34 0c0-10-17-31.5-17-31.5z"/><path class="d2" d="m41 41.5a3.2 3.2 0 0 1-3.2-3.2c0-3.4 3.4-8.9 5.7-12.1a1.1 1.1 0 0 1 1.8 1.3c-2.5 3.5-5.1 8.2-5.1 10.8a0.8 0.8 0 0 0 0.8 0.8 1.7 1.7 0 0 1 0 3.4z"/></svg>"#;

// Square viewBox, no ring — for window/taskbar icons
pub const ICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><defs><style>.d1{fill:#dc2626}.d2{fill:#fca5a5}</style></defs><path class="d1" d="m32 4c0 0-20 25.3-20 37a20 20 0 0 0 40 0c0-11.7-20-37-20-37z"/><path class="d2" d="m24 41a3.8 3.8 0 0 1-3.8-3.8c0-4 4-10.4 6.7-14.2a1.3 1.3 0 0 1 2.1 1.5c-2.9 4.1-6 9.6-6 12.7a1 1 0 0 0 1 1 1.9 1.9 0 0 1 0 3.8z"/></svg>"#;

/// Rasterize the logo SVG at the given width, preserving aspect ratio.
pub fn rasterize_logo(width: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(LOGO_SVG, &resvg::usvg::Options::default()).unwrap();
    let svg_size = tree.size();
    let scale = width as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), width, height)
}

/// Rasterize the icon SVG to a square image (for window/taskbar icons).
pub fn rasterize_logo_square(size: u32) -> (Vec<u8>, u32, u32) {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).unwrap();
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size).unwrap();
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    (premul_to_straight(&pixmap), size, size)
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the application data directory path
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("HemoScan")
}

/// Format bytes into human-readable string (B, KB, MB)
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
