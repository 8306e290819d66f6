// pixie-batch/src/utils/mod.rs
use crate::core::{Transform, SUPPORTED_EXTENSIONS};
use std::path::Path;

/// Name of the file an operation writes for `file_name`.
pub fn output_file_name(file_name: &str, transform: &Transform) -> String {
    match transform {
        Transform::Resize { .. } => format!("resized_{}", file_name),
        Transform::Filter { .. } => format!("filtered_{}", file_name),
        Transform::Enhance => format!("enhanced_{}", file_name),
        Transform::Convert { extension, .. } => {
            let stem = Path::new(file_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(file_name);
            format!("{}.{}", stem, extension)
        }
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

pub fn is_supported_format(path: &Path) -> bool {
    get_file_extension(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FilterKind;
    use image::ImageFormat;

    #[test]
    fn test_output_names() {
        let resize = Transform::Resize {
            width: 1,
            height: 1,
        };
        let filter = Transform::Filter {
            kind: FilterKind::Sharpen,
            value: 2.0,
        };
        let convert = Transform::Convert {
            format: ImageFormat::Bmp,
            extension: "bmp".to_string(),
        };

        assert_eq!(output_file_name("cat.png", &resize), "resized_cat.png");
        assert_eq!(output_file_name("cat.png", &filter), "filtered_cat.png");
        assert_eq!(output_file_name("cat.png", &Transform::Enhance), "enhanced_cat.png");
        assert_eq!(output_file_name("cat.tar.PNG", &convert), "cat.tar.bmp");
    }

    #[test]
    fn test_supported_formats() {
        assert!(is_supported_format(Path::new("x/IMG_01.JPG")));
        assert!(is_supported_format(Path::new("scan.bmp")));
        assert!(!is_supported_format(Path::new("anim.gif")));
        assert!(!is_supported_format(Path::new("README")));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
    }
}
