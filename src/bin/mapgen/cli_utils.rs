use depthgen::depth_map::MAX_DIMENSION;
use depthgen::errors::{MapGenError, MapGenResult};
use std::path::Path;

/// Generic parser for delimited strings that return fixed-size arrays
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, std::num::ParseIntError>,
) -> MapGenResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(MapGenError::InvalidParameters {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part.trim()).map_err(|_| MapGenError::InvalidParameters {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> MapGenResult<(u32, u32)> {
    let [width, height] =
        parse_delimited::<u32, 2>(&size_str.to_ascii_lowercase(), 'x', "size", |s| s.parse())?;

    if width < 2 || height < 2 {
        return Err(MapGenError::InvalidDimensions { width, height });
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(MapGenError::DimensionsTooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }

    Ok((width, height))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    RawRgba,
}

/// Pick the output encoding from the file extension
pub fn output_format(path: &Path) -> MapGenResult<OutputFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => Ok(OutputFormat::Png),
        Some("rgba") | Some("raw") => Ok(OutputFormat::RawRgba),
        _ => Err(MapGenError::InvalidParameters {
            reason: format!(
                "Unsupported output '{}'. Use a .png, .rgba or .raw file",
                path.display()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x64").unwrap(), (64, 64));
        assert_eq!(parse_size("128X256").unwrap(), (128, 256));
        assert_eq!(parse_size("2x2").unwrap(), (2, 2));

        assert!(parse_size("64").is_err());
        assert!(parse_size("1x64").is_err());
        assert!(matches!(
            parse_size("3000x64"),
            Err(MapGenError::DimensionsTooLarge { width: 3000, height: 64, max: 2048 })
        ));
        assert!(parse_size("axb").is_err());
        assert!(parse_size("64x64x64").is_err());
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(Path::new("map.png")).unwrap(), OutputFormat::Png);
        assert_eq!(output_format(Path::new("out/MAP.PNG")).unwrap(), OutputFormat::Png);
        assert_eq!(output_format(Path::new("map.rgba")).unwrap(), OutputFormat::RawRgba);
        assert_eq!(output_format(Path::new("map.raw")).unwrap(), OutputFormat::RawRgba);

        assert!(output_format(Path::new("map.jpg")).is_err());
        assert!(output_format(Path::new("map")).is_err());
    }
}
