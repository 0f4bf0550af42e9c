//! Text parsing and formatting for every value type

use std::str::FromStr;

use cvarkit_sdk::VarType;

/// Errors produced when text does not parse as a value type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing to parse
    #[error("empty {0} value")]
    Empty(VarType),

    /// Text is not a value of the type
    #[error("'{input}' is not a valid {ty} value")]
    Invalid { ty: VarType, input: String },

    /// Integer outside the type's range
    #[error("'{input}' is out of range for {ty}")]
    OutOfRange { ty: VarType, input: String },

    /// Aggregate with the wrong number of components
    #[error("{ty} expects {expected} components, found {found}")]
    Arity {
        ty: VarType,
        expected: &'static str,
        found: usize,
    },

    /// The invalid type accepts no text at all
    #[error("cannot parse a value of the invalid type")]
    InvalidType,
}

fn invalid(ty: VarType, input: &str) -> ParseError {
    ParseError::Invalid {
        ty,
        input: input.to_string(),
    }
}

fn non_empty(ty: VarType, text: &str) -> Result<&str, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        Err(ParseError::Empty(ty))
    } else {
        Ok(text)
    }
}

/// Parse a boolean: `true/false`, `1/0`, `yes/no`, `on/off`, any case
pub fn parse_bool(text: &str) -> Result<bool, ParseError> {
    let text = non_empty(VarType::Bool, text)?;
    match text.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(VarType::Bool, text)),
    }
}

/// Parse a decimal integer of type `T`, rejecting overflow
pub fn parse_int<T>(ty: VarType, text: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    use std::num::IntErrorKind;

    let text = non_empty(ty, text)?;
    text.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ParseError::OutOfRange {
            ty,
            input: text.to_string(),
        },
        _ => invalid(ty, text),
    })
}

/// Parse a floating point number of type `T`
///
/// Non-finite text (`nan`, `inf`) is rejected.
pub fn parse_float<T>(ty: VarType, text: &str) -> Result<T, ParseError>
where
    T: FromStr<Err = std::num::ParseFloatError> + Copy + Into<f64>,
{
    let text = non_empty(ty, text)?;
    let value = text.parse::<T>().map_err(|_| invalid(ty, text))?;
    if !Into::<f64>::into(value).is_finite() {
        return Err(invalid(ty, text));
    }
    Ok(value)
}

/// Parse exactly `N` whitespace-separated floats
pub fn parse_components<const N: usize>(ty: VarType, text: &str) -> Result<[f32; N], ParseError> {
    let text = non_empty(ty, text)?;
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != N {
        return Err(ParseError::Arity {
            ty,
            expected: arity_name(N),
            found: parts.len(),
        });
    }

    let mut out = [0.0f32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse::<f32>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| invalid(ty, text))?;
    }
    Ok(out)
}

/// Parse a color from three or four channel values in 0..=255
///
/// A missing alpha channel means fully opaque.
pub fn parse_color(text: &str) -> Result<[u8; 4], ParseError> {
    let ty = VarType::Color;
    let text = non_empty(ty, text)?;
    let parts: Vec<&str> = text.split_whitespace().collect();
    if !(3..=4).contains(&parts.len()) {
        return Err(ParseError::Arity {
            ty,
            expected: "3 or 4",
            found: parts.len(),
        });
    }

    let mut out = [0, 0, 0, 255];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_int::<u8>(ty, part).map_err(|e| match e {
            ParseError::OutOfRange { .. } => ParseError::OutOfRange {
                ty,
                input: text.to_string(),
            },
            _ => invalid(ty, text),
        })?;
    }
    Ok(out)
}

fn arity_name(n: usize) -> &'static str {
    match n {
        2 => "2",
        3 => "3",
        4 => "4",
        _ => "N",
    }
}

/// Format a float so that parsing the text yields the same value
pub fn format_float<T: std::fmt::Display>(value: T) -> String {
    value.to_string()
}

/// Format float components separated by single spaces
pub fn format_components(components: &[f32]) -> String {
    components
        .iter()
        .map(|c| format_float(*c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a color, omitting alpha when it is fully opaque
pub fn format_color(c: [u8; 4]) -> String {
    if c[3] == 255 {
        format!("{} {} {}", c[0], c[1], c[2])
    } else {
        format!("{} {} {} {}", c[0], c[1], c[2], c[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        for text in ["1", "true", "TRUE", "yes", "on", " true "] {
            assert_eq!(parse_bool(text), Ok(true), "{text}");
        }
        for text in ["0", "false", "No", "off"] {
            assert_eq!(parse_bool(text), Ok(false), "{text}");
        }
        assert!(parse_bool("maybe").is_err());
        assert_eq!(parse_bool(""), Err(ParseError::Empty(VarType::Bool)));
    }

    #[test]
    fn test_parse_int_range() {
        assert_eq!(parse_int::<i16>(VarType::Int16, "-32768"), Ok(i16::MIN));
        assert!(matches!(
            parse_int::<i16>(VarType::Int16, "40000"),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_int::<u32>(VarType::UInt32, "-1"),
            Err(ParseError::Invalid { .. })
        ));
        assert_eq!(parse_int::<i32>(VarType::Int32, " +7 "), Ok(7));
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float::<f32>(VarType::Float32, "1.5"), Ok(1.5));
        assert_eq!(parse_float::<f64>(VarType::Float64, "-2e3"), Ok(-2000.0));
        assert!(parse_float::<f32>(VarType::Float32, "abc").is_err());
        for text in ["nan", "NaN", "inf", "-infinity", "1e999"] {
            assert!(parse_float::<f32>(VarType::Float32, text).is_err(), "{text}");
        }
        assert!(parse_float::<f64>(VarType::Float64, "nan").is_err());
    }

    #[test]
    fn test_parse_components_arity() {
        assert_eq!(
            parse_components::<3>(VarType::Vector3, "1 2.5 -3"),
            Ok([1.0, 2.5, -3.0])
        );
        assert!(matches!(
            parse_components::<3>(VarType::Vector3, "1 2"),
            Err(ParseError::Arity { found: 2, .. })
        ));
        assert!(parse_components::<2>(VarType::Vector2, "1 x").is_err());
        assert!(matches!(
            parse_components::<3>(VarType::Vector3, "1 nan 3"),
            Err(ParseError::Invalid { .. })
        ));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("255 0 0"), Ok([255, 0, 0, 255]));
        assert_eq!(parse_color("1 2 3 4"), Ok([1, 2, 3, 4]));
        assert!(matches!(
            parse_color("256 0 0"),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(parse_color("1 2").is_err());
    }

    #[test]
    fn test_format_color_alpha() {
        assert_eq!(format_color([1, 2, 3, 255]), "1 2 3");
        assert_eq!(format_color([1, 2, 3, 4]), "1 2 3 4");
    }

    #[test]
    fn test_format_float_roundtrips() {
        let value = 0.1f32 + 0.2f32;
        let text = format_float(value);
        assert_eq!(text.parse::<f32>().unwrap(), value);
        assert_eq!(format_components(&[1.0, 0.5]), "1 0.5");
    }
}
