//! Color parsing utilities for CLI color specifications.

use planter_utils::{RgbColor, parse_hex_color};

/// Parse a background color specification from a CLI argument.
/// Accepts formats: #RRGGBB, #RGB, rgb(), or comma-separated values.
pub fn parse_color_spec(raw: &str) -> Result<RgbColor, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("color value is empty".to_string());
    }

    if let Some(color) = parse_hex_color(trimmed) {
        return Ok(color);
    }
    if let Some(args) = parse_fn_args(trimmed, "rgb") {
        let (r, g, b) = parse_rgb_components(&args)?;
        return Ok(RgbColor::new(r, g, b));
    }

    if trimmed.contains(',') {
        let parts: Vec<_> = trimmed
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() == 3 {
            let (r, g, b) = parse_rgb_components(&parts)?;
            return Ok(RgbColor::new(r, g, b));
        }
    }

    Err(format!(
        "unrecognized color format '{}'; expected #RRGGBB, rgb(), or r,g,b",
        trimmed
    ))
}

fn parse_fn_args<'a>(input: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let open = input.find('(')?;
    let close = input.rfind(')')?;
    if close <= open {
        return None;
    }
    if !input[..open].trim().eq_ignore_ascii_case(name) {
        return None;
    }
    let args = input[open + 1..close]
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if args.is_empty() { None } else { Some(args) }
}

fn parse_rgb_components(parts: &[&str]) -> Result<(u8, u8, u8), String> {
    if parts.len() < 3 {
        return Err("expected three values for rgb()".to_string());
    }
    Ok((
        parse_rgb_value(parts[0])?,
        parse_rgb_value(parts[1])?,
        parse_rgb_value(parts[2])?,
    ))
}

fn parse_rgb_value(token: &str) -> Result<u8, String> {
    let value: f32 = token
        .parse()
        .map_err(|_| format!("invalid RGB component '{}'", token))?;
    if !(0.0..=255.0).contains(&value) {
        return Err(format!(
            "RGB component '{}' must be between 0 and 255",
            token
        ));
    }
    Ok(value.round() as u8)
}
