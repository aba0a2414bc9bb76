//! Color built-ins (spec §4.4.4 `color functions`).

use codemap::Span;

use crate::args::CallArgs;
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::value::{SassColor, Value};

fn as_color(v: &Value, span: Span) -> SassResult<SassColor> {
    match v {
        Value::Color(c) => Ok((**c).clone()),
        other => Err(SassError::new(
            SassErrorKind::TypeMismatch(format!("{} is not a color.", other.inspect())),
            span,
        )),
    }
}

fn as_f64(v: &Value, span: Span) -> SassResult<f64> {
    match v {
        Value::Number(n) => Ok(n.value),
        other => Err(SassError::new(
            SassErrorKind::TypeMismatch(format!("{} is not a number.", other.inspect())),
            span,
        )),
    }
}

fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

fn require(args: &CallArgs, index: usize, name: &str, span: Span) -> SassResult<Value> {
    args.get(index, name).ok_or_else(|| {
        SassError::new(SassErrorKind::MissingArgument(format!("Missing argument ${name}.")), span)
    })
}

fn channel(args: &CallArgs, name: &str, span: Span) -> SassResult<Option<f64>> {
    args.named(name).map(|v| as_f64(&v, span)).transpose()
}

/// `adjust-color($color, $red:, $green:, $blue:, $hue:, $saturation:,
/// $lightness:, $alpha:)`: adds a delta to each named channel (spec
/// §4.4.4). RGB and HSL channels may not be mixed in the same call.
fn adjust_color(args: &CallArgs, span: Span) -> SassResult<Value> {
    let c = as_color(&require(args, 0, "color", span)?, span)?;
    let red = channel(args, "red", span)?;
    let green = channel(args, "green", span)?;
    let blue = channel(args, "blue", span)?;
    let hue = channel(args, "hue", span)?;
    let saturation = channel(args, "saturation", span)?;
    let lightness = channel(args, "lightness", span)?;
    let alpha = channel(args, "alpha", span)?;

    let has_rgb = red.is_some() || green.is_some() || blue.is_some();
    let has_hsl = hue.is_some() || saturation.is_some() || lightness.is_some();
    if has_rgb && has_hsl {
        return Err(SassError::new(
            SassErrorKind::InvalidArgument(
                "Cannot specify both RGB and HSL values for adjust-color().".to_string(),
            ),
            span,
        ));
    }

    let mut out = c.clone();
    if has_rgb {
        if let Some(d) = red {
            out = out.with_red((f64::from(out.red()) + d).clamp(0.0, 255.0).round() as u8);
        }
        if let Some(d) = green {
            out = out.with_green((f64::from(out.green()) + d).clamp(0.0, 255.0).round() as u8);
        }
        if let Some(d) = blue {
            out = out.with_blue((f64::from(out.blue()) + d).clamp(0.0, 255.0).round() as u8);
        }
    } else if has_hsl {
        out = out.with_hsl(
            out.hue() + hue.unwrap_or(0.0),
            clamp_pct(out.saturation() + saturation.unwrap_or(0.0)),
            clamp_pct(out.lightness() + lightness.unwrap_or(0.0)),
        );
    }
    if let Some(d) = alpha {
        out = out.with_alpha(out.alpha() + d);
    }
    Ok(Value::Color(Box::new(out)))
}

/// `scale-color($color, $red:, ..., $alpha:)`: scales each named channel
/// a percentage of the way towards its limit (spec §4.4.4) — a positive
/// percentage moves towards the channel's maximum, negative towards 0.
fn scale_color(args: &CallArgs, span: Span) -> SassResult<Value> {
    fn scale(current: f64, max: f64, pct: f64) -> f64 {
        if pct >= 0.0 {
            current + (max - current) * pct / 100.0
        } else {
            current + current * pct / 100.0
        }
    }

    let c = as_color(&require(args, 0, "color", span)?, span)?;
    let red = channel(args, "red", span)?;
    let green = channel(args, "green", span)?;
    let blue = channel(args, "blue", span)?;
    let saturation = channel(args, "saturation", span)?;
    let lightness = channel(args, "lightness", span)?;
    let alpha = channel(args, "alpha", span)?;

    let mut out = c.clone();
    if red.is_some() || green.is_some() || blue.is_some() {
        if let Some(p) = red {
            out = out.with_red(scale(f64::from(out.red()), 255.0, p).clamp(0.0, 255.0).round() as u8);
        }
        if let Some(p) = green {
            out = out.with_green(scale(f64::from(out.green()), 255.0, p).clamp(0.0, 255.0).round() as u8);
        }
        if let Some(p) = blue {
            out = out.with_blue(scale(f64::from(out.blue()), 255.0, p).clamp(0.0, 255.0).round() as u8);
        }
    }
    if saturation.is_some() || lightness.is_some() {
        out = out.with_hsl(
            out.hue(),
            clamp_pct(scale(out.saturation(), 100.0, saturation.unwrap_or(0.0))),
            clamp_pct(scale(out.lightness(), 100.0, lightness.unwrap_or(0.0))),
        );
    }
    if let Some(p) = alpha {
        out = out.with_alpha(scale(out.alpha(), 1.0, p));
    }
    Ok(Value::Color(Box::new(out)))
}

/// `change-color($color, $red:, ..., $alpha:)`: sets each named channel
/// to an absolute value rather than adjusting it (spec §4.4.4).
fn change_color(args: &CallArgs, span: Span) -> SassResult<Value> {
    let c = as_color(&require(args, 0, "color", span)?, span)?;
    let red = channel(args, "red", span)?;
    let green = channel(args, "green", span)?;
    let blue = channel(args, "blue", span)?;
    let hue = channel(args, "hue", span)?;
    let saturation = channel(args, "saturation", span)?;
    let lightness = channel(args, "lightness", span)?;
    let alpha = channel(args, "alpha", span)?;

    let has_rgb = red.is_some() || green.is_some() || blue.is_some();
    let has_hsl = hue.is_some() || saturation.is_some() || lightness.is_some();
    if has_rgb && has_hsl {
        return Err(SassError::new(
            SassErrorKind::InvalidArgument(
                "Cannot specify both RGB and HSL values for change-color().".to_string(),
            ),
            span,
        ));
    }

    let mut out = c.clone();
    if has_rgb {
        if let Some(v) = red {
            out = out.with_red(v.clamp(0.0, 255.0).round() as u8);
        }
        if let Some(v) = green {
            out = out.with_green(v.clamp(0.0, 255.0).round() as u8);
        }
        if let Some(v) = blue {
            out = out.with_blue(v.clamp(0.0, 255.0).round() as u8);
        }
    } else if has_hsl {
        out = out.with_hsl(
            hue.unwrap_or_else(|| out.hue()),
            clamp_pct(saturation.unwrap_or_else(|| out.saturation())),
            clamp_pct(lightness.unwrap_or_else(|| out.lightness())),
        );
    }
    if let Some(v) = alpha {
        out = out.with_alpha(v);
    }
    Ok(Value::Color(Box::new(out)))
}

/// `ie-hex-str($color)`: the `#AARRGGBB` form Internet Explorer filters
/// expect (spec §4.4.4).
fn ie_hex_str(args: &CallArgs, span: Span) -> SassResult<Value> {
    let c = as_color(&require(args, 0, "color", span)?, span)?;
    let a = (c.alpha() * 255.0).round() as u8;
    Ok(Value::string(
        format!("#{:02X}{:02X}{:02X}{:02X}", a, c.red(), c.green(), c.blue()),
        crate::common::QuoteKind::None,
    ))
}

pub(crate) fn call(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    match name {
        "adjust-color" => return Ok(Some(adjust_color(args, span)?)),
        "scale-color" => return Ok(Some(scale_color(args, span)?)),
        "change-color" => return Ok(Some(change_color(args, span)?)),
        "ie-hex-str" => return Ok(Some(ie_hex_str(args, span)?)),
        _ => {}
    }
    let p = args.to_positional(span)?;
    Ok(Some(match name {
        "rgb" | "rgba" => match p.len() {
            1 => return Ok(Some(p[0].clone())),
            2 => {
                let c = as_color(&p[0], span)?;
                Value::Color(Box::new(c.with_alpha(as_f64(&p[1], span)?)))
            }
            3 => {
                let r = as_f64(&p[0], span)?.clamp(0.0, 255.0).round() as u8;
                let g = as_f64(&p[1], span)?.clamp(0.0, 255.0).round() as u8;
                let b = as_f64(&p[2], span)?.clamp(0.0, 255.0).round() as u8;
                Value::Color(Box::new(SassColor::from_rgba(r, g, b, 1.0)))
            }
            4 => {
                let r = as_f64(&p[0], span)?.clamp(0.0, 255.0).round() as u8;
                let g = as_f64(&p[1], span)?.clamp(0.0, 255.0).round() as u8;
                let b = as_f64(&p[2], span)?.clamp(0.0, 255.0).round() as u8;
                let a = as_f64(&p[3], span)?;
                Value::Color(Box::new(SassColor::from_rgba(r, g, b, a)))
            }
            _ => {
                return Err(SassError::new(
                    SassErrorKind::InvalidArgument(format!("Wrong number of arguments to {name}().")),
                    span,
                ))
            }
        },
        "hsl" | "hsla" => {
            let h = as_f64(&p[0], span)?;
            let s = as_f64(&p[1], span)?;
            let l = as_f64(&p[2], span)?;
            let a = p.get(3).map_or(Ok(1.0), |v| as_f64(v, span))?;
            Value::Color(Box::new(SassColor::from_hsla(h, s, l, a)))
        }
        "red" => Value::Number(crate::value::SassNumber::new_unitless(f64::from(
            as_color(&p[0], span)?.red(),
        ))),
        "green" => Value::Number(crate::value::SassNumber::new_unitless(f64::from(
            as_color(&p[0], span)?.green(),
        ))),
        "blue" => Value::Number(crate::value::SassNumber::new_unitless(f64::from(
            as_color(&p[0], span)?.blue(),
        ))),
        "alpha" | "opacity" => Value::Number(crate::value::SassNumber::new_unitless(
            as_color(&p[0], span)?.alpha(),
        )),
        "hue" => Value::Number(crate::value::SassNumber::with_unit(
            as_color(&p[0], span)?.hue(),
            crate::unit::Unit::new("deg"),
        )),
        "saturation" => Value::Number(crate::value::SassNumber::with_unit(
            as_color(&p[0], span)?.saturation(),
            crate::unit::Unit::new("%"),
        )),
        "lightness" => Value::Number(crate::value::SassNumber::with_unit(
            as_color(&p[0], span)?.lightness(),
            crate::unit::Unit::new("%"),
        )),
        "mix" => {
            let c1 = as_color(&p[0], span)?;
            let c2 = as_color(&p[1], span)?;
            let weight = p.get(2).map_or(Ok(50.0), |v| as_f64(v, span))? / 100.0;
            let alpha_diff = c1.alpha() - c2.alpha();
            let w1 = if (alpha_diff).abs() < 1e-9 {
                weight
            } else {
                let a = weight * 2.0 - 1.0;
                let w = if (a * alpha_diff).abs() + 1.0 > 0.0 {
                    (a + alpha_diff) / (1.0 + a * alpha_diff)
                } else {
                    a
                };
                (w + 1.0) / 2.0
            };
            let w2 = 1.0 - w1;
            let mix_channel = |a: u8, b: u8| -> u8 {
                (f64::from(a) * w1 + f64::from(b) * w2).round() as u8
            };
            Value::Color(Box::new(SassColor::from_rgba(
                mix_channel(c1.red(), c2.red()),
                mix_channel(c1.green(), c2.green()),
                mix_channel(c1.blue(), c2.blue()),
                c1.alpha() * weight + c2.alpha() * (1.0 - weight),
            )))
        }
        "lighten" => {
            let c = as_color(&p[0], span)?;
            let amount = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue(), c.saturation(), clamp_pct(c.lightness() + amount))))
        }
        "darken" => {
            let c = as_color(&p[0], span)?;
            let amount = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue(), c.saturation(), clamp_pct(c.lightness() - amount))))
        }
        "saturate" => {
            let c = as_color(&p[0], span)?;
            let amount = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue(), clamp_pct(c.saturation() + amount), c.lightness())))
        }
        "desaturate" => {
            let c = as_color(&p[0], span)?;
            let amount = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue(), clamp_pct(c.saturation() - amount), c.lightness())))
        }
        "grayscale" => {
            let c = as_color(&p[0], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue(), 0.0, c.lightness())))
        }
        "invert" => {
            let c = as_color(&p[0], span)?;
            let weight = p.get(1).map_or(Ok(100.0), |v| as_f64(v, span))? / 100.0;
            let inverted = SassColor::from_rgba(255 - c.red(), 255 - c.green(), 255 - c.blue(), c.alpha());
            let blend = |a: u8, b: u8| -> u8 {
                (f64::from(a) * weight + f64::from(b) * (1.0 - weight)).round() as u8
            };
            Value::Color(Box::new(SassColor::from_rgba(
                blend(inverted.red(), c.red()),
                blend(inverted.green(), c.green()),
                blend(inverted.blue(), c.blue()),
                c.alpha(),
            )))
        }
        "opacify" | "fade-in" => {
            let c = as_color(&p[0], span)?;
            let amount = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_alpha(c.alpha() + amount)))
        }
        "transparentize" | "fade-out" => {
            let c = as_color(&p[0], span)?;
            let amount = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_alpha(c.alpha() - amount)))
        }
        "adjust-hue" => {
            let c = as_color(&p[0], span)?;
            let degrees = as_f64(&p[1], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue() + degrees, c.saturation(), c.lightness())))
        }
        "complement" => {
            let c = as_color(&p[0], span)?;
            Value::Color(Box::new(c.with_hsl(c.hue() + 180.0, c.saturation(), c.lightness())))
        }
        _ => return Ok(None),
    }))
}
