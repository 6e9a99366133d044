use crate::error::{Error, Result};
use phf::phf_map;
use std::f64::consts::PI;

/// Physical quantity a CSS unit measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
}

struct UnitDef {
    kind: UnitKind,
    /// Multiplier to the canonical unit of `kind`; `None` for units that depend on
    /// layout (font metrics, viewport, container).
    factor: Option<f64>,
}

const fn fixed(kind: UnitKind, factor: f64) -> UnitDef {
    UnitDef {
        kind,
        factor: Some(factor),
    }
}

const fn relative(kind: UnitKind) -> UnitDef {
    UnitDef { kind, factor: None }
}

static UNITS: phf::Map<&'static str, UnitDef> = phf_map! {
    // Absolute lengths
    "px" => fixed(UnitKind::Length, 1.0),
    "cm" => fixed(UnitKind::Length, 96.0 / 2.54),
    "mm" => fixed(UnitKind::Length, 96.0 / 25.4),
    "q" => fixed(UnitKind::Length, 96.0 / 101.6),
    "in" => fixed(UnitKind::Length, 96.0),
    "pc" => fixed(UnitKind::Length, 16.0),
    "pt" => fixed(UnitKind::Length, 96.0 / 72.0),

    // Font-relative lengths
    "em" => relative(UnitKind::Length),
    "rem" => relative(UnitKind::Length),
    "ex" => relative(UnitKind::Length),
    "rex" => relative(UnitKind::Length),
    "cap" => relative(UnitKind::Length),
    "rcap" => relative(UnitKind::Length),
    "ch" => relative(UnitKind::Length),
    "rch" => relative(UnitKind::Length),
    "ic" => relative(UnitKind::Length),
    "ric" => relative(UnitKind::Length),
    "lh" => relative(UnitKind::Length),
    "rlh" => relative(UnitKind::Length),

    // Viewport-relative lengths
    "vw" => relative(UnitKind::Length),
    "vh" => relative(UnitKind::Length),
    "vi" => relative(UnitKind::Length),
    "vb" => relative(UnitKind::Length),
    "vmin" => relative(UnitKind::Length),
    "vmax" => relative(UnitKind::Length),
    "svw" => relative(UnitKind::Length),
    "svh" => relative(UnitKind::Length),
    "svi" => relative(UnitKind::Length),
    "svb" => relative(UnitKind::Length),
    "svmin" => relative(UnitKind::Length),
    "svmax" => relative(UnitKind::Length),
    "lvw" => relative(UnitKind::Length),
    "lvh" => relative(UnitKind::Length),
    "lvi" => relative(UnitKind::Length),
    "lvb" => relative(UnitKind::Length),
    "lvmin" => relative(UnitKind::Length),
    "lvmax" => relative(UnitKind::Length),
    "dvw" => relative(UnitKind::Length),
    "dvh" => relative(UnitKind::Length),
    "dvi" => relative(UnitKind::Length),
    "dvb" => relative(UnitKind::Length),
    "dvmin" => relative(UnitKind::Length),
    "dvmax" => relative(UnitKind::Length),

    // Container-relative lengths
    "cqw" => relative(UnitKind::Length),
    "cqh" => relative(UnitKind::Length),
    "cqi" => relative(UnitKind::Length),
    "cqb" => relative(UnitKind::Length),
    "cqmin" => relative(UnitKind::Length),
    "cqmax" => relative(UnitKind::Length),

    // Angles
    "deg" => fixed(UnitKind::Angle, 1.0),
    "grad" => fixed(UnitKind::Angle, 0.9),
    "rad" => fixed(UnitKind::Angle, 180.0 / PI),
    "turn" => fixed(UnitKind::Angle, 360.0),

    // Times
    "s" => fixed(UnitKind::Time, 1.0),
    "ms" => fixed(UnitKind::Time, 0.001),

    // Frequencies
    "hz" => fixed(UnitKind::Frequency, 1.0),
    "khz" => fixed(UnitKind::Frequency, 1000.0),

    // Resolutions
    "dppx" => fixed(UnitKind::Resolution, 1.0),
    "x" => fixed(UnitKind::Resolution, 1.0),
    "dpi" => fixed(UnitKind::Resolution, 1.0 / 96.0),
    "dpcm" => fixed(UnitKind::Resolution, 2.54 / 96.0),
};

fn lookup(unit: &str) -> Option<&'static UnitDef> {
    if unit.bytes().any(|b| b.is_ascii_uppercase()) {
        UNITS.get(unit.to_ascii_lowercase().as_str())
    } else {
        UNITS.get(unit)
    }
}

/// The kind of a known unit (case-insensitive).
pub fn unit_kind(unit: &str) -> Option<UnitKind> {
    lookup(unit).map(|def| def.kind)
}

pub fn is_length_unit(unit: &str) -> bool {
    unit_kind(unit) == Some(UnitKind::Length)
}

pub fn is_angle_unit(unit: &str) -> bool {
    unit_kind(unit) == Some(UnitKind::Angle)
}

/// Canonical unit for a quantity.
pub fn canonical_unit(kind: UnitKind) -> &'static str {
    match kind {
        UnitKind::Length => "px",
        UnitKind::Angle => "deg",
        UnitKind::Time => "s",
        UnitKind::Frequency => "hz",
        UnitKind::Resolution => "dppx",
    }
}

/// Convert `value` in `unit` to the canonical unit of its kind.
///
/// Unknown units and layout-dependent units are returned unchanged (lowercased).
pub fn canonicalize(value: f64, unit: &str) -> (f64, String) {
    match lookup(unit) {
        Some(UnitDef {
            kind,
            factor: Some(factor),
        }) => (value * factor, canonical_unit(*kind).to_string()),
        _ => (value, unit.to_ascii_lowercase()),
    }
}

/// Convert `value` between two units of the same kind.
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64> {
    let src = lookup(from).ok_or_else(|| Error::UnknownUnit(from.to_string()))?;
    let dst = lookup(to).ok_or_else(|| Error::UnknownUnit(to.to_string()))?;
    match (src.factor, dst.factor) {
        (Some(src_factor), Some(dst_factor)) if src.kind == dst.kind => {
            Ok(value * src_factor / dst_factor)
        }
        _ => Err(Error::Incompatible {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Pixels for an absolute length (`px`, `cm`, `mm`, `q`, `in`, `pc`, `pt`).
pub fn absolute_length_to_px(value: f64, unit: &str) -> Option<f64> {
    convert(value, unit, "px").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_units() {
        assert_eq!(unit_kind("px"), Some(UnitKind::Length));
        assert_eq!(unit_kind("PX"), Some(UnitKind::Length));
        assert_eq!(unit_kind("turn"), Some(UnitKind::Angle));
        assert_eq!(unit_kind("ms"), Some(UnitKind::Time));
        assert_eq!(unit_kind("foo"), None);
        assert!(is_length_unit("vmin"));
        assert!(is_angle_unit("rad"));
        assert!(!is_length_unit("s"));
    }

    #[test]
    fn canonicalizes_absolute_units() {
        assert_eq!(canonicalize(1.0, "in"), (96.0, "px".to_string()));
        assert_eq!(canonicalize(500.0, "ms"), (0.5, "s".to_string()));
        assert_eq!(canonicalize(1.0, "turn"), (360.0, "deg".to_string()));
        assert_eq!(canonicalize(2.0, "x"), (2.0, "dppx".to_string()));
        assert_eq!(canonicalize(2.0, "EM"), (2.0, "em".to_string()));
    }

    #[test]
    fn converts_between_compatible_units() {
        assert_eq!(convert(1.0, "in", "pc").ok(), Some(6.0));
        assert_eq!(absolute_length_to_px(1.0, "pc"), Some(16.0));
        assert_eq!(absolute_length_to_px(1.0, "em"), None);
        assert!(matches!(
            convert(1.0, "px", "deg"),
            Err(Error::Incompatible { .. })
        ));
        assert!(matches!(
            convert(1.0, "furlong", "px"),
            Err(Error::UnknownUnit(_))
        ));
    }
}
