//=========================================================================
// Easing
//=========================================================================
//
// Progress curves for scene transitions.
//
// Every family is defined by its "in" curve. The "out" variant is its
// reflection. "In-out" joins the two halves, except for Back and Elastic
// which use their own in-out formulas.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::PI;
use std::fmt;

use log::warn;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

//=== EasingFamily ========================================================

/// Curve family shared by the in/out/in-out variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EasingFamily {
    Quad,
    Cubic,
    Quart,
    Sine,
    Expo,
    Circ,
    Back,
    Elastic,
    Bounce,
}

impl EasingFamily {
    pub const ALL: [EasingFamily; 9] = [
        Self::Quad,
        Self::Cubic,
        Self::Quart,
        Self::Sine,
        Self::Expo,
        Self::Circ,
        Self::Back,
        Self::Elastic,
        Self::Bounce,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Quad => "Quad",
            Self::Cubic => "Cubic",
            Self::Quart => "Quart",
            Self::Sine => "Sine",
            Self::Expo => "Expo",
            Self::Circ => "Circ",
            Self::Back => "Back",
            Self::Elastic => "Elastic",
            Self::Bounce => "Bounce",
        }
    }

    /// The accelerating ("in") form of the curve.
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Self::Quad => t * t,
            Self::Cubic => t * t * t,
            Self::Quart => t * t * t * t,
            Self::Sine => 1.0 - (t * PI / 2.0).cos(),
            Self::Expo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            Self::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::Back => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Self::Elastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Self::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }

    /// The symmetric form. `t` is strictly inside (0, 1).
    fn ease_in_out(self, t: f32) -> f32 {
        match self {
            Self::Back => {
                let s = 2.0 * t;
                if t < 0.5 {
                    s * s * ((BACK_C2 + 1.0) * s - BACK_C2) / 2.0
                } else {
                    let s = s - 2.0;
                    (s * s * ((BACK_C2 + 1.0) * s + BACK_C2) + 2.0) / 2.0
                }
            }
            Self::Elastic => {
                let wave = ((20.0 * t - 11.125) * ELASTIC_C5).sin();
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * wave) / 2.0
                } else {
                    2f32.powf(-20.0 * t + 10.0) * wave / 2.0 + 1.0
                }
            }
            _ => {
                if t < 0.5 {
                    self.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - self.ease_in(2.0 - 2.0 * t) / 2.0
                }
            }
        }
    }
}

//=== EasingMode ==========================================================

/// Which end of the curve accelerates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EasingMode {
    /// Start slow, accelerate.
    In,
    /// Start fast, decelerate.
    Out,
    /// Start slow, speed up, then slow down.
    InOut,
}

impl EasingMode {
    pub const ALL: [EasingMode; 3] = [Self::In, Self::Out, Self::InOut];

    fn prefix(self) -> &'static str {
        match self {
            Self::In => "easeIn",
            Self::Out => "easeOut",
            Self::InOut => "easeInOut",
        }
    }
}

//=== Easing ==============================================================

/// Easing functions for smooth transitions.
///
/// These control the acceleration curve of transition animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed throughout.
    #[default]
    Linear,
    /// A named curve such as `easeInOutCubic`.
    Curve(EasingFamily, EasingMode),
}

impl Easing {
    pub fn ease_in(family: EasingFamily) -> Self {
        Self::Curve(family, EasingMode::In)
    }

    pub fn ease_out(family: EasingFamily) -> Self {
        Self::Curve(family, EasingMode::Out)
    }

    pub fn ease_in_out(family: EasingFamily) -> Self {
        Self::Curve(family, EasingMode::InOut)
    }

    /// Looks up an easing by name, e.g. `"linear"` or `"easeOutBounce"`.
    ///
    /// Matching ignores case, `_` and `-`, so `"ease_in_out_cubic"` also
    /// works. Unknown names fall back to [`Easing::Linear`].
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!("Unknown easing '{}', falling back to linear", name);
            Self::Linear
        })
    }

    /// Strict lookup; `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if normalized == "linear" {
            return Some(Self::Linear);
        }

        // Longest prefix first so "easeinout" is not taken for "easein".
        let modes = [EasingMode::InOut, EasingMode::Out, EasingMode::In];
        let (mode, rest) = modes.iter().find_map(|mode| {
            let prefix = mode.prefix().to_ascii_lowercase();
            normalized.strip_prefix(&prefix).map(|rest| (*mode, rest))
        })?;

        EasingFamily::ALL
            .iter()
            .find(|family| family.name().eq_ignore_ascii_case(rest))
            .map(|family| Self::Curve(*family, mode))
    }

    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    ///
    /// Input is clamped. The output is exactly 0 at 0 and exactly 1 at 1;
    /// back and elastic curves may leave [0, 1] in between.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::Curve(family, EasingMode::In) => family.ease_in(t),
            Easing::Curve(family, EasingMode::Out) => 1.0 - family.ease_in(1.0 - t),
            Easing::Curve(family, EasingMode::InOut) => family.ease_in_out(t),
        }
    }

    /// Every supported easing, linear first.
    pub fn all() -> impl Iterator<Item = Easing> {
        std::iter::once(Easing::Linear).chain(EasingFamily::ALL.into_iter().flat_map(|family| {
            EasingMode::ALL
                .into_iter()
                .map(move |mode| Easing::Curve(family, mode))
        }))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::Curve(family, mode) => write!(f, "{}{}", mode.prefix(), family.name()),
        }
    }
}

//--- Helpers -------------------------------------------------------------

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

//=========================================================================
// Tests
//=========================================================================
