use core::fmt;
use core::str::FromStr;

use crate::AnimationError;

const DEFAULT_BACK_OVERSHOOT: f32 = 1.70158;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

/// A named easing curve mapping linear progress in `[0, 1]` to eased progress.
///
/// Curves parse from the usual names: `"none"`, `"power2.out"`, `"back.out(1.2)"`,
/// `"expo.out"`, `"sine.inOut"`. A bare family name (`"power2"`) eases out.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    SmoothStep,
    /// `PowerN`: polynomial of degree `N + 1`.
    Power(u8, EaseDirection),
    /// Overshooting curve with the given overshoot amount.
    Back(f32, EaseDirection),
    Expo(EaseDirection),
    Sine(EaseDirection),
}

/// `power1.out`.
impl Default for Easing {
    fn default() -> Self {
        Self::Power(1, EaseDirection::Out)
    }
}

impl Easing {
    pub const fn power_out(n: u8) -> Self {
        Self::Power(n, EaseDirection::Out)
    }

    pub const fn power2_out() -> Self {
        Self::Power(2, EaseDirection::Out)
    }

    pub const fn back_out(overshoot: f32) -> Self {
        Self::Back(overshoot, EaseDirection::Out)
    }

    pub const fn expo_out() -> Self {
        Self::Expo(EaseDirection::Out)
    }

    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::Power(n, dir) => {
                let exp = i32::from(n) + 1;
                directed(dir, t, |t| t.powi(exp))
            }
            Self::Back(s, dir) => directed(dir, t, |t| t * t * ((s + 1.0) * t - s)),
            Self::Expo(dir) => directed(dir, t, |t| {
                if t <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (t - 1.0))
                }
            }),
            Self::Sine(dir) => directed(dir, t, |t| {
                1.0 - (t * core::f32::consts::FRAC_PI_2).cos()
            }),
        }
    }
}

/// Derives the out/in-out variants of a curve from its ease-in form.
fn directed(dir: EaseDirection, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    match dir {
        EaseDirection::In => ease_in(t),
        EaseDirection::Out => 1.0 - ease_in(1.0 - t),
        EaseDirection::InOut => {
            if t < 0.5 {
                ease_in(2.0 * t) / 2.0
            } else {
                1.0 - ease_in(2.0 * (1.0 - t)) / 2.0
            }
        }
    }
}

impl FromStr for Easing {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || AnimationError::UnknownEase(s.to_owned());
        let trimmed = s.trim();

        let (head, param) = match trimmed.find('(') {
            Some(open) => {
                let unclosed = trimmed.strip_suffix(')').ok_or_else(unknown)?;
                let param: f32 = unclosed[open + 1..]
                    .trim()
                    .parse()
                    .map_err(|_| unknown())?;
                (&trimmed[..open], Some(param))
            }
            None => (trimmed, None),
        };

        let (family, dir) = match head.split_once('.') {
            Some((family, dir)) => {
                let dir = match dir {
                    "in" => EaseDirection::In,
                    "out" => EaseDirection::Out,
                    "inOut" => EaseDirection::InOut,
                    _ => return Err(unknown()),
                };
                (family, dir)
            }
            None => (head, EaseDirection::Out),
        };

        let ease = match family {
            "none" | "linear" | "power0" => Self::Linear,
            "smoothstep" => Self::SmoothStep,
            "power1" | "quad" => Self::Power(1, dir),
            "power2" | "cubic" => Self::Power(2, dir),
            "power3" | "quart" => Self::Power(3, dir),
            "power4" | "quint" => Self::Power(4, dir),
            "back" => Self::Back(param.unwrap_or(DEFAULT_BACK_OVERSHOOT), dir),
            "expo" => Self::Expo(dir),
            "sine" => Self::Sine(dir),
            _ => return Err(unknown()),
        };

        if param.is_some() && !matches!(ease, Self::Back(..)) {
            return Err(unknown());
        }
        Ok(ease)
    }
}

impl fmt::Display for EaseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inOut",
        })
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("none"),
            Self::SmoothStep => f.write_str("smoothstep"),
            Self::Power(n, dir) => write!(f, "power{n}.{dir}"),
            Self::Back(s, dir) => write!(f, "back.{dir}({s})"),
            Self::Expo(dir) => write!(f, "expo.{dir}"),
            Self::Sine(dir) => write!(f, "sine.{dir}"),
        }
    }
}
