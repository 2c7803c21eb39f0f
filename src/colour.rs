//! Colouring algorithm.
//!
//! Escaped points are coloured by hue bands ten degrees apart per
//! iteration, rotated by the hue offset. Bounded points are black. The
//! fragment program in `fractal.wgsl` reproduces this with a closed-form
//! HSL conversion.

/// Degrees of hue advanced per completed iteration.
pub const HUE_STEP_DEGREES: f64 = 10.0;

pub const SATURATION: f64 = 1.0;
pub const LIGHTNESS: f64 = 0.5;

/// An opaque 8-bit-per-channel colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Colour {
    pub const BLACK: Self = Colour {
        red: 0,
        green: 0,
        blue: 0,
    };

    pub fn rgba(self) -> [u8; 4] {
        [self.red, self.green, self.blue, u8::MAX]
    }
}

/// Hue in degrees, `[0, 360)`, for an escaped point.
pub fn hue_degrees(iteration_count: u32, hue_offset: f64) -> f64 {
    (hue_offset + iteration_count as f64 * HUE_STEP_DEGREES).rem_euclid(360.0)
}

pub fn colour_for(iteration_count: u32, max_iterations: u32, hue_offset: f64) -> Colour {
    if iteration_count == max_iterations {
        return Colour::BLACK;
    }
    hsl_to_rgb(
        hue_degrees(iteration_count, hue_offset) / 360.0,
        SATURATION,
        LIGHTNESS,
    )
}

/// Conventional HSL to RGB, all inputs on `[0, 1]`.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Colour {
    let (red, green, blue) = if saturation == 0.0 {
        (lightness, lightness, lightness)
    } else {
        let q = if lightness < 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let p = 2.0 * lightness - q;
        (
            hue_to_channel(p, q, hue + 1.0 / 3.0),
            hue_to_channel(p, q, hue),
            hue_to_channel(p, q, hue - 1.0 / 3.0),
        )
    };

    Colour {
        red: to_byte(red),
        green: to_byte(green),
        blue: to_byte(blue),
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_points_are_black_for_any_hue() {
        for hue in [0.0, 45.5, 180.0, 359.9, -90.0, 1e4] {
            for max_iterations in [1, 5, 100, 4096] {
                assert_eq!(colour_for(max_iterations, max_iterations, hue), Colour::BLACK);
            }
        }
    }

    #[test]
    fn escaped_points_are_never_black() {
        for hue in [0.0, 17.0, 200.0, 359.0, -30.0] {
            for iteration in 0..200 {
                assert_ne!(colour_for(iteration, 200, hue), Colour::BLACK);
            }
        }
    }

    #[test]
    fn primary_hues() {
        let red = Colour { red: 255, green: 0, blue: 0 };
        let green = Colour { red: 0, green: 255, blue: 0 };
        let blue = Colour { red: 0, green: 0, blue: 255 };
        assert_eq!(colour_for(0, 10, 0.0), red);
        assert_eq!(colour_for(0, 10, 120.0), green);
        assert_eq!(colour_for(0, 10, 240.0), blue);
        // 12 bands of ten degrees reach green from red.
        assert_eq!(colour_for(12, 100, 0.0), green);
        assert_eq!(colour_for(36, 100, 0.0), red);
    }

    #[test]
    fn secondary_hues() {
        assert_eq!(
            colour_for(6, 100, 0.0),
            Colour { red: 255, green: 255, blue: 0 }
        );
        assert_eq!(
            colour_for(0, 100, 180.0),
            Colour { red: 0, green: 255, blue: 255 }
        );
        assert_eq!(
            colour_for(3, 100, 270.0),
            Colour { red: 255, green: 0, blue: 255 }
        );
    }

    #[test]
    fn hue_wraps_into_one_turn() {
        assert_eq!(hue_degrees(36, 0.0), 0.0);
        assert_eq!(hue_degrees(1, 355.0), 5.0);
        assert_eq!(hue_degrees(0, -90.0), 270.0);
        assert_eq!(colour_for(0, 10, -120.0), colour_for(0, 10, 240.0));
    }

    #[test]
    fn achromatic_when_unsaturated() {
        assert_eq!(
            hsl_to_rgb(0.3, 0.0, 0.5),
            Colour { red: 128, green: 128, blue: 128 }
        );
    }

    #[test]
    fn rgba_is_opaque() {
        assert_eq!(Colour::BLACK.rgba(), [0, 0, 0, 255]);
    }
}
