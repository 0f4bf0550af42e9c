//! Small math aggregates stored by console variables

/// RGBA color, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a color from all four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channels as an array, in r g b a order
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from channels in r g b a order
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl Default for Color {
    /// Opaque black
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

macro_rules! float_aggregate {
    ($(#[$meta:meta])* $name:ident, $n:literal, [$($field:ident),+]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        pub struct $name {
            $(pub $field: f32,)+
        }

        impl $name {
            /// Number of components
            pub const COMPONENTS: usize = $n;

            /// Create from components
            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            /// Components as an array, in declaration order
            pub const fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            /// Build from components in declaration order
            pub const fn from_array(c: [f32; $n]) -> Self {
                let [$($field),+] = c;
                Self { $($field),+ }
            }
        }
    };
}

float_aggregate!(
    /// 2D vector
    Vector2, 2, [x, y]
);
float_aggregate!(
    /// 3D vector
    Vector3, 3, [x, y, z]
);
float_aggregate!(
    /// 4D vector
    Vector4, 4, [x, y, z, w]
);
float_aggregate!(
    /// Euler angles in degrees
    QAngle, 3, [pitch, yaw, roll]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_default_is_opaque_black() {
        assert_eq!(Color::default(), Color::new(0, 0, 0, 255));
        assert_eq!(Color::rgb(1, 2, 3).to_array(), [1, 2, 3, 255]);
    }

    #[test]
    fn test_vector_array_conversion() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(Vector3::from_array(v.to_array()), v);
        assert_eq!(QAngle::from_array([10.0, 20.0, 0.0]).yaw, 20.0);
        assert_eq!(Vector4::COMPONENTS, 4);
    }
}
