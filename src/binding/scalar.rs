//! Scalar conversions from node text
//!
//! Numbers go through `FromStr`. Booleans accept `true/false`, `yes/no`,
//! `on/off` and `1/0` in any case. `char` needs exactly one character.

/// A type a field can hold when bound from text
///
/// Implement it for your own types (enums, newtypes) to bind them as scalars.
pub trait Scalar: Sized {
    /// Name used in conversion errors
    const TYPE_NAME: &'static str;

    fn parse_scalar(text: &str) -> Result<Self, String>;
}

macro_rules! from_str_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn parse_scalar(text: &str) -> Result<Self, String> {
                    text.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

from_str_scalar!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Scalar for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_scalar(text: &str) -> Result<Self, String> {
        match text.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err("expected true/false, yes/no, on/off or 1/0".to_string()),
        }
    }
}

impl Scalar for char {
    const TYPE_NAME: &'static str = "char";

    fn parse_scalar(text: &str) -> Result<Self, String> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            (None, _) => Err("empty text".to_string()),
            (Some(_), Some(_)) => Err("more than one character".to_string()),
        }
    }
}

impl Scalar for String {
    const TYPE_NAME: &'static str = "String";

    fn parse_scalar(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }
}
