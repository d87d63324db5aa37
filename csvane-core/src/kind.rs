use std::fmt;

/// Integer widths a column can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    U8,
    U16,
    U32,
    U64,
    Usize,
    I8,
    I16,
    I32,
    I64,
    Isize,
}

impl IntType {
    /// Returns all variant names in order.
    pub fn variant_names() -> &'static [&'static str] {
        &["u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize"]
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntType::I8 | IntType::I16 | IntType::I32 | IntType::I64 | IntType::Isize
        )
    }

    fn name(self) -> &'static str {
        let index = match self {
            IntType::U8 => 0,
            IntType::U16 => 1,
            IntType::U32 => 2,
            IntType::U64 => 3,
            IntType::Usize => 4,
            IntType::I8 => 5,
            IntType::I16 => 6,
            IntType::I32 => 7,
            IntType::I64 => 8,
            IntType::Isize => 9,
        };
        Self::variant_names()[index]
    }
}

/// Floating-point widths a column can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatType {
    F32,
    F64,
}

impl FloatType {
    /// Returns all variant names in order.
    pub fn variant_names() -> &'static [&'static str] {
        &["f32", "f64"]
    }
}

/// How a bound column converts between cell text and its field.
///
/// Every primitive kind is converted by the built-in rules; `Custom` columns
/// delegate to the field type's own `FromCell`/`ToCell` implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    Int(IntType),
    Float(FloatType),
    Bool,
    String,
    Custom,
}

impl Coercion {
    pub fn is_custom(self) -> bool {
        matches!(self, Coercion::Custom)
    }
}

impl fmt::Display for IntType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FloatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatType::F32 => f.write_str(Self::variant_names()[0]),
            FloatType::F64 => f.write_str(Self::variant_names()[1]),
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Int(int) => int.fmt(f),
            Coercion::Float(float) => float.fmt(f),
            Coercion::Bool => f.write_str("bool"),
            Coercion::String => f.write_str("string"),
            Coercion::Custom => f.write_str("custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_rust_names() {
        assert_eq!(Coercion::Int(IntType::Usize).to_string(), "usize");
        assert_eq!(Coercion::Int(IntType::I16).to_string(), "i16");
        assert_eq!(Coercion::Float(FloatType::F32).to_string(), "f32");
        assert_eq!(Coercion::Custom.to_string(), "custom");
    }

    #[test]
    fn signedness() {
        assert!(IntType::I8.is_signed());
        assert!(!IntType::U64.is_signed());
    }
}
