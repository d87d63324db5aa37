use std::any::type_name;

use crate::error::CellError;
use crate::kind::{Coercion, FloatType, IntType};
use crate::shape::{Bind, Binding, Leaf};

/// Parses a field value out of the raw text of one cell.
///
/// Implement this (together with [`ToCell`]) on a type and derive
/// [`Cell`](crate::Cell) to bind it as a single column instead of flattening it.
pub trait FromCell: Sized {
    fn from_cell(raw: &str) -> Result<Self, CellError>;
}

/// Formats a field value into the raw text of one cell.
pub trait ToCell {
    fn to_cell(&self) -> Result<String, CellError>;
}

/// Parses the integer part of a cell, returning its sign and magnitude.
///
/// Surrounding whitespace is ignored, an empty cell is zero, anything after
/// the first `.` is discarded and `0x`/`0o`/`0b` prefixes select the radix.
fn parse_integer(raw: &str) -> Result<(bool, u128), CellError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok((false, 0));
    }

    let whole = trimmed.split('.').next().unwrap_or_default();
    let (negative, unsigned) = match whole.as_bytes().first() {
        Some(b'-') => (true, &whole[1..]),
        Some(b'+') => (false, &whole[1..]),
        _ => (false, whole),
    };

    let (radix, digits) = match unsigned.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };
    if digits.starts_with(['+', '-']) {
        return Err(CellError::MisplacedSign {
            value: trimmed.to_string(),
        });
    }

    let magnitude = u128::from_str_radix(digits, radix).map_err(|source| CellError::Integer {
        value: trimmed.to_string(),
        source,
    })?;
    Ok((negative, magnitude))
}

fn integer_in<T: TryFrom<i128>>(raw: &str, target: IntType) -> Result<T, CellError> {
    let (negative, magnitude) = parse_integer(raw)?;
    i128::try_from(magnitude)
        .ok()
        .map(|m| if negative { -m } else { m })
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| CellError::OutOfRange {
            value: raw.trim().to_string(),
            target: Coercion::Int(target),
        })
}

fn parse_float(raw: &str) -> Result<f64, CellError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse::<f64>().map_err(|source| CellError::Float {
        value: trimmed.to_string(),
        source,
    })
}

fn primitive_leaf<P: 'static, T>(
    coercion: Coercion,
    get: fn(&P) -> &T,
    get_mut: fn(&mut P) -> &mut T,
) -> Binding<P>
where
    T: FromCell + ToCell + 'static,
{
    Binding::Leaf(
        Leaf::new(coercion, type_name::<T>())
            .parse_with(get_mut)
            .format_with(get),
    )
}

macro_rules! impl_cell_int {
    ($t:ty, $variant:ident) => {
        impl FromCell for $t {
            fn from_cell(raw: &str) -> Result<Self, CellError> {
                integer_in(raw, IntType::$variant)
            }
        }

        impl ToCell for $t {
            fn to_cell(&self) -> Result<String, CellError> {
                Ok(self.to_string())
            }
        }

        impl Bind for $t {
            fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
                primitive_leaf(Coercion::Int(IntType::$variant), get, get_mut)
            }
        }
    };
}

impl_cell_int!(u8, U8);
impl_cell_int!(u16, U16);
impl_cell_int!(u32, U32);
impl_cell_int!(u64, U64);
impl_cell_int!(usize, Usize);
impl_cell_int!(i8, I8);
impl_cell_int!(i16, I16);
impl_cell_int!(i32, I32);
impl_cell_int!(i64, I64);
impl_cell_int!(isize, Isize);

impl FromCell for f64 {
    fn from_cell(raw: &str) -> Result<Self, CellError> {
        parse_float(raw)
    }
}

impl FromCell for f32 {
    fn from_cell(raw: &str) -> Result<Self, CellError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(0.0);
        }
        let narrow = trimmed.parse::<f32>().map_err(|source| CellError::Float {
            value: trimmed.to_string(),
            source,
        })?;
        if narrow.is_infinite() && parse_float(trimmed).is_ok_and(f64::is_finite) {
            return Err(CellError::OutOfRange {
                value: trimmed.to_string(),
                target: Coercion::Float(FloatType::F32),
            });
        }
        Ok(narrow)
    }
}

macro_rules! impl_cell_float {
    ($t:ty, $variant:ident) => {
        impl ToCell for $t {
            fn to_cell(&self) -> Result<String, CellError> {
                Ok(self.to_string())
            }
        }

        impl Bind for $t {
            fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
                primitive_leaf(Coercion::Float(FloatType::$variant), get, get_mut)
            }
        }
    };
}

impl_cell_float!(f32, F32);
impl_cell_float!(f64, F64);

impl FromCell for bool {
    fn from_cell(raw: &str) -> Result<Self, CellError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(CellError::Boolean {
                value: raw.to_string(),
            }),
        }
    }
}

impl ToCell for bool {
    fn to_cell(&self) -> Result<String, CellError> {
        Ok(self.to_string())
    }
}

impl Bind for bool {
    fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
        primitive_leaf(Coercion::Bool, get, get_mut)
    }
}

impl FromCell for String {
    fn from_cell(raw: &str) -> Result<Self, CellError> {
        Ok(raw.to_string())
    }
}

impl ToCell for String {
    fn to_cell(&self) -> Result<String, CellError> {
        Ok(self.clone())
    }
}

impl Bind for String {
    fn bind<P: 'static>(get: fn(&P) -> &Self, get_mut: fn(&mut P) -> &mut Self) -> Binding<P> {
        primitive_leaf(Coercion::String, get, get_mut)
    }
}
