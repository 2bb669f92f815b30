//! Typed log arguments encoded straight into a byte buffer

use std::io::Write;

/// One argument of a log call.
///
/// Arguments are concatenated without separators, each in its minimal
/// text form. Encoding writes directly into the destination buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(&'a str),
    Bytes(&'a [u8]),
}

impl Arg<'_> {
    /// Append this argument's text form to `buf`
    pub fn encode(&self, buf: &mut Vec<u8>) {
        // Writes into a Vec<u8> cannot fail.
        match *self {
            Arg::Int(v) => {
                let _ = write!(buf, "{}", v);
            }
            Arg::Uint(v) => {
                let _ = write!(buf, "{}", v);
            }
            Arg::Float(v) => encode_float(v, buf),
            Arg::Bool(v) => buf.extend_from_slice(if v { b"true" } else { b"false" }),
            Arg::Char(c) => buf.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
            Arg::Str(s) => buf.extend_from_slice(s.as_bytes()),
            Arg::Bytes(b) => buf.extend_from_slice(b),
        }
    }
}

fn encode_float(v: f64, buf: &mut Vec<u8>) {
    if v.is_nan() {
        buf.extend_from_slice(b"NaN");
    } else if v.is_infinite() {
        buf.extend_from_slice(if v > 0.0 { b"+Inf" } else { b"-Inf" });
    } else {
        // Display for f64 is the shortest round-trip form, never exponential.
        let _ = write!(buf, "{}", v);
    }
}

/// Append every argument to `buf` in order
pub fn encode_args(buf: &mut Vec<u8>, args: &[Arg<'_>]) {
    for arg in args {
        arg.encode(buf);
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            #[inline]
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            #[inline]
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg<'_> {
    #[inline]
    fn from(v: f32) -> Self {
        Arg::Float(f64::from(v))
    }
}

impl From<f64> for Arg<'_> {
    #[inline]
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl From<bool> for Arg<'_> {
    #[inline]
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<char> for Arg<'_> {
    #[inline]
    fn from(v: char) -> Self {
        Arg::Char(v)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    #[inline]
    fn from(v: &'a str) -> Self {
        Arg::Str(v)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    #[inline]
    fn from(v: &'a String) -> Self {
        Arg::Str(v.as_str())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    #[inline]
    fn from(v: &'a [u8]) -> Self {
        Arg::Bytes(v)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    #[inline]
    fn from(v: &'a [u8; N]) -> Self {
        Arg::Bytes(v)
    }
}

impl<'a> From<&'a Vec<u8>> for Arg<'a> {
    #[inline]
    fn from(v: &'a Vec<u8>) -> Self {
        Arg::Bytes(v.as_slice())
    }
}
