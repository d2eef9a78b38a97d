//! Canonical text form of a region.
//!
//! ```text
//! SkRegion((l,t,r,b)(l,t,r,b)...)
//! ```
//!
//! One tuple per decomposed rectangle, in iteration order. An empty region
//! prints as `SkRegion()`. Parsing accepts whitespace between tokens and
//! rebuilds the region as the union of the parsed rectangles, so
//! `s.parse::<Region>()` of a printed region yields an equal region.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::basics::{Rect, SENTINEL};
use crate::region::Region;

const PREFIX: &str = "SkRegion";

/// Why a string is not a region in canonical text form. Offsets are byte
/// offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionParseError {
    #[error("expected `SkRegion(` at the start of the input")]
    MissingPrefix,
    #[error("expected {expected} at offset {offset}")]
    Expected { expected: &'static str, offset: usize },
    #[error("invalid number `{value}` at offset {offset}")]
    InvalidNumber { value: String, offset: usize },
    #[error("rectangle tuple at offset {offset} has {found} values, expected 4")]
    WrongArity { found: usize, offset: usize },
    #[error("coordinate {value} at offset {offset} is outside the representable range")]
    CoordinateOutOfRange { value: i64, offset: usize },
    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        f.write_str("(")?;
        for r in self.iter() {
            write!(f, "({},{},{},{})", r.left, r.top, r.right, r.bottom)?;
        }
        f.write_str(")")
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rects = Parser::new(s).parse().map_err(|err| {
            tracing::debug!(%err, "rejected region text");
            err
        })?;
        Ok(Region::from_rects(&rects))
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse(mut self) -> Result<Vec<Rect>, RegionParseError> {
        self.skip_ws();
        if !self.src[self.pos..].starts_with(PREFIX) {
            return Err(RegionParseError::MissingPrefix);
        }
        self.pos += PREFIX.len();
        self.skip_ws();
        if !self.eat(b'(') {
            return Err(RegionParseError::MissingPrefix);
        }

        let mut rects = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'(') => rects.push(self.tuple()?),
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    return Err(RegionParseError::Expected {
                        expected: "`(` or `)`",
                        offset: self.pos,
                    })
                }
            }
        }

        self.skip_ws();
        if self.pos != self.src.len() {
            return Err(RegionParseError::TrailingInput { offset: self.pos });
        }
        Ok(rects)
    }

    /// `(l,t,r,b)`, with the cursor on the opening parenthesis.
    fn tuple(&mut self) -> Result<Rect, RegionParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut values = [0i32; 4];
        let mut found = 0;
        loop {
            self.skip_ws();
            let v = self.number()?;
            if found < values.len() {
                values[found] = v;
            }
            found += 1;
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b')') {
                break;
            }
            return Err(RegionParseError::Expected {
                expected: "`,` or `)`",
                offset: self.pos,
            });
        }
        if found != 4 {
            return Err(RegionParseError::WrongArity {
                found,
                offset: start,
            });
        }
        Ok(Rect::new(values[0], values[1], values[2], values[3]))
    }

    /// An optionally signed decimal integer that fits a run coordinate.
    fn number(&mut self) -> Result<i32, RegionParseError> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut end = start;
        if matches!(bytes.get(end), Some(b'-') | Some(b'+')) {
            end += 1;
        }
        while bytes.get(end).map_or(false, u8::is_ascii_digit) {
            end += 1;
        }
        // Swallow any junk glued to the number so the error shows all of it.
        while bytes
            .get(end)
            .map_or(false, |&b| !b.is_ascii_whitespace() && !matches!(b, b',' | b')' | b'('))
        {
            end += 1;
        }
        if end == start {
            return Err(RegionParseError::Expected {
                expected: "a number",
                offset: start,
            });
        }

        let text = &self.src[start..end];
        let value: i64 = text.parse().map_err(|_| {
            // Digits that overflow i64 are still a number, just too large.
            let digits = text.trim_start_matches(['-', '+']);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                RegionParseError::CoordinateOutOfRange {
                    value: if text.starts_with('-') { i64::MIN } else { i64::MAX },
                    offset: start,
                }
            } else {
                RegionParseError::InvalidNumber {
                    value: text.to_string(),
                    offset: start,
                }
            }
        })?;
        if value < i64::from(i32::MIN) || value >= i64::from(SENTINEL) {
            return Err(RegionParseError::CoordinateOutOfRange {
                value,
                offset: start,
            });
        }
        self.pos = end;
        Ok(value as i32)
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().map_or(false, |b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanline_boolean_algebra::RegionOp;

    fn r(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect::new(l, t, r, b)
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(Region::new().to_string(), "SkRegion()");
    }

    #[test]
    fn test_display_rect() {
        let rgn = Region::from_rect(r(1, 2, 3, 4));
        assert_eq!(rgn.to_string(), "SkRegion((1,2,3,4))");
    }

    #[test]
    fn test_display_complex() {
        let mut rgn = Region::from_rect(r(0, 0, 10, 10));
        rgn.op_rect(r(2, 2, 8, 8), RegionOp::Difference);
        assert_eq!(
            rgn.to_string(),
            "SkRegion((0,0,10,2)(0,2,2,8)(8,2,10,8)(0,8,10,10))"
        );
    }

    #[test]
    fn test_display_negative() {
        let rgn = Region::from_rect(r(-5, -6, -1, 0));
        assert_eq!(rgn.to_string(), "SkRegion((-5,-6,-1,0))");
    }

    #[test]
    fn test_round_trip() {
        let mut rgn = Region::from_rects(&[r(0, 0, 10, 10), r(5, 5, 15, 15), r(40, -3, 50, 2)]);
        rgn.op_rect(r(6, 6, 7, 7), RegionOp::Xor);
        let text = rgn.to_string();
        let back: Region = text.parse().unwrap();
        assert_eq!(back, rgn);
        assert_eq!(back.to_string(), text);
    }

    #[test]
    fn test_parse_empty_and_whitespace() {
        let rgn: Region = "SkRegion()".parse().unwrap();
        assert!(rgn.is_empty());
        let rgn: Region = "  SkRegion ( ( 1 , 2 , 3 , 4 ) ( 3, 2, 5, 4 ) )\n".parse().unwrap();
        assert!(rgn.is_rect());
        assert_eq!(rgn.bounds(), r(1, 2, 5, 4));
    }

    #[test]
    fn test_parse_skips_empty_tuples() {
        let rgn: Region = "SkRegion((5,5,5,9)(0,0,1,1))".parse().unwrap();
        assert_eq!(rgn, Region::from_rect(r(0, 0, 1, 1)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("Region()".parse::<Region>(), Err(RegionParseError::MissingPrefix));
        assert_eq!("SkRegion".parse::<Region>(), Err(RegionParseError::MissingPrefix));
        assert_eq!(
            "SkRegion((1,2,3,4)".parse::<Region>(),
            Err(RegionParseError::Expected {
                expected: "`(` or `)`",
                offset: 18
            })
        );
        assert_eq!(
            "SkRegion((1,2,3))".parse::<Region>(),
            Err(RegionParseError::WrongArity { found: 3, offset: 9 })
        );
        assert_eq!(
            "SkRegion((1,2,3,4,5))".parse::<Region>(),
            Err(RegionParseError::WrongArity { found: 5, offset: 9 })
        );
        assert_eq!(
            "SkRegion((1,x,3,4))".parse::<Region>(),
            Err(RegionParseError::InvalidNumber {
                value: "x".to_string(),
                offset: 12
            })
        );
        assert_eq!(
            "SkRegion((1,,3,4))".parse::<Region>(),
            Err(RegionParseError::Expected {
                expected: "a number",
                offset: 12
            })
        );
        assert_eq!(
            "SkRegion()junk".parse::<Region>(),
            Err(RegionParseError::TrailingInput { offset: 10 })
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let sentinel = format!("SkRegion((0,0,{},1))", SENTINEL);
        assert_eq!(
            sentinel.parse::<Region>(),
            Err(RegionParseError::CoordinateOutOfRange {
                value: i64::from(SENTINEL),
                offset: 14
            })
        );
        assert!(matches!(
            "SkRegion((-2147483649,0,1,1))".parse::<Region>(),
            Err(RegionParseError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            "SkRegion((0,0,99999999999999999999999,1))".parse::<Region>(),
            Err(RegionParseError::CoordinateOutOfRange { value: i64::MAX, .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = "SkRegion((1,2,3))".parse::<Region>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "rectangle tuple at offset 9 has 3 values, expected 4"
        );
    }
}
