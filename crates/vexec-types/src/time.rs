//! Time-of-day with UTC offset: normalization and the logical value.
//!
//! A `TIME WITH TIME ZONE` value is a local time of day plus the offset it was observed at.
//! Two values denote the same instant when their local times, shifted back to UTC and wrapped
//! into one day, coincide. [`normalize_picos`] computes that UTC-referenced time of day and
//! every equality, hash and ordering decision goes through it.

use crate::hash::{long_hash, xx_hash64};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const PICOSECONDS_PER_SECOND: i64 = 1_000_000_000_000;
pub const PICOSECONDS_PER_MINUTE: i64 = 60 * PICOSECONDS_PER_SECOND;
pub const PICOSECONDS_PER_HOUR: i64 = 60 * PICOSECONDS_PER_MINUTE;
pub const PICOSECONDS_PER_DAY: i64 = 24 * PICOSECONDS_PER_HOUR;

/// Largest precision that fits the compact single-word representation.
pub const MAX_SHORT_PRECISION: u32 = 9;
pub const MAX_PRECISION: u32 = 12;

pub const MIN_OFFSET_MINUTES: i32 = -14 * 60;
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Map a local time of day and its UTC offset to picoseconds since UTC midnight.
///
/// The result is always in `[0, PICOSECONDS_PER_DAY)`.
#[inline]
pub fn normalize_picos(picos: i64, offset_minutes: i32) -> i64 {
    picos
        .wrapping_sub((offset_minutes as i64).wrapping_mul(PICOSECONDS_PER_MINUTE))
        .rem_euclid(PICOSECONDS_PER_DAY)
}

/// A time of day with picosecond resolution and a UTC offset.
///
/// Equality, hashing and ordering are over the normalized instant, so `10:00+01:00` equals
/// `09:00+00:00`. Use the accessors to observe the raw fields.
#[derive(Clone, Copy, Debug)]
pub struct LongTimeWithTimeZone {
    picoseconds: i64,
    offset_minutes: i32,
}

impl LongTimeWithTimeZone {
    pub fn new(picoseconds: i64, offset_minutes: i32) -> Self {
        Self {
            picoseconds,
            offset_minutes,
        }
    }

    pub fn picoseconds(&self) -> i64 {
        self.picoseconds
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    pub fn normalized_picos(&self) -> i64 {
        normalize_picos(self.picoseconds, self.offset_minutes)
    }

    pub fn hash_code(&self) -> u64 {
        long_hash(self.normalized_picos())
    }

    pub fn xx_hash64(&self) -> u64 {
        xx_hash64(self.normalized_picos())
    }
}

impl PartialEq for LongTimeWithTimeZone {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_picos() == other.normalized_picos()
    }
}

impl Eq for LongTimeWithTimeZone {}

impl Hash for LongTimeWithTimeZone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_picos().hash(state);
    }
}

impl PartialOrd for LongTimeWithTimeZone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LongTimeWithTimeZone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized_picos().cmp(&other.normalized_picos())
    }
}

/// Presentation form of a time-with-time-zone value at a given precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SqlTimeWithTimeZone {
    precision: u32,
    picos: i64,
    offset_minutes: i32,
}

impl SqlTimeWithTimeZone {
    pub fn new(precision: u32, picos: i64, offset_minutes: i32) -> Self {
        Self {
            precision,
            picos,
            offset_minutes,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn picos(&self) -> i64 {
        self.picos
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }
}

impl fmt::Display for SqlTimeWithTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let picos = self.picos.rem_euclid(PICOSECONDS_PER_DAY);
        let hour = picos / PICOSECONDS_PER_HOUR;
        let minute = (picos / PICOSECONDS_PER_MINUTE) % 60;
        let second = (picos / PICOSECONDS_PER_SECOND) % 60;
        write!(f, "{hour:02}:{minute:02}:{second:02}")?;

        let precision = self.precision.min(MAX_PRECISION);
        if precision > 0 {
            let scale = 10i64.pow(MAX_PRECISION - precision);
            let fraction = (picos % PICOSECONDS_PER_SECOND) / scale;
            write!(f, ".{fraction:0width$}", width = precision as usize)?;
        }

        let sign = if self.offset_minutes < 0 { '-' } else { '+' };
        let offset = self.offset_minutes.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", offset / 60, offset % 60)
    }
}
