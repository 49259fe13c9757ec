//! Plausible-looking numbers for when no genuine count is available.

use std::ops::Range;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::options::Seed;

/// Starting values of a randomly seeded in-memory count.
pub const SEED_RANGE: Range<u64> = 150..450;

/// Values handed out when the backing store cannot be read or written.
pub const FALLBACK_RANGE: Range<u64> = 200..300;

const DAILY_BASE: u64 = 150;
const DAILY_SPAN: i32 = 200;

pub fn fallback_count() -> u64 {
    rand::thread_rng().gen_range(FALLBACK_RANGE)
}

/// Resolves a seed policy to a starting value.
pub fn initial_count(seed: Seed) -> u64 {
    match seed {
        Seed::Random => rand::thread_rng().gen_range(SEED_RANGE),
        Seed::Daily => daily_seed(days_since_epoch()),
        Seed::Fixed(n) => n,
    }
}

/// Seed for the given day, counted from 1970-01-01 (UTC).
pub fn daily_seed(days: i64) -> u64 {
    let (y, m, d) = civil_from_days(days);
    let hash = string_hash(&format!("{y:04}-{m:02}-{d:02}"));
    (hash % DAILY_SPAN).unsigned_abs() as u64 + DAILY_BASE
}

fn days_since_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs() / 86_400) as i64)
        .unwrap_or(0)
}

/// 32 位的 `h * 31 + c` 字符串哈希, 溢出时回绕.
fn string_hash(s: &str) -> i32 {
    s.chars().fold(0i32, |h, c| {
        (h << 5).wrapping_sub(h).wrapping_add(c as i32)
    })
}

// Gregorian date from a day count, Howard Hinnant's `civil_from_days`.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}
