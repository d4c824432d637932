//! Human cooldown strings (`"1h"`, `"30m"`, `"2h30m"`, `"45"`).

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Cooldown used when the configured value yields zero.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3600);

static UNIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*([hms])").expect("static regex is valid"));

/// Parses a cooldown string into a duration.
///
/// A bare integer is seconds. Otherwise every `<number><unit>` pair found
/// anywhere in the string is summed, with units `h`, `m` and `s`. A result
/// of zero (including empty or unparsable input) becomes one hour.
///
/// ```
/// use vpn_watch::gate::parse_cooldown;
///
/// assert_eq!(parse_cooldown("2h30m").as_secs(), 9000);
/// assert_eq!(parse_cooldown("45").as_secs(), 45);
/// assert_eq!(parse_cooldown("soon").as_secs(), 3600);
/// ```
#[must_use]
pub fn parse_cooldown(text: &str) -> Duration {
    let text = text.trim().to_ascii_lowercase();

    let total = text.parse::<u64>().unwrap_or_else(|_| {
        UNIT_PATTERN
            .captures_iter(&text)
            .filter_map(|caps| {
                let amount = caps[1].parse::<u64>().ok()?;
                let scale = match &caps[2] {
                    "h" => 3600,
                    "m" => 60,
                    _ => 1,
                };
                amount.checked_mul(scale)
            })
            .fold(0_u64, u64::saturating_add)
    });

    if total == 0 {
        DEFAULT_COOLDOWN
    } else {
        Duration::from_secs(total)
    }
}
