//! Game-clock parsing.
//!
//! The upstream encodes the clock as an ISO-8601-ish duration string like
//! "PT11M23.00S". Normalized form is fixed-width "MM:SS"; unparsable values
//! become None (logged by the caller), never an error.

/// Parse a duration-coded clock value into "MM:SS".
pub fn parse_clock(raw: &str) -> Option<String> {
    let rest = raw.strip_prefix("PT")?;
    let (minutes, rest) = rest.split_once('M')?;
    let seconds = rest.strip_suffix('S')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    if !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some(format!("{:02}:{:02}", minutes, seconds as u32))
}

/// Re-encode a normalized "MM:SS" clock in the upstream's duration form.
pub fn clock_to_duration(clock: &str) -> Option<String> {
    let (minutes, seconds) = clock.split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    Some(format!("PT{:02}M{:02}.00S", minutes, seconds))
}

/// Human-readable elapsed form of a normalized clock, e.g.
/// "7 minutes 12 seconds". Used for the interval column in the store.
pub fn elapsed_interval(clock: &str) -> Option<String> {
    let (minutes, seconds) = clock.split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    Some(format!("{} minutes {} seconds", minutes, seconds))
}
