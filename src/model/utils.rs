/// Turns a team name into the file stem its stats are stored under.
///
/// Lowercases, replaces every whitespace run with a single `-`, then drops
/// anything outside `[a-z0-9-]`. Distinct names can map to the same stem.
#[must_use]
pub fn normalize_team_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }

    out
}

/// Collapses the whitespace runs `scraper` leaves between text nodes.
#[must_use]
pub fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
