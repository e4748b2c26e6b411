//! Line classifier — turns one raw `Game.log` line into at most one
//! [`Classified`] event.
//!
//! Classification is a pure function: no state, no I/O. Matchers are tried
//! in a fixed priority order; the first match wins. Trigger phrases are
//! mutually exclusive in real logs, so the ordering is a documented
//! tie-break rather than a correctness hazard.
//!
//! | Priority | Kind                | Trigger phrase                        |
//! |----------|---------------------|---------------------------------------|
//! | 1        | Kill                | `killed by`                           |
//! | 2        | SpawnLoss           | `lost reservation for spawnpoint`     |
//! | 3        | CorpseState         | `IsCorpseEnabled:`                    |
//! | 4        | ZoneMove            | `moving zone hosted child id`         |
//! | 5        | StatusEffect        | `of a status effect!`                 |
//! | 6        | Hit                 | `Fake hit FROM`                       |
//! | 7        | VehicleDestruction  | `advanced from destroy level`         |
//!
//! A leading `<...>` or `[...]` prefix is treated as the line's timestamp;
//! only RFC 3339 values parse. Anything else still classifies, with
//! `ts = None` — such events are ordered by sequence number alone.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::EventKind;

/// A classified line: an event minus its store-assigned sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub kind: EventKind,
    pub ts: Option<DateTime<Utc>>,
    pub summary: String,
    pub details: Vec<String>,
    pub actors: Vec<String>,
    pub raw: String,
}

/// Classify one line, already stripped of its terminating newline.
///
/// Returns `None` for empty and unrecognized lines — those are silently
/// excluded from the timeline, never errors. `actor_hint` (typically the
/// most recently seen actor) is used only when a matched line yields no
/// usable handle of its own.
pub fn classify(line: &str, actor_hint: Option<&str>) -> Option<Classified> {
    let line = line.trim_end();
    if line.trim().is_empty() {
        return None;
    }
    let (ts, body) = split_timestamp_prefix(line);

    let mut classified = match_kill(ts, body, line)
        .or_else(|| match_spawn_loss(ts, body, line))
        .or_else(|| match_corpse_state(ts, body, line))
        .or_else(|| match_zone_move(ts, body, line))
        .or_else(|| match_status_effect(ts, body, line))
        .or_else(|| match_hit(ts, body, line))
        .or_else(|| match_vehicle_destruction(ts, body, line))?;

    if classified.actors.is_empty() {
        if let Some(hint) = actor_hint.map(str::trim).filter(|h| !h.is_empty()) {
            classified.actors.push(hint.to_string());
        }
    }
    Some(classified)
}

/// Split a leading `<...>` or `[...]` timestamp prefix off the line and
/// parse it as RFC 3339. The remainder is what the matchers see.
fn split_timestamp_prefix(line: &str) -> (Option<DateTime<Utc>>, &str) {
    let trimmed = line.trim_start();
    let split = if let Some(rest) = trimmed.strip_prefix('<') {
        rest.split_once('>')
    } else if let Some(rest) = trimmed.strip_prefix('[') {
        rest.split_once(']')
    } else {
        None
    };
    match split {
        Some((stamp, body)) => (parse_timestamp(stamp), body),
        None => (None, trimmed),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Deduplicate handles case-insensitively, dropping empties and the game's
/// literal `unknown` placeholder.
fn collect_actors<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut actors = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
            continue;
        }
        let key = trimmed.to_ascii_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            actors.push(trimmed.to_string());
        }
    }
    actors
}

fn capture<'t>(caps: &regex::Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

// ---------------------------------------------------------------------------
// Kill
// ---------------------------------------------------------------------------

/// Covers both the `<Actor Death> CActor::Kill:` form and the generic
/// `'V' has been killed by 'K' using weapon 'W'` form.
fn match_kill(ts: Option<DateTime<Utc>>, body: &str, raw: &str) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"["'](?P<victim>[^"']+)["'](?:\s*\[(?P<victim_id>[^\]]+)\])?(?:\s+in zone ["'](?P<zone>[^"']+)["'])?\s+(?:has been\s+)?killed by\s+["'](?P<killer>[^"']+)["'](?:\s*\[(?P<killer_id>[^\]]+)\])?(?:\s+using(?:\s+weapon)?\s+["'](?P<weapon>[^"']*)["'](?:\s*\[(?P<weapon_class>[^\]]+)\])?)?(?:\s+with damage type ["'](?P<damage>[^"']+)["'])?"#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let victim = caps.name("victim")?.as_str().trim();
    let killer = caps.name("killer")?.as_str().trim();
    let weapon = capture(&caps, "weapon");
    let weapon_class = capture(&caps, "weapon_class");
    let zone = capture(&caps, "zone");
    let damage = capture(&caps, "damage");

    let weapon_display = if weapon.is_empty() || weapon.eq_ignore_ascii_case("unknown") {
        "unknown weapon".to_string()
    } else if weapon_class.is_empty() {
        weapon.to_string()
    } else {
        format!("{weapon} ({weapon_class})")
    };

    let mut details = Vec::new();
    let victim_id = capture(&caps, "victim_id");
    if !victim_id.is_empty() {
        details.push(format!("Victim: {victim} [{victim_id}]"));
    }
    let killer_id = capture(&caps, "killer_id");
    if !killer_id.is_empty() {
        details.push(format!("Killer: {killer} [{killer_id}]"));
    }
    if !zone.is_empty() {
        details.push(format!("Zone: {zone}"));
    }
    if !damage.is_empty() {
        details.push(format!("Damage type: {damage}"));
    }

    Some(Classified {
        kind: EventKind::Kill,
        ts,
        summary: format!("{killer} killed {victim} with {weapon_display}"),
        details,
        actors: collect_actors([killer, victim]),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// SpawnLoss
// ---------------------------------------------------------------------------

fn match_spawn_loss(ts: Option<DateTime<Utc>>, body: &str, raw: &str) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"Player ["'](?P<player>[^"']+)["']\s*\[(?P<player_id>[^\]]+)\] lost reservation for spawnpoint (?P<spawnpoint>[^\[]+?)\s*\[(?P<spawn_id>[^\]]+)\](?: at location (?P<location>-?\d+))?"#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let player = caps.name("player")?.as_str().trim();
    let spawnpoint = capture(&caps, "spawnpoint").trim();

    let mut details = vec![format!(
        "Player: {player} [{}]",
        capture(&caps, "player_id")
    )];
    details.push(format!("Spawn ID: {}", capture(&caps, "spawn_id")));
    let location = capture(&caps, "location");
    if !location.is_empty() {
        details.push(format!("Location: {location}"));
    }

    Some(Classified {
        kind: EventKind::SpawnLoss,
        ts,
        summary: format!("{player} lost spawn reservation at {spawnpoint}"),
        details,
        actors: collect_actors([player]),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CorpseState
// ---------------------------------------------------------------------------

fn match_corpse_state(ts: Option<DateTime<Utc>>, body: &str, raw: &str) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"Player ["'](?P<player>[^"'<>]+)["']\s*(?:<(?P<context>[^>]+)>)?:\s*IsCorpseEnabled:\s*(?P<enabled>Yes|No)"#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let player = caps.name("player")?.as_str().trim();
    let enabled = capture(&caps, "enabled").eq_ignore_ascii_case("Yes");

    let mut details = Vec::new();
    let context = capture(&caps, "context").trim();
    if !context.is_empty() {
        details.push(format!("Context: {context}"));
    }

    Some(Classified {
        kind: EventKind::CorpseState,
        ts,
        summary: format!(
            "{player} corpse {}",
            if enabled { "enabled" } else { "disabled" }
        ),
        details,
        actors: collect_actors([player]),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// ZoneMove
// ---------------------------------------------------------------------------

fn match_zone_move(ts: Option<DateTime<Utc>>, body: &str, raw: &str) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"moving zone hosted child id = (?P<child_id>\d+)\s+name\s*=\s*"(?P<player>[^"]+)"\s+to unblock removal of parent id = (?P<parent_id>\d+)\s+name\s*=\s*"(?P<parent>[^"]*)"\s+into zone host id = (?P<host_id>\d+)\s+name\s*=\s*"(?P<host>[^"]*)""#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let player = caps.name("player")?.as_str().trim();
    if player.is_empty() {
        return None;
    }
    let host = capture(&caps, "host").trim();

    let mut details = vec![format!("Child ID: {}", capture(&caps, "child_id"))];
    let parent = capture(&caps, "parent").trim();
    if !parent.is_empty() {
        details.push(format!(
            "Parent: {parent} [{}]",
            capture(&caps, "parent_id")
        ));
    }
    if !host.is_empty() {
        details.push(format!("Zone host ID: {}", capture(&caps, "host_id")));
    }

    Some(Classified {
        kind: EventKind::ZoneMove,
        ts,
        summary: format!(
            "{player} moved to {}",
            if host.is_empty() { "unknown zone" } else { host }
        ),
        details,
        actors: collect_actors([player]),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// StatusEffect
// ---------------------------------------------------------------------------

fn match_status_effect(ts: Option<DateTime<Utc>>, body: &str, raw: &str) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"Logged (?:a|an) (?P<stage>start|end) of a status effect!\s*nickname:\s*(?P<nickname>[^,]+),\s*status effect:\s*(?P<effect>.+)"#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let player = caps.name("nickname")?.as_str().trim();
    let effect = capture(&caps, "effect").trim();
    let stage = capture(&caps, "stage");
    let verb = if stage.eq_ignore_ascii_case("start") {
        "started"
    } else {
        "ended"
    };

    Some(Classified {
        kind: EventKind::StatusEffect,
        ts,
        summary: format!("{player} {verb} {effect}"),
        details: vec![format!("Status effect: {effect}"), format!("Stage: {verb}")],
        actors: collect_actors([player]),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Hit
// ---------------------------------------------------------------------------

fn match_hit(ts: Option<DateTime<Utc>>, body: &str, raw: &str) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"Fake hit FROM (?P<attacker>\S+) TO (?P<target>[^.]+)\.(?:\s*Being sent to child (?P<child>[\w-]+))?"#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let attacker = caps.name("attacker")?.as_str().trim();
    let target = caps.name("target")?.as_str().trim();

    let mut details = Vec::new();
    let child = capture(&caps, "child").trim();
    if !child.is_empty() {
        details.push(format!("Child channel: {child}"));
    }

    Some(Classified {
        kind: EventKind::Hit,
        ts,
        summary: format!("{attacker} hit {target}"),
        details,
        actors: collect_actors([attacker, target]),
        raw: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// VehicleDestruction
// ---------------------------------------------------------------------------

fn match_vehicle_destruction(
    ts: Option<DateTime<Utc>>,
    body: &str,
    raw: &str,
) -> Option<Classified> {
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r#"Vehicle '(?P<vehicle>[^']+)'\s*\[(?P<vehicle_id>[^\]]+)\].*?zone '(?P<zone>[^']+)'.*?driven by '(?P<driver>[^']+)'\s*\[(?P<driver_id>[^\]]+)\].*?advanced from destroy level (?P<from>\d+) to (?P<to>\d+) caused by '(?P<attacker>[^']+)'\s*\[(?P<attacker_id>[^\]]+)\]\s*with '(?P<cause>[^']+)'"#,
        )
        .unwrap()
    });

    let caps = RE.captures(body)?;
    let vehicle = caps.name("vehicle")?.as_str().trim();
    let attacker = capture(&caps, "attacker").trim();
    let driver = capture(&caps, "driver").trim();
    let from: u32 = capture(&caps, "from").parse().unwrap_or(0);
    let to: u32 = capture(&caps, "to").parse().unwrap_or(0);

    let mut details = vec![
        format!("Vehicle: {vehicle} [{}]", capture(&caps, "vehicle_id")),
        format!("Destroy level: {from} -> {to}"),
        format!("Cause: {}", capture(&caps, "cause")),
    ];
    let zone = capture(&caps, "zone").trim();
    if !zone.is_empty() {
        details.push(format!("Zone: {zone}"));
    }
    if !driver.is_empty() && !driver.eq_ignore_ascii_case("unknown") {
        details.push(format!("Driver: {driver}"));
    }

    Some(Classified {
        kind: EventKind::VehicleDestruction,
        ts,
        summary: format!(
            "{attacker} {} {vehicle}",
            describe_destroy_levels(from, to)
        ),
        details,
        actors: collect_actors([attacker, driver]),
        raw: raw.to_string(),
    })
}

fn describe_destroy_levels(from: u32, to: u32) -> &'static str {
    match (from, to) {
        (0, 1) => "soft killed",
        (1, 2) => "hard killed",
        (start, end) if end > start => "destroyed",
        _ => "changed",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rfc3339_prefix_parses() {
        let (ts, body) = split_timestamp_prefix("<2024-04-02T21:14:03.517Z> [Notice] rest");
        assert!(ts.is_some());
        assert_eq!(body, " [Notice] rest");
    }

    #[test]
    fn non_rfc3339_prefix_yields_none_but_keeps_body() {
        let (ts, body) = split_timestamp_prefix("[12:00:01] Actor 'Alice'");
        assert!(ts.is_none());
        assert_eq!(body, " Actor 'Alice'");
    }

    #[test]
    fn unprefixed_line_passes_through() {
        let (ts, body) = split_timestamp_prefix("no brackets here");
        assert!(ts.is_none());
        assert_eq!(body, "no brackets here");
    }

    #[test]
    fn actors_dedup_case_insensitively_and_drop_unknown() {
        let actors = collect_actors(["Alice", "alice", "unknown", "", "Bob"]);
        assert_eq!(actors, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn destroy_level_phrasing() {
        assert_eq!(describe_destroy_levels(0, 1), "soft killed");
        assert_eq!(describe_destroy_levels(1, 2), "hard killed");
        assert_eq!(describe_destroy_levels(0, 2), "destroyed");
        assert_eq!(describe_destroy_levels(2, 2), "changed");
    }
}
