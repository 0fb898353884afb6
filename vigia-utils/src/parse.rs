/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;
    let mut saw_unit_segment = false;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        if number == 0 {
            return None;
        }

        let saw_unit = cursor < bytes.len();
        let multiplier = if saw_unit {
            let unit = bytes[cursor] as char;
            cursor += 1;

            match unit {
                's' | 'S' => 1_u64,
                'm' | 'M' => 60_u64,
                'h' | 'H' => 60_u64 * 60,
                'd' | 'D' => 60_u64 * 60 * 24,
                _ => return None,
            }
        } else {
            1_u64
        };

        if !saw_unit && saw_unit_segment {
            return None;
        }

        saw_unit_segment = saw_unit_segment || saw_unit;

        let part_seconds = number.checked_mul(multiplier)?;
        total_seconds = total_seconds.checked_add(part_seconds)?;
    }

    if total_seconds == 0 {
        None
    } else {
        Some(total_seconds)
    }
}

pub fn has_duration_unit(raw: &str) -> bool {
    let value = raw.trim();
    let Some(last) = value.chars().last() else {
        return false;
    };

    matches!(last, 's' | 'S' | 'm' | 'M' | 'h' | 'H' | 'd' | 'D')
}

/// Parse `123`, `<#123>` into a channel id.
pub fn parse_channel_id(raw: &str) -> Option<u64> {
    parse_mention(raw, &["<#"])
}

/// Parse `123`, `<@&123>` into a role id.
pub fn parse_role_id(raw: &str) -> Option<u64> {
    parse_mention(raw, &["<@&"])
}

/// Parse `123`, `<@123>`, `<@!123>` into a user id.
pub fn parse_user_id(raw: &str) -> Option<u64> {
    parse_mention(raw, &["<@!", "<@"])
}

fn parse_mention(raw: &str, openers: &[&str]) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u64>() {
        return Some(id);
    }

    let inner = raw.strip_suffix('>')?;
    openers
        .iter()
        .find_map(|opener| inner.strip_prefix(opener))
        .and_then(|digits| digits.parse::<u64>().ok())
}

/// Whether a value means "clear this option".
pub fn is_clear_keyword(raw: &str) -> bool {
    let value = raw.trim();
    value.eq_ignore_ascii_case("none") || value.eq_ignore_ascii_case("nenhum")
}

#[cfg(test)]
mod tests {
    use super::{
        has_duration_unit, is_clear_keyword, parse_channel_id, parse_duration_seconds,
        parse_role_id, parse_user_id,
    };

    #[test]
    fn parses_compact_durations() {
        assert_eq!(parse_duration_seconds("30s"), Some(30));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("1h30m"), Some(5400));
        assert_eq!(parse_duration_seconds("2d"), Some(172_800));
        assert_eq!(parse_duration_seconds("45"), Some(45));
        assert_eq!(parse_duration_seconds("0m"), None);
        assert_eq!(parse_duration_seconds("10x"), None);
        assert_eq!(parse_duration_seconds(""), None);
        assert!(has_duration_unit("5m"));
        assert!(!has_duration_unit("spam"));
    }

    #[test]
    fn parses_mentions_and_raw_ids() {
        assert_eq!(parse_channel_id("<#42>"), Some(42));
        assert_eq!(parse_channel_id("42"), Some(42));
        assert_eq!(parse_channel_id("<@42>"), None);
        assert_eq!(parse_role_id("<@&7>"), Some(7));
        assert_eq!(parse_role_id("<#7>"), None);
        assert_eq!(parse_user_id("<@!9>"), Some(9));
        assert_eq!(parse_user_id("<@9>"), Some(9));
        assert_eq!(parse_user_id("<@&9>"), None);
        assert_eq!(parse_user_id("someone"), None);
    }

    #[test]
    fn recognises_clear_keywords() {
        assert!(is_clear_keyword("none"));
        assert!(is_clear_keyword("NENHUM"));
        assert!(!is_clear_keyword("#general"));
    }
}
