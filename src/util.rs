/// Format a whole number of minutes as `MM:00`
pub fn minutes_to_duration(minutes: u32) -> String {
    seconds_to_duration(minutes * 60)
}

/// Format seconds as `MM:SS`; minutes are not wrapped into hours
pub fn seconds_to_duration(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_to_duration() {
        assert_eq!(minutes_to_duration(5), "05:00");
        assert_eq!(minutes_to_duration(25), "25:00");
        assert_eq!(minutes_to_duration(60), "60:00");
    }

    #[test]
    fn test_minutes_to_duration_single_digit() {
        assert_eq!(minutes_to_duration(1), "01:00");
    }

    #[test]
    fn test_seconds_to_duration() {
        assert_eq!(seconds_to_duration(0), "00:00");
        assert_eq!(seconds_to_duration(59), "00:59");
        assert_eq!(seconds_to_duration(61), "01:01");
        assert_eq!(seconds_to_duration(1499), "24:59");
    }

    #[test]
    fn test_seconds_to_duration_past_an_hour() {
        assert_eq!(seconds_to_duration(3600), "60:00");
        assert_eq!(seconds_to_duration(3725), "62:05");
    }
}
