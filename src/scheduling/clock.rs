use chrono::NaiveTime;

const CLOCK_FORMAT: &str = "%I:%M %p";

/// 解析 12 小时制时间，如 `"09:00 AM"`
pub fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map_err(|_| format!("Invalid time '{value}'. Use the format HH:MM AM/PM."))
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(
            parse_clock("09:00 AM").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_clock("12:30 PM").unwrap(),
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        );
        assert_eq!(
            parse_clock("12:15 AM").unwrap(),
            NaiveTime::from_hms_opt(0, 15, 0).unwrap()
        );
        assert!(parse_clock("9am").is_err());
        assert!(parse_clock("13:00 PM").is_err());
    }

    #[test]
    fn test_format_clock() {
        let t = NaiveTime::from_hms_opt(18, 5, 0).unwrap();
        assert_eq!(format_clock(t), "06:05 PM");
        assert_eq!(parse_clock(&format_clock(t)).unwrap(), t);
    }
}
