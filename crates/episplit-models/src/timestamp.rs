//! Timestamp formatting for FFmpeg arguments and log output.

/// Format seconds into an `HH:MM:SS.mmm` string.
///
/// # Examples
/// ```
/// use episplit_models::timestamp::format_seconds;
/// assert_eq!(format_seconds(0.0), "00:00:00.000");
/// assert_eq!(format_seconds(710.5), "00:11:50.500");
/// ```
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;
    format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "00:00:00.000");
        assert_eq!(format_seconds(90.0), "00:01:30.000");
        assert_eq!(format_seconds(3661.0), "01:01:01.000");
        assert_eq!(format_seconds(710.25), "00:11:50.250");
    }
}
