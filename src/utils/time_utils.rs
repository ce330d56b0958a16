use chrono::{DateTime, Utc};

/// "14:30:00" style label for the time scale.
pub fn epoch_s_to_time_string(epoch_s: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_s, 0) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// "March 4, 2021 14:30" style label for the date overlay under the cursor.
pub fn epoch_s_to_date_string(epoch_s: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_s, 0) {
        Some(dt) => dt.format("%B %-d, %Y %H:%M").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_timestamps() {
        // 2021-03-04 14:30:00 UTC
        let ts = 1_614_868_200;
        assert_eq!(epoch_s_to_time_string(ts), "14:30:00");
        assert_eq!(epoch_s_to_date_string(ts), "March 4, 2021 14:30");
    }

    #[test]
    fn out_of_range_timestamp_yields_empty_label() {
        assert_eq!(epoch_s_to_time_string(i64::MAX), "");
    }
}
