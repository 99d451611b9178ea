use chrono::{Datelike, Local, NaiveDate};

// College seasons tip off in November.
const SEASON_START_MONTH: u32 = 11;

/// `YYYY-YY` label of the season `date` falls in, shifted back `seasons_ago`.
pub fn season_label(date: NaiveDate, seasons_ago: u32) -> String {
    let year = date.year();
    let opening_year = if date.month() >= SEASON_START_MONTH {
        year
    } else {
        year - 1
    };
    let start = opening_year - seasons_ago as i32;
    let end = start + 1;
    format!("{start}-{:02}", end.rem_euclid(100))
}

pub fn current_season_label(seasons_ago: u32) -> String {
    season_label(Local::now().date_naive(), seasons_ago)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn november_opens_a_new_season() {
        assert_eq!(season_label(date(2024, 11, 5), 0), "2024-25");
        assert_eq!(season_label(date(2024, 10, 31), 0), "2023-24");
    }

    #[test]
    fn spring_belongs_to_previous_start_year() {
        assert_eq!(season_label(date(2025, 3, 1), 0), "2024-25");
        assert_eq!(season_label(date(2025, 3, 1), 1), "2023-24");
        assert_eq!(season_label(date(2025, 3, 1), 5), "2019-20");
    }

    #[test]
    fn century_rollover_keeps_two_digits() {
        assert_eq!(season_label(date(2099, 12, 1), 0), "2099-00");
    }
}
