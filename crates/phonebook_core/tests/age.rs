use chrono::NaiveDate;
use phonebook_core::{age, age_of, AgeError, BirthDate, ContactValidationError};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn age_subtracts_one_before_birthday() {
    assert_eq!(age("01.02.1990", date(2024, 1, 15)).unwrap(), 33);
    assert_eq!(age("01.02.1990", date(2024, 2, 15)).unwrap(), 34);
}

#[test]
fn age_counts_birthday_itself_as_reached() {
    assert_eq!(age("01.02.1990", date(2024, 2, 1)).unwrap(), 34);
    assert_eq!(age("01.02.1990", date(2024, 1, 31)).unwrap(), 33);
}

#[test]
fn leap_day_birthday_waits_for_march_in_common_years() {
    assert_eq!(age("29.02.2000", date(2023, 2, 28)).unwrap(), 22);
    assert_eq!(age("29.02.2000", date(2023, 3, 1)).unwrap(), 23);
}

#[test]
fn future_birth_date_yields_negative_age() {
    assert_eq!(age("01.06.2030", date(2024, 1, 15)).unwrap(), -7);
}

#[test]
fn missing_and_invalid_dob_fail() {
    assert_eq!(age("", date(2024, 1, 15)).unwrap_err(), AgeError::MissingDob);
    assert_eq!(age_of(None, date(2024, 1, 15)).unwrap_err(), AgeError::MissingDob);
    assert_eq!(
        age("31.02.2020", date(2024, 1, 15)).unwrap_err(),
        AgeError::InvalidDob(ContactValidationError::InvalidDob("31.02.2020".to_string()))
    );
}

#[test]
fn age_of_matches_text_form() {
    let dob = BirthDate::parse("15.07.1985").unwrap();
    assert_eq!(age_of(Some(dob), date(2024, 7, 14)).unwrap(), 38);
    assert_eq!(age_of(Some(dob), date(2024, 7, 15)).unwrap(), 39);
}
