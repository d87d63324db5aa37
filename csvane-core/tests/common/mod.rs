//! Record types shared by the decode and encode tests.

#![allow(dead_code)]

use csvane_core::{Cell, CellError, FromCell, Record, ToCell};

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Person {
    #[csv(rename = "Name")]
    pub name: String,
    #[csv(rename = "Age")]
    pub age: i64,
}

impl Person {
    pub fn new(name: &str, age: i64) -> Self {
        Person {
            name: name.to_string(),
            age,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Letters {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl Letters {
    pub fn new(a: &str, b: &str, c: &str, d: &str) -> Self {
        Letters {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }
}

/// A date written as `YYYYDDMM`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Cell)]
pub struct BirthDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl FromCell for BirthDate {
    fn from_cell(raw: &str) -> Result<Self, CellError> {
        let digits = |range: std::ops::Range<usize>| {
            raw.get(range)
                .filter(|part| part.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|part| part.parse::<u16>().ok())
                .ok_or_else(|| CellError::custom(format!("invalid date {raw:?}")))
        };
        if raw.len() != 8 {
            return Err(CellError::custom(format!("invalid date {raw:?}")));
        }

        let date = BirthDate {
            year: digits(0..4)?,
            day: digits(4..6)? as u8,
            month: digits(6..8)? as u8,
        };
        if !(1..=12).contains(&date.month) || !(1..=31).contains(&date.day) {
            return Err(CellError::custom(format!("date out of range {raw:?}")));
        }
        Ok(date)
    }
}

impl ToCell for BirthDate {
    fn to_cell(&self) -> Result<String, CellError> {
        Ok(format!("{:04}{:02}{:02}", self.year, self.day, self.month))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct Member {
    pub person: Person,
    #[csv(rename = "birthdate")]
    pub birth_date: BirthDate,
    #[csv(rename = "-")]
    pub letters: Letters,
}

impl Member {
    pub fn new(name: &str, age: i64, year: u16, month: u8, day: u8) -> Self {
        Member {
            person: Person::new(name, age),
            birth_date: BirthDate { year, month, day },
            letters: Letters::default(),
        }
    }
}

pub fn members() -> Vec<Member> {
    vec![
        Member::new("John", 25, 1999, 12, 1),
        Member::new("Michael", 50, 1975, 1, 1),
    ]
}
