use std::{fmt::Display, str::FromStr};

use mongodb::bson::{to_bson, Bson};
use rocket::request::FromParam;
use serde::{Deserialize, Serialize};

/// Days on which the event runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDay {
    Mon,
    Tue,
    Wed,
}

impl EventDay {
    pub const ALL: [EventDay; 3] = [EventDay::Mon, EventDay::Tue, EventDay::Wed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
        }
    }
}

impl Display for EventDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventDay {
    type Err = InvalidSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mon" => Ok(Self::Mon),
            "tue" => Ok(Self::Tue),
            "wed" => Ok(Self::Wed),
            _ => Err(InvalidSlot(s.to_string())),
        }
    }
}

impl From<EventDay> for Bson {
    fn from(day: EventDay) -> Self {
        to_bson(&day).expect("Serialisation is infallible")
    }
}

impl<'a> FromParam<'a> for EventDay {
    type Error = InvalidSlot;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

/// Half-hour slots between 18:00 and 22:00 inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventTime {
    #[serde(rename = "18:00")]
    T1800,
    #[serde(rename = "18:30")]
    T1830,
    #[serde(rename = "19:00")]
    T1900,
    #[serde(rename = "19:30")]
    T1930,
    #[serde(rename = "20:00")]
    T2000,
    #[serde(rename = "20:30")]
    T2030,
    #[serde(rename = "21:00")]
    T2100,
    #[serde(rename = "21:30")]
    T2130,
    #[serde(rename = "22:00")]
    T2200,
}

impl EventTime {
    pub const ALL: [EventTime; 9] = [
        EventTime::T1800,
        EventTime::T1830,
        EventTime::T1900,
        EventTime::T1930,
        EventTime::T2000,
        EventTime::T2030,
        EventTime::T2100,
        EventTime::T2130,
        EventTime::T2200,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::T1800 => "18:00",
            Self::T1830 => "18:30",
            Self::T1900 => "19:00",
            Self::T1930 => "19:30",
            Self::T2000 => "20:00",
            Self::T2030 => "20:30",
            Self::T2100 => "21:00",
            Self::T2130 => "21:30",
            Self::T2200 => "22:00",
        }
    }
}

impl Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventTime {
    type Err = InvalidSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|time| time.as_str() == s)
            .ok_or_else(|| InvalidSlot(s.to_string()))
    }
}

impl From<EventTime> for Bson {
    fn from(time: EventTime) -> Self {
        to_bson(&time).expect("Serialisation is infallible")
    }
}

impl<'a> FromParam<'a> for EventTime {
    type Error = InvalidSlot;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

/// A concrete (day, time) slot that participants register into and that
/// admins gate independently.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: EventDay,
    pub time: EventTime,
}

impl TimeSlot {
    pub fn new(day: EventDay, time: EventTime) -> Self {
        Self { day, time }
    }

    /// Every valid slot of the event, in (day, time) order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        EventDay::ALL.into_iter().flat_map(|day| {
            EventTime::ALL
                .into_iter()
                .map(move |time| TimeSlot { day, time })
        })
    }
}

impl Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}

/// Error for unrecognised day/time values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not a valid event day or time: {0}")]
pub struct InvalidSlot(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_round_trip() {
        for day in EventDay::ALL {
            assert_eq!(day, day.to_string().parse().unwrap());
        }
        assert!("thu".parse::<EventDay>().is_err());
        assert!("Mon".parse::<EventDay>().is_err());
    }

    #[test]
    fn time_round_trip() {
        for time in EventTime::ALL {
            assert_eq!(time, time.to_string().parse().unwrap());
        }
        assert!("17:30".parse::<EventTime>().is_err());
        assert!("22:30".parse::<EventTime>().is_err());
        assert!("1800".parse::<EventTime>().is_err());
    }

    #[test]
    fn twenty_seven_slots() {
        let slots: Vec<_> = TimeSlot::all().collect();
        assert_eq!(slots.len(), 27);
        // No duplicates.
        let unique: std::collections::HashSet<_> = slots.iter().copied().collect();
        assert_eq!(unique.len(), slots.len());
    }

    #[test]
    fn time_serialises_as_clock_string() {
        let json = rocket::serde::json::to_string(&EventTime::T1930).unwrap();
        assert_eq!(json, "\"19:30\"");
    }
}
