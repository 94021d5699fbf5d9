//! Calendar collaborator interface
//!
//! The calendar engine is an external system: it owns leap/era arithmetic,
//! month shapes, sunrise/sunset tables, and moon orbits. This module defines
//! the read-only view the simulation consumes, plus [`SimpleCalendar`], a
//! small concrete calendar used by the demo binary and the test suites.

use serde::{Deserialize, Serialize};

/// A calendar date. Month and day are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

/// Time of day components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTime {
    pub hour: u32,
    pub minute: u32,
}

/// A moon as seen at the current instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonSnapshot {
    pub name: String,
    /// Phase position in [0,1): 0 = new, 0.5 = full
    pub phase_position: f64,
    /// Optional `#rrggbb` tint; colorless moons contribute light but no hue
    pub color: Option<String>,
    /// Peak night-light contribution of a full moon; defaults to 0.15
    pub brightness_max: Option<f64>,
}

impl MoonSnapshot {
    /// Illuminated fraction: 0 at new moon, 1 at full, symmetric around full
    pub fn illumination(&self) -> f64 {
        (1.0 - (std::f64::consts::TAU * self.phase_position).cos()) / 2.0
    }
}

/// Read-only view of the calendar engine
pub trait CalendarProvider {
    fn current_date(&self) -> CalendarDate;
    fn current_time(&self) -> CalendarTime;
    fn hours_per_day(&self) -> u32;
    fn minutes_per_hour(&self) -> u32;
    /// Sunrise in decimal hours, `None` when the calendar defines no sun cycle
    fn sunrise(&self) -> Option<f64>;
    /// Sunset in decimal hours
    fn sunset(&self) -> Option<f64>;
    /// Calendar-author-defined season name, free text
    fn season_name(&self) -> Option<String>;
    /// All season names the calendar defines, in calendar order
    fn season_names(&self) -> Vec<String>;
    fn moons(&self) -> Vec<MoonSnapshot>;
    /// Date arithmetic belongs to the calendar (arbitrary month shapes)
    fn add_days(&self, date: CalendarDate, days: i64) -> CalendarDate;
    /// Absolute game time in hours since the calendar epoch
    fn world_time_hours(&self) -> f64;
}

/// Moon orbit definition for [`SimpleCalendar`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoonOrbit {
    pub name: String,
    pub period_days: u32,
    pub color: Option<String>,
    pub brightness_max: Option<f64>,
}

/// A plain calendar: equal-length seasons over a fixed month table,
/// optional sun cycle, moons on simple circular orbits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleCalendar {
    /// Days in each month, in order
    month_lengths: Vec<u32>,
    hours_per_day: u32,
    minutes_per_hour: u32,
    sunrise: Option<f64>,
    sunset: Option<f64>,
    seasons: Vec<String>,
    moons: Vec<MoonOrbit>,
    /// Minutes elapsed since year 1, month 1, day 1, 00:00
    elapsed_minutes: u64,
}

impl SimpleCalendar {
    pub fn new(month_lengths: Vec<u32>, seasons: Vec<String>) -> Self {
        Self {
            month_lengths,
            hours_per_day: 24,
            minutes_per_hour: 60,
            sunrise: Some(6.0),
            sunset: Some(18.0),
            seasons,
            moons: Vec::new(),
            elapsed_minutes: 0,
        }
    }

    /// A 12x30-day year with four seasons and one moon
    pub fn standard() -> Self {
        let mut cal = Self::new(
            vec![30; 12],
            vec![
                "Spring".into(),
                "Summer".into(),
                "Autumn".into(),
                "Winter".into(),
            ],
        );
        cal.moons.push(MoonOrbit {
            name: "Moon".into(),
            period_days: 29,
            color: None,
            brightness_max: None,
        });
        cal
    }

    pub fn with_sun(mut self, sunrise: Option<f64>, sunset: Option<f64>) -> Self {
        self.sunrise = sunrise;
        self.sunset = sunset;
        self
    }

    pub fn with_moons(mut self, moons: Vec<MoonOrbit>) -> Self {
        self.moons = moons;
        self
    }

    pub fn advance_minutes(&mut self, minutes: u64) {
        self.elapsed_minutes += minutes;
    }

    pub fn advance_hours(&mut self, hours: u64) {
        self.elapsed_minutes += hours * self.minutes_per_hour as u64;
    }

    pub fn advance_days(&mut self, days: u64) {
        self.elapsed_minutes +=
            days * (self.hours_per_day * self.minutes_per_hour) as u64;
    }

    pub fn set_time_of_day(&mut self, hour: u32, minute: u32) {
        let minutes_per_day = (self.hours_per_day * self.minutes_per_hour) as u64;
        let day_start = self.elapsed_minutes - self.elapsed_minutes % minutes_per_day;
        self.elapsed_minutes =
            day_start + (hour * self.minutes_per_hour + minute) as u64;
    }

    fn days_per_year(&self) -> u64 {
        self.month_lengths.iter().map(|&d| d as u64).sum()
    }

    fn elapsed_days(&self) -> u64 {
        self.elapsed_minutes / (self.hours_per_day * self.minutes_per_hour) as u64
    }
}

impl CalendarProvider for SimpleCalendar {
    fn current_date(&self) -> CalendarDate {
        let days = self.elapsed_days();
        let per_year = self.days_per_year().max(1);
        let year = (days / per_year) as i32 + 1;
        let mut day_of_year = (days % per_year) as u32;
        for (i, &len) in self.month_lengths.iter().enumerate() {
            if day_of_year < len {
                return CalendarDate::new(year, i as u32 + 1, day_of_year + 1);
            }
            day_of_year -= len;
        }
        CalendarDate::new(year, self.month_lengths.len() as u32, 1)
    }

    fn current_time(&self) -> CalendarTime {
        let minutes_per_day = (self.hours_per_day * self.minutes_per_hour) as u64;
        let in_day = (self.elapsed_minutes % minutes_per_day) as u32;
        CalendarTime {
            hour: in_day / self.minutes_per_hour,
            minute: in_day % self.minutes_per_hour,
        }
    }

    fn hours_per_day(&self) -> u32 {
        self.hours_per_day
    }

    fn minutes_per_hour(&self) -> u32 {
        self.minutes_per_hour
    }

    fn sunrise(&self) -> Option<f64> {
        self.sunrise
    }

    fn sunset(&self) -> Option<f64> {
        self.sunset
    }

    fn season_name(&self) -> Option<String> {
        if self.seasons.is_empty() {
            return None;
        }
        let per_year = self.days_per_year().max(1);
        let day_of_year = self.elapsed_days() % per_year;
        let idx = (day_of_year * self.seasons.len() as u64 / per_year) as usize;
        self.seasons.get(idx).cloned()
    }

    fn season_names(&self) -> Vec<String> {
        self.seasons.clone()
    }

    fn moons(&self) -> Vec<MoonSnapshot> {
        let day = self.elapsed_days();
        self.moons
            .iter()
            .map(|m| MoonSnapshot {
                name: m.name.clone(),
                phase_position: (day % m.period_days.max(1) as u64) as f64
                    / m.period_days.max(1) as f64,
                color: m.color.clone(),
                brightness_max: m.brightness_max,
            })
            .collect()
    }

    fn add_days(&self, date: CalendarDate, days: i64) -> CalendarDate {
        let per_year = self.days_per_year().max(1) as i64;
        // Flatten to an absolute day index, shift, and re-expand
        let mut day_of_year: i64 = 0;
        for &len in self.month_lengths.iter().take(date.month as usize - 1) {
            day_of_year += len as i64;
        }
        day_of_year += date.day as i64 - 1;
        let mut absolute = (date.year as i64 - 1) * per_year + day_of_year + days;
        if absolute < 0 {
            absolute = 0;
        }
        let year = absolute / per_year + 1;
        let mut rest = (absolute % per_year) as u32;
        for (i, &len) in self.month_lengths.iter().enumerate() {
            if rest < len {
                return CalendarDate::new(year as i32, i as u32 + 1, rest + 1);
            }
            rest -= len;
        }
        CalendarDate::new(year as i32, 1, 1)
    }

    fn world_time_hours(&self) -> f64 {
        self.elapsed_minutes as f64 / self.minutes_per_hour as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_calendar_starts_at_year_one() {
        let cal = SimpleCalendar::standard();
        assert_eq!(cal.current_date(), CalendarDate::new(1, 1, 1));
        assert_eq!(cal.current_time(), CalendarTime { hour: 0, minute: 0 });
    }

    #[test]
    fn test_advance_rolls_over_months_and_years() {
        let mut cal = SimpleCalendar::standard();
        cal.advance_days(30);
        assert_eq!(cal.current_date(), CalendarDate::new(1, 2, 1));
        cal.advance_days(330);
        assert_eq!(cal.current_date(), CalendarDate::new(2, 1, 1));
    }

    #[test]
    fn test_season_progression() {
        let mut cal = SimpleCalendar::standard();
        assert_eq!(cal.season_name().as_deref(), Some("Spring"));
        cal.advance_days(90);
        assert_eq!(cal.season_name().as_deref(), Some("Summer"));
        cal.advance_days(90);
        assert_eq!(cal.season_name().as_deref(), Some("Autumn"));
        cal.advance_days(90);
        assert_eq!(cal.season_name().as_deref(), Some("Winter"));
    }

    #[test]
    fn test_add_days_crosses_year_boundary() {
        let cal = SimpleCalendar::standard();
        let date = cal.add_days(CalendarDate::new(1, 12, 29), 3);
        assert_eq!(date, CalendarDate::new(2, 1, 2));
    }

    #[test]
    fn test_moon_phase_cycles() {
        let mut cal = SimpleCalendar::standard();
        let new_moon = cal.moons()[0].clone();
        assert!(new_moon.phase_position < 0.01);
        assert!(new_moon.illumination() < 0.01);

        // Half period later the moon is full
        cal.advance_days(14);
        let near_full = cal.moons()[0].clone();
        assert!((near_full.phase_position - 0.48).abs() < 0.05);
        assert!(near_full.illumination() > 0.95);
    }

    #[test]
    fn test_set_time_of_day() {
        let mut cal = SimpleCalendar::standard();
        cal.advance_days(5);
        cal.set_time_of_day(13, 30);
        assert_eq!(cal.current_time(), CalendarTime { hour: 13, minute: 30 });
        assert_eq!(cal.current_date(), CalendarDate::new(1, 1, 6));
    }
}
