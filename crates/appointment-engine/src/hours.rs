//! Business hours defined in a fixed home zone, checked from any viewer zone.
//!
//! Opening and closing are instants, not wall-clock times: for each proposed
//! appointment the opening instant is rebuilt from the home-zone calendar date
//! of its start, and closing is always `opening + shift`. A shift may therefore
//! run past midnight in the home zone.
//!
//! The validator and the slot generator in [`crate::slots`] go through the same
//! two conversions, [`resolve_local`] and [`to_viewer`].

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{ConfigError, ScheduleError};

/// Process-wide business-hours policy.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessHours {
    home_zone: Tz,
    opening: NaiveTime,
    shift: Duration,
    slot: Duration,
}

impl Default for BusinessHours {
    /// 08:00 to 22:00 `America/New_York`, 10-minute slots.
    fn default() -> Self {
        Self {
            home_zone: chrono_tz::America::New_York,
            opening: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            shift: Duration::hours(14),
            slot: Duration::minutes(10),
        }
    }
}

impl BusinessHours {
    /// Build a policy, rejecting shifts that are empty or longer than a day and
    /// slot granularities that do not fit in the shift.
    pub fn new(
        home_zone: Tz,
        opening: NaiveTime,
        shift: Duration,
        slot: Duration,
    ) -> Result<Self, ConfigError> {
        if shift <= Duration::zero() || shift > Duration::days(1) {
            return Err(ConfigError::InvalidDuration(format!(
                "shift must be between 1 minute and 24 hours, got {} minutes",
                shift.num_minutes()
            )));
        }
        if slot <= Duration::zero() || slot > shift {
            return Err(ConfigError::InvalidDuration(format!(
                "slot granularity must be positive and fit in the shift, got {} minutes",
                slot.num_minutes()
            )));
        }
        Ok(Self {
            home_zone,
            opening,
            shift,
            slot,
        })
    }

    pub fn home_zone(&self) -> Tz {
        self.home_zone
    }

    pub fn opening(&self) -> NaiveTime {
        self.opening
    }

    pub fn shift(&self) -> Duration {
        self.shift
    }

    pub fn slot(&self) -> Duration {
        self.slot
    }

    /// Home-zone wall-clock closing time (wraps past midnight).
    pub fn closing(&self) -> NaiveTime {
        self.opening + self.shift
    }

    /// Opening instant for a home-zone calendar date, `None` at the edges of
    /// the representable range.
    pub fn opening_on(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        resolve_local(&self.home_zone, date.and_time(self.opening))
    }

    /// Closing instant for the shift that opens on `date`. May fall on the
    /// next home-zone date.
    pub fn closing_on(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        self.opening_on(date)?.checked_add_signed(self.shift)
    }

    /// Interpret a viewer-local date-time and express it in the home zone.
    pub fn to_home(&self, local: NaiveDateTime, viewer: Tz) -> Option<DateTime<Tz>> {
        resolve_local(&viewer, local).map(|instant| instant.with_timezone(&self.home_zone))
    }

    /// The shift opening on home-zone `date`, as viewer-local date-times.
    pub fn local_window(
        &self,
        viewer: Tz,
        date: NaiveDate,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((
            to_viewer(&self.opening_on(date)?, viewer)?,
            to_viewer(&self.closing_on(date)?, viewer)?,
        ))
    }

    /// Human-readable window, local first, then home zone.
    pub fn describe(&self, viewer: Tz, date: NaiveDate) -> String {
        let home = format!(
            "{} - {} {}",
            self.opening.format("%H:%M"),
            self.closing().format("%H:%M"),
            self.home_zone.name()
        );
        match self.local_window(viewer, date) {
            Some((open, close)) => format!(
                "{} - {} {} ({})",
                open.format("%H:%M"),
                close.format("%H:%M"),
                viewer.name(),
                home
            ),
            None => home,
        }
    }

    /// Check a viewer-local interval against the shift opening on the home-zone
    /// date of its start.
    ///
    /// Also fails if the start lands after the end once both are in the home
    /// zone, which only a zone transition between them can cause. Date-times
    /// too close to the ends of the calendar to convert are outside every
    /// shift.
    pub fn validate(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        viewer: Tz,
    ) -> Result<(), ScheduleError> {
        let outside = |date: NaiveDate| ScheduleError::OutsideBusinessHours {
            start,
            end,
            window: self.describe(viewer, date),
        };

        let (Some(start_home), Some(end_home)) =
            (self.to_home(start, viewer), self.to_home(end, viewer))
        else {
            return Err(outside(start.date()));
        };
        let Some(home_date) = wall_clock(&start_home).map(|t| t.date()) else {
            return Err(outside(start.date()));
        };
        let (Some(opening), Some(closing)) =
            (self.opening_on(home_date), self.closing_on(home_date))
        else {
            return Err(outside(home_date));
        };

        debug!(
            %start_home,
            %end_home,
            %opening,
            %closing,
            "checking business hours"
        );

        if start_home < opening || end_home > closing || start_home > end_home {
            return Err(outside(home_date));
        }
        Ok(())
    }
}

/// Free-function form of [`BusinessHours::validate`].
pub fn validate_business_hours(
    start: NaiveDateTime,
    end: NaiveDateTime,
    hours: &BusinessHours,
    viewer: Tz,
) -> Result<(), ScheduleError> {
    hours.validate(start, end, viewer)
}

/// Attach a zone to a naive local date-time without panicking on transitions.
///
/// An ambiguous time (clocks falling back) resolves to the earlier instant. A
/// time inside a gap (clocks springing forward) keeps the offset in force
/// before the gap, which moves it later by the length of the gap. `None` only
/// when the result would leave the representable range.
pub fn resolve_local(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let day_before = local.checked_sub_signed(Duration::days(1))?;
            let before = zone.offset_from_utc_datetime(&day_before).fix();
            let utc = local
                .checked_sub_signed(Duration::seconds(i64::from(before.local_minus_utc())))?;
            Some(zone.from_utc_datetime(&utc))
        }
    }
}

/// Wall-clock reading of an instant in the viewer's zone.
pub fn to_viewer(instant: &DateTime<Tz>, viewer: Tz) -> Option<NaiveDateTime> {
    wall_clock(&instant.with_timezone(&viewer))
}

fn wall_clock(instant: &DateTime<Tz>) -> Option<NaiveDateTime> {
    let offset = instant.offset().fix().local_minus_utc();
    instant
        .naive_utc()
        .checked_add_signed(Duration::seconds(i64::from(offset)))
}
