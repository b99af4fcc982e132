//! Selectable start and end times for a picker.
//!
//! Advisory only: the validator re-checks business hours on save. Both sides
//! use the conversions in [`crate::hours`].

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::hours::{resolve_local, to_viewer, BusinessHours};

/// An ordered, finite list of viewer-local date-times.
///
/// Iterating does not consume it; every call to [`Slots::iter`] starts over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots {
    times: Vec<NaiveDateTime>,
}

impl Slots {
    pub fn iter(&self) -> std::slice::Iter<'_, NaiveDateTime> {
        self.times.iter()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn as_slice(&self) -> &[NaiveDateTime] {
        &self.times
    }
}

impl<'a> IntoIterator for &'a Slots {
    type Item = &'a NaiveDateTime;
    type IntoIter = std::slice::Iter<'a, NaiveDateTime>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}

/// Start choices for the shift opening on home-zone `date`: opening through
/// `closing - slot`.
pub fn list_selectable_starts(hours: &BusinessHours, viewer: Tz, date: NaiveDate) -> Slots {
    let bounds = hours.opening_on(date).zip(
        hours
            .closing_on(date)
            .and_then(|close| close.checked_sub_signed(hours.slot())),
    );
    spaced(bounds, hours.slot(), viewer)
}

/// End choices for the shift opening on home-zone `date`: `opening + slot`
/// through closing.
pub fn list_selectable_ends(hours: &BusinessHours, viewer: Tz, date: NaiveDate) -> Slots {
    let bounds = hours
        .opening_on(date)
        .and_then(|open| open.checked_add_signed(hours.slot()))
        .zip(hours.closing_on(date));
    spaced(bounds, hours.slot(), viewer)
}

/// Instants from `first` to `last` at `step`, read in the viewer's zone.
///
/// A reading the viewer's clock shows twice (clocks falling back) is kept only
/// for the instant it resolves back to, so every offered time is one the
/// validator interprets the same way and none repeats.
fn spaced(bounds: Option<(DateTime<Tz>, DateTime<Tz>)>, step: Duration, viewer: Tz) -> Slots {
    let mut times = Vec::new();
    let Some((first, last)) = bounds else {
        return Slots { times };
    };
    let mut cursor = Some(first);
    while let Some(instant) = cursor.filter(|c| *c <= last) {
        if let Some(local) = to_viewer(&instant, viewer) {
            if resolve_local(&viewer, local) == Some(instant) {
                times.push(local);
            }
        }
        cursor = instant.checked_add_signed(step);
    }
    Slots { times }
}
