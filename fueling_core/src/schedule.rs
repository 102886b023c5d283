//! Schedule skeleton construction.
//!
//! Builds the locked set of consumption-event timestamps for a workout:
//! one pre-event, an ordered list of during-events, one post-event.
//! Downstream components may change only what is consumed at each event,
//! never the times.

use crate::{AthleteProfile, FuelingEvent, DuringEvent, FuelingTargets, GiSensitivity,
    ScheduleSkeleton, WorkoutInput};
use chrono::Duration;

/// Minutes before workout start for the pre-event
const PRE_OFFSET_MIN: i64 = 40;

/// Minutes after workout end for the post-event
const POST_OFFSET_MIN: i64 = 40;

/// Build the locked timing skeleton for one workout.
///
/// During-events are generated only when there is something to consume
/// (carbs or fluids). GI-sensitive athletes get a tighter 15-minute
/// interval so each slot carries a smaller dose.
pub fn build_skeleton(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    targets: &FuelingTargets,
) -> ScheduleSkeleton {
    let pre = FuelingEvent {
        time: event_time(workout, -PRE_OFFSET_MIN),
        action: "Pre-workout fueling".into(),
    };

    let mut during = Vec::new();
    if targets.carbs_total_g > 0 || targets.fluids_total_ml > 0 {
        let interval = if profile.gi_sensitivity == GiSensitivity::High {
            15
        } else {
            20
        };
        let count = workout.duration_min.div_ceil(interval) as usize;

        tracing::debug!(
            "Scheduling {} during-events at {} min intervals",
            count,
            interval
        );

        for slot in 0..count {
            during.push(DuringEvent {
                slot,
                time: event_time(workout, (slot as i64) * i64::from(interval)),
                action: "Fuel and hydrate".into(),
            });
        }
    }

    let post = FuelingEvent {
        time: event_time(workout, i64::from(workout.duration_min) + POST_OFFSET_MIN),
        action: "Recovery meal".into(),
    };

    ScheduleSkeleton { pre, during, post }
}

/// Format an event time at `offset_min` minutes from workout start:
/// absolute "HH:MM" when a start time is known, else relative "T±Xmin"
fn event_time(workout: &WorkoutInput, offset_min: i64) -> String {
    match workout.start_time {
        Some(start) => {
            let t = start + Duration::minutes(offset_min);
            t.format("%H:%M").to_string()
        }
        None if offset_min < 0 => format!("T-{}min", -offset_min),
        None => format!("T+{}min", offset_min),
    }
}
