// Demo data generator
// Decision: Writes go through EventService so seeded events get the same mapping and validation as API writes
// Decision: Randomness is injected so tests and `--seed` runs are reproducible

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use rand::Rng;

use crate::services::{CreateEventInput, EventService};
use nightctrl_core::{SLEEP_END, SLEEP_START, SUPPLEMENT, UNIT_MILLIGRAMS, UNIT_MINUTES};

/// Days generated when no count is given
pub const DEFAULT_SEED_DAYS: u32 = 7;

/// Dosage of the evening supplement
pub const SUPPLEMENT_DOSE_MG: f64 = 400.0;

/// What a seeding run wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub nights: u32,
    pub supplements: u32,
}

impl SeedReport {
    pub fn events(&self) -> u32 {
        self.nights * 2 + self.supplements
    }
}

/// Write `days` nights of synthetic data ending on `today`.
///
/// Per day: bedtime between 22:00 and 24:00 local, wake 6 to 9 hours later
/// carrying the duration in minutes, and with probability 0.5 a supplement
/// one hour before bedtime.
pub async fn seed_demo_data<R: Rng>(
    service: &EventService,
    owner_id: &str,
    today: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Result<SeedReport> {
    let tz = service.timezone();
    let mut report = SeedReport::default();

    for days_ago in 0..days {
        let date = today - Duration::days(i64::from(days_ago));
        let local_bedtime = date.and_time(NaiveTime::MIN)
            + Duration::hours(22)
            + Duration::minutes(rng.gen_range(0..120));
        let Some(bedtime) = tz.from_local_datetime(&local_bedtime).earliest() else {
            tracing::warn!(date = %date, "Skipping night with non-existent local bedtime");
            continue;
        };
        let bedtime = bedtime.with_timezone(&Utc);
        let sleep_minutes = 6 * 60 + rng.gen_range(0..180);
        let wake = bedtime + Duration::minutes(sleep_minutes);

        if rng.gen_bool(0.5) {
            write(
                service,
                owner_id,
                SUPPLEMENT,
                bedtime - Duration::hours(1),
                Some((SUPPLEMENT_DOSE_MG, UNIT_MILLIGRAMS)),
            )
            .await?;
            report.supplements += 1;
        }

        write(service, owner_id, SLEEP_START, bedtime, None).await?;
        write(
            service,
            owner_id,
            SLEEP_END,
            wake,
            Some((sleep_minutes as f64, UNIT_MINUTES)),
        )
        .await?;
        report.nights += 1;
    }

    tracing::info!(
        nights = report.nights,
        supplements = report.supplements,
        "Seeded demo data"
    );
    Ok(report)
}

async fn write(
    service: &EventService,
    owner_id: &str,
    event_type: &str,
    timestamp: chrono::DateTime<Utc>,
    value: Option<(f64, &str)>,
) -> Result<()> {
    let input = CreateEventInput {
        timestamp: Some(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)),
        event_type: Some(event_type.to_string()),
        value: value.map(|(v, _)| v),
        unit: value.map(|(_, u)| u.to_string()),
    };
    service
        .create(owner_id, input)
        .await
        .with_context(|| format!("Failed to write {event_type} event at {timestamp}"))?;
    Ok(())
}
