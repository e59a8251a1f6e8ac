//! Loading record exports from disk
//!
//! The input is the combined JSON object produced by the fetcher. Each
//! collection may be a plain array or a raw API page
//! (`{ "records": [...], "next_token": ... }`).

use crate::error::Result;
use crate::models::{BodyMeasurement, Cycle, Profile, Recovery, Scored, Sleep, Workout};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// One page of a paginated collection endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPage<T> {
    pub records: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    List(Vec<T>),
    Page(ApiPage<T>),
}

fn list_or_page<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Collection<T>>::deserialize(deserializer)? {
        Some(Collection::List(records)) => records,
        Some(Collection::Page(page)) => {
            if page.next_token.is_some() {
                warn!("Collection has more pages; only the first page was exported");
            }
            page.records
        }
        None => Vec::new(),
    })
}

/// Every collection for one fetch, plus profile data when present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyMeasurement>,
    #[serde(default, deserialize_with = "list_or_page")]
    pub sleep: Vec<Sleep>,
    #[serde(default, deserialize_with = "list_or_page")]
    pub recovery: Vec<Recovery>,
    #[serde(default, deserialize_with = "list_or_page")]
    pub workout: Vec<Workout>,
    #[serde(default, deserialize_with = "list_or_page")]
    pub cycle: Vec<Cycle>,
    /// Calendar day the export was made for
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

fn newest<T: Scored>(records: &[T]) -> Option<DateTime<Utc>> {
    records.iter().map(|r| r.created_at()).max()
}

fn created_within<T: Scored + Clone>(
    records: &[T],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<T> {
    records
        .iter()
        .filter(|r| r.created_at() > from && r.created_at() <= to)
        .cloned()
        .collect()
}

impl RecordSet {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let set: RecordSet = serde_json::from_str(json)?;
        set.log_counts();
        Ok(set)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let set: RecordSet = serde_json::from_reader(reader)?;
        set.log_counts();
        Ok(set)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading records from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn log_counts(&self) {
        info!(
            sleep = self.sleep.len(),
            recovery = self.recovery.len(),
            workout = self.workout.len(),
            cycle = self.cycle.len(),
            "Parsed record set"
        );
        if self.is_empty() {
            warn!("Record set contains no sleep, recovery, workout or cycle records");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sleep.is_empty()
            && self.recovery.is_empty()
            && self.workout.is_empty()
            && self.cycle.is_empty()
    }

    /// Reference instant for period slicing
    ///
    /// `fetched_at` when present, else the newest record, else now.
    pub fn as_of(&self) -> DateTime<Utc> {
        self.fetched_at
            .or_else(|| {
                [
                    newest(&self.sleep),
                    newest(&self.recovery),
                    newest(&self.workout),
                    newest(&self.cycle),
                ]
                .into_iter()
                .flatten()
                .max()
            })
            .unwrap_or_else(Utc::now)
    }

    /// Day label used by the daily renderers
    pub fn report_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.as_of().date_naive())
    }

    /// Copy holding only records created in `(as_of - period days, as_of]`
    ///
    /// A period reaching past the representable range keeps everything up
    /// to `as_of`.
    pub fn within_days(&self, period: u32, as_of: DateTime<Utc>) -> RecordSet {
        let from = as_of
            .checked_sub_signed(Duration::days(i64::from(period)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let sliced = RecordSet {
            profile: self.profile.clone(),
            body: self.body.clone(),
            sleep: created_within(&self.sleep, from, as_of),
            recovery: created_within(&self.recovery, from, as_of),
            workout: created_within(&self.workout, from, as_of),
            cycle: created_within(&self.cycle, from, as_of),
            date: self.date,
            fetched_at: self.fetched_at,
        };
        debug!(
            period,
            recovery = sliced.recovery.len(),
            sleep = sliced.sleep.len(),
            cycle = sliced.cycle.len(),
            "Sliced record set"
        );
        sliced
    }
}
