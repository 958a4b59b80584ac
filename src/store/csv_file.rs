use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ensure_unique_urls, RecordStore};
use crate::models::TrackedItem;
use crate::utils::error::AppError;

pub const HEADER: [&str; 3] = ["url", "last_checked_price", "last_checked_time"];

/// Tracked items in a `url,last_checked_price,last_checked_time` CSV file.
///
/// Empty cells mean "absent". A missing file reads as an empty record set.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fails when the store file is absent, for commands that must not treat
    /// a mistyped path as an empty record set.
    pub fn ensure_exists(&self) -> Result<(), AppError> {
        if self.path.is_file() {
            return Ok(());
        }
        Err(AppError::Store(format!(
            "{} does not exist; add an item first or check the store path",
            self.path.display()
        )))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> Result<Vec<TrackedItem>, AppError> {
        if !self.path.exists() {
            tracing::warn!("Record store {} does not exist; treating it as empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AppError::Store(format!("{}: missing '{}' column", self.path.display(), name)))
        };
        let url_col = column(HEADER[0])?;
        let price_col = column(HEADER[1])?;
        let time_col = column(HEADER[2])?;

        let mut items = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1
            let line = index + 2;
            let cell = |col: usize| record.get(col).filter(|v| !v.is_empty());

            let url = cell(url_col)
                .ok_or_else(|| AppError::Store(format!("{}:{}: empty url", self.path.display(), line)))?;

            let last_checked_price = cell(price_col)
                .map(|v| {
                    v.parse::<u64>().map_err(|_| {
                        AppError::Store(format!("{}:{}: invalid price '{}'", self.path.display(), line, v))
                    })
                })
                .transpose()?;

            let last_checked_time = cell(time_col)
                .map(|v| {
                    parse_timestamp(v).ok_or_else(|| {
                        AppError::Store(format!("{}:{}: invalid timestamp '{}'", self.path.display(), line, v))
                    })
                })
                .transpose()?;

            items.push(TrackedItem {
                url: url.to_string(),
                last_checked_price,
                last_checked_time,
            });
        }

        ensure_unique_urls(&items)?;
        Ok(items)
    }

    fn save(&self, items: &[TrackedItem]) -> Result<(), AppError> {
        ensure_unique_urls(items)?;

        let temp_path = self.temp_path();
        {
            let mut writer = csv::Writer::from_path(&temp_path)?;
            writer.write_record(HEADER)?;
            for item in items {
                let price = item.last_checked_price.map(|p| p.to_string()).unwrap_or_default();
                let time = item.last_checked_time.map(|t| t.to_rfc3339()).unwrap_or_default();
                writer.write_record([item.url.as_str(), price.as_str(), time.as_str()])?;
            }
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        // Rename over the target so readers never see a half-written file
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// RFC 3339, or a naive ISO-8601 timestamp taken as local time.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
