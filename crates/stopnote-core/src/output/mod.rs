//! Output sinks for processed delivery notes.
//!
//! Every document produces three files named after its stem:
//! `txt/<stem>.txt`, `json/<stem>.json` and `csv/<stem>.csv`. Directories are
//! created on demand and existing files are overwritten.

pub mod tabular;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::models::record::DeliveryRecord;

/// Paths written for one record.
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub text: PathBuf,
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// File sinks below one output root.
#[derive(Debug, Clone)]
pub struct OutputSinks {
    root: PathBuf,
}

impl OutputSinks {
    /// Sinks writing below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn text_path(&self, stem: &str) -> PathBuf {
        self.root.join("txt").join(format!("{stem}.txt"))
    }

    pub fn json_path(&self, stem: &str) -> PathBuf {
        self.root.join("json").join(format!("{stem}.json"))
    }

    pub fn csv_path(&self, stem: &str) -> PathBuf {
        self.root.join("csv").join(format!("{stem}.csv"))
    }

    /// Write the normalized page text.
    pub fn write_text(&self, stem: &str, text: &str) -> Result<PathBuf> {
        let path = self.text_path(stem);
        ensure_parent(&path)?;
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Write the structured record as pretty-printed JSON.
    pub fn write_json(&self, record: &DeliveryRecord) -> Result<PathBuf> {
        let path = self.json_path(&record.stem());
        ensure_parent(&path)?;
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.flush()?;
        Ok(path)
    }

    /// Write the tabular row with header.
    pub fn write_csv(&self, record: &DeliveryRecord) -> Result<PathBuf> {
        let path = self.csv_path(&record.stem());
        ensure_parent(&path)?;
        let file = File::create(&path)?;
        tabular::write_row(BufWriter::new(file), record)?;
        Ok(path)
    }

    /// Write all three sinks for `record`.
    pub fn write_all(&self, record: &DeliveryRecord, full_text: &str) -> Result<WrittenFiles> {
        let written = WrittenFiles {
            text: self.write_text(&record.stem(), full_text)?,
            json: self.write_json(record)?,
            csv: self.write_csv(record)?,
        };
        debug!("Wrote outputs for {} below {}", record.stem(), self.root.display());
        Ok(written)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
