use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The CSV tables of the data directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Peers,
    Summaries,
    Payments,
}

impl Table {
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Peers => "peers.csv",
            Table::Summaries => "summaries.csv",
            Table::Payments => "payments.csv",
        }
    }

    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Table::Peers => &["id", "nickname", "role", "gerente", "superintendente", "diretor"],
            Table::Summaries => &[
                "id",
                "user_id",
                "created_at",
                "sales_count",
                "sales_volume",
                "commission_due",
            ],
            Table::Payments => &["id", "user_id", "paid_at", "amount", "description"],
        }
    }
}

/// CsvConnection owns the data directory and the file handling for every table
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open a data directory, creating it if it doesn't exist
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {:?}", base_path))?;
            info!("Created data directory {:?}", base_path);
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn table_path(&self, table: Table) -> PathBuf {
        self.base_directory.join(table.file_name())
    }

    /// Ensure a table file exists with its header
    pub fn ensure_table_exists(&self, table: Table) -> Result<()> {
        let path = self.table_path(table);
        if !path.exists() {
            let header = format!("{}\n", table.header().join(","));
            fs::write(&path, header).with_context(|| format!("Failed to create {:?}", path))?;
            debug!("Created empty table {:?}", path);
        }
        Ok(())
    }

    /// Read every row of a table
    pub fn read_rows<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>> {
        self.ensure_table_exists(table)?;

        let path = self.table_path(table);
        let file = File::open(&path).with_context(|| format!("Failed to open {:?}", path))?;
        let mut reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::All)
            .from_reader(BufReader::new(file));

        let mut rows = Vec::new();
        for (index, result) in reader.deserialize().enumerate() {
            // +2: header line and 1-based numbering
            let row: T = result.with_context(|| {
                format!("Malformed row at line {} of {}", index + 2, table.file_name())
            })?;
            rows.push(row);
        }

        debug!("Read {} rows from {}", rows.len(), table.file_name());
        Ok(rows)
    }

    /// Replace a table's contents with `rows`
    pub fn write_rows<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<()> {
        let path = self.table_path(table);
        let temp_path = path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = ::csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(BufWriter::new(file));

            writer.write_record(table.header())?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, &path)?;
        debug!("Wrote {} rows to {}", rows.len(), table.file_name());
        Ok(())
    }
}
