//! SQLite access to the packet logger database.
//!
//! The collector writes two tables:
//! - `batched_packets`: one row per packet name per flush interval
//! - `packet_bound`: the direction (outgoing/incoming) of each packet name
//!
//! All reads join the two tables, so packets without a direction row are
//! never counted. Repeated `packet_bound` rows for a name count once.

use super::types::{AggregateQuery, AggregateRow, DirectionFilter, PacketEvent};
use crate::utils::error::StoreError;
use log::{debug, info};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

const CREATE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS batched_packets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        packet_name TEXT NOT NULL,
        amount INTEGER NOT NULL,
        size_bytes INTEGER NOT NULL,
        collected_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS packet_bound (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        packet_name TEXT NOT NULL,
        outgoing INTEGER NOT NULL
    );
"#;

// `packet_bound` is collapsed to one direction per packet name before the
// join. The collector appends a row on every restart, so names can repeat;
// any outgoing row makes the name outgoing.

// ?1 = bucket format, ?2 = required outgoing flag or NULL for all packets
const AGGREGATE_SQL: &str = r#"
    SELECT
        batched_packets.packet_name AS packet_name,
        SUM(batched_packets.amount) AS total_amount,
        SUM(batched_packets.amount * batched_packets.size_bytes) AS total_bytes,
        strftime(?1, datetime(batched_packets.collected_at / 1000, 'unixepoch')) AS time_period
    FROM batched_packets
    JOIN (
        SELECT packet_name, MAX(outgoing) AS outgoing
        FROM packet_bound
        GROUP BY packet_name
    ) AS bound ON batched_packets.packet_name = bound.packet_name
    WHERE (?2 IS NULL OR bound.outgoing = ?2)
    GROUP BY batched_packets.packet_name, time_period
"#;

const EVENTS_SQL: &str = r#"
    SELECT
        batched_packets.packet_name,
        batched_packets.amount,
        batched_packets.size_bytes,
        batched_packets.collected_at,
        bound.outgoing
    FROM batched_packets
    JOIN (
        SELECT packet_name, MAX(outgoing) AS outgoing
        FROM packet_bound
        GROUP BY packet_name
    ) AS bound ON batched_packets.packet_name = bound.packet_name
    WHERE (?1 IS NULL OR bound.outgoing = ?1)
    ORDER BY batched_packets.id
"#;

/// A row to insert into `batched_packets`
#[derive(Debug, Clone)]
pub struct BatchRecord {
    pub packet_name: String,
    pub amount: u64,
    pub size_bytes: u64,
    /// Epoch milliseconds
    pub collected_at: i64,
}

impl BatchRecord {
    pub fn new(packet_name: impl Into<String>, amount: u64, size_bytes: u64, collected_at: i64) -> Self {
        Self {
            packet_name: packet_name.into(),
            amount,
            size_bytes,
            collected_at,
        }
    }
}

/// Handle to a packet logger database
pub struct PacketStore {
    conn: Connection,
    location: String,
}

impl PacketStore {
    /// Open an existing database read-only
    ///
    /// # Errors
    /// * `StoreError::NotFound` - the file does not exist
    /// * `StoreError::Sqlite` - the file cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }

        debug!("Opening packet database read-only: {}", path.display());
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

        Ok(Self {
            conn,
            location: path.display().to_string(),
        })
    }

    /// Open or create a database with the collector schema (for fixtures)
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self {
            conn: Connection::open(path)?,
            location: path.display().to_string(),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database with the collector schema
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            location: ":memory:".to_string(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Create `batched_packets` and `packet_bound` if missing
    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(CREATE_SCHEMA)?;
        Ok(())
    }

    /// Record the direction of a packet name
    pub fn insert_bound(&self, packet_name: &str, outgoing: bool) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO packet_bound (packet_name, outgoing) VALUES (?1, ?2)",
            params![packet_name, outgoing],
        )?;
        Ok(())
    }

    /// Insert batch rows in a single transaction
    pub fn insert_batch(&self, records: &[BatchRecord]) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO batched_packets (packet_name, amount, size_bytes, collected_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for record in records {
                stmt.execute(params![
                    &record.packet_name,
                    record.amount as i64,
                    record.size_bytes as i64,
                    record.collected_at
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Run the grouped aggregation
    ///
    /// Rows are grouped by (packet name, bucket) and emitted in the order
    /// requested by `query.sort_by`.
    ///
    /// # Errors
    /// * `StoreError::Sqlite` - missing tables/columns or a query failure
    /// * `StoreError::InvalidValue` - a negative sum
    pub fn aggregate(&self, query: &AggregateQuery) -> Result<Vec<AggregateRow>, StoreError> {
        let sql = format!("{} {}", AGGREGATE_SQL, query.sort_by.order_clause());
        let outgoing = query.filter.outgoing_flag();

        debug!(
            "Aggregating {} buckets (filter: {}, sort: {})",
            query.granularity, query.filter, query.sort_by
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let raw = stmt
            .query_map(params![query.granularity.format(), outgoing], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(raw.len());
        for (packet_name, total_amount, total_bytes, time_period) in raw {
            rows.push(AggregateRow {
                packet_name,
                time_period,
                total_amount: non_negative("total_amount", total_amount)?,
                total_bytes: non_negative("total_bytes", total_bytes)?,
            });
        }

        info!("Query returned {} aggregate rows from {}", rows.len(), self.location);
        Ok(rows)
    }

    /// Raw joined events, in insertion order
    pub fn events(&self, filter: DirectionFilter) -> Result<Vec<PacketEvent>, StoreError> {
        let mut stmt = self.conn.prepare(EVENTS_SQL)?;
        let raw = stmt
            .query_map(params![filter.outgoing_flag()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut events = Vec::with_capacity(raw.len());
        for (packet_name, amount, size_bytes, collected_at, outgoing) in raw {
            events.push(PacketEvent {
                packet_name,
                amount: non_negative("amount", amount)?,
                size_bytes: non_negative("size_bytes", size_bytes)?,
                collected_at,
                outgoing: outgoing != 0,
            });
        }

        debug!("Loaded {} events (filter: {})", events.len(), filter);
        Ok(events)
    }
}

fn non_negative(column: &'static str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::InvalidValue { column, value })
}
