use crate::error::{Result, StoreError};
use crate::{EndpointFilter, EndpointSource};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::Mutex;
use vigia_common::types::Endpoint;

/// SQLite-backed endpoint source.
///
/// The connection is opened read-only: the endpoint table belongs to the
/// ETL pipeline and nothing in the monitor may write to it.
pub struct EndpointStore {
    conn: Mutex<Connection>,
}

impl EndpointStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::info!(path = %path.display(), "endpoint database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }

    /// Runs a diagnostic query and returns rows as display strings.
    ///
    /// Anything SQLite does not classify as a pure read is rejected with
    /// [`StoreError::OperationNotPermitted`] before execution.
    pub fn run_readonly_script(&self, sql: &str) -> Result<Vec<Vec<String>>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            if !stmt.readonly() {
                tracing::warn!(statement = sql, "rejected non-read-only statement");
                return Err(StoreError::OperationNotPermitted {
                    statement: sql.to_string(),
                });
            }
            let columns = stmt.column_count();
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Vec::with_capacity(columns);
                for i in 0..columns {
                    record.push(render_value(row.get_ref(i)?));
                }
                out.push(record);
            }
            Ok(out)
        })
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn row_to_endpoint(row: &rusqlite::Row<'_>) -> rusqlite::Result<Endpoint> {
    Ok(Endpoint {
        address: row.get(0)?,
        branch_name: row.get(1)?,
        branch_code: row.get(2)?,
        tax_id: row.get(3)?,
    })
}

impl EndpointSource for EndpointStore {
    fn list(&self, filter: &EndpointFilter) -> Result<Vec<Endpoint>> {
        self.with_conn(|conn| {
            let sql = if filter.gateway_only {
                "SELECT ip, filial, cod_filial, cnpj FROM filiais_ip
                 WHERE servidor = 1 ORDER BY cod_filial"
            } else {
                "SELECT ip, filial, cod_filial, cnpj FROM filiais_ip ORDER BY cod_filial"
            };
            let mut stmt = conn.prepare_cached(sql)?;
            let rows = stmt.query_map([], row_to_endpoint)?;
            let mut endpoints = Vec::new();
            for row in rows {
                endpoints.push(row?);
            }
            Ok(endpoints)
        })
    }

    fn find_by_address(&self, address: &str) -> Result<Vec<Endpoint>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT ip, filial, cod_filial, cnpj FROM filiais_ip
                 WHERE ip = ?1 ORDER BY cod_filial",
            )?;
            let rows = stmt.query_map([address], row_to_endpoint)?;
            let mut endpoints = Vec::new();
            for row in rows {
                endpoints.push(row?);
            }
            Ok(endpoints)
        })
    }
}
