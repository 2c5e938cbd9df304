use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::warn;

use crate::time::now_millis;
use crate::BatchItem;
use crate::Error;
use crate::Key;
use crate::Observer;
use crate::ObserverError;
use crate::Operation;
use crate::Result;

/// Receives write failures of a [`CsvObserver`]: operation, key, value (puts
/// only) and the failure.
pub type CsvErrorHandler =
    Box<dyn Fn(Operation, &Key, Option<&[u8]>, &ObserverError) + Send + Sync>;

/// Audit trail of every write as CSV rows: `op, unix millis, key, hex(value)`.
///
/// Deletes leave the value column empty. The sink is flushed after each single
/// write and once after each batch. Failures go to the error handler when one
/// is set, otherwise they are logged; a failed batch flush is reported once per
/// row of the batch.
pub struct CsvObserver<W: Write + Send + 'static> {
    name: String,
    writer: Mutex<csv::Writer<W>>,
    on_err: Option<CsvErrorHandler>,
}

impl<W: Write + Send + 'static> std::fmt::Debug for CsvObserver<W> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CsvObserver").field("name", &self.name).finish()
    }
}

impl CsvObserver<File> {
    /// Appends to the file at `path`, creating it when missing.
    pub fn create(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(name, file))
    }
}

impl<W: Write + Send + 'static> CsvObserver<W> {
    pub fn new(
        name: impl Into<String>,
        sink: W,
    ) -> Self {
        CsvObserver {
            name: name.into(),
            writer: Mutex::new(
                csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(sink),
            ),
            on_err: None,
        }
    }

    pub fn with_error_handler(
        mut self,
        on_err: CsvErrorHandler,
    ) -> Self {
        self.on_err = Some(on_err);
        self
    }

    fn report(
        &self,
        op: Operation,
        key: &Key,
        value: Option<&[u8]>,
        err: ObserverError,
    ) {
        match &self.on_err {
            Some(on_err) => on_err(op, key, value, &err),
            None => warn!("{}", err),
        }
    }

    fn write_row(
        &self,
        writer: &mut csv::Writer<W>,
        op: Operation,
        millis: &str,
        key: &Key,
        value: Option<&[u8]>,
        context: impl FnOnce() -> String,
    ) -> bool {
        let hex_value = value.map(hex::encode).unwrap_or_default();
        match writer.write_record([op.as_str(), millis, key.as_str(), hex_value.as_str()]) {
            Ok(()) => true,
            Err(source) => {
                self.report(
                    op,
                    key,
                    value,
                    ObserverError::Write {
                        name: self.name.clone(),
                        context: context(),
                        source,
                    },
                );
                false
            }
        }
    }

    fn write_single(
        &self,
        op: Operation,
        key: &Key,
        value: Option<&[u8]>,
    ) {
        let millis = now_millis().to_string();
        let mut writer = self.writer.lock();
        if !self.write_row(&mut writer, op, &millis, key, value, || {
            format!("{} entry", op)
        }) {
            return;
        }
        if let Err(source) = writer.flush() {
            self.report(
                op,
                key,
                value,
                ObserverError::Flush {
                    name: self.name.clone(),
                    source,
                },
            );
        }
    }
}

impl<W: Write + Send + 'static> Observer for CsvObserver<W> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn on_put(
        &self,
        key: &Key,
        value: &Bytes,
    ) {
        self.write_single(Operation::Put, key, Some(&value[..]));
    }

    fn on_delete(
        &self,
        key: &Key,
    ) {
        self.write_single(Operation::Delete, key, None);
    }

    fn on_batch(
        &self,
        puts: &[BatchItem],
        deletes: &[Key],
    ) {
        let millis = now_millis().to_string();
        let mut writer = self.writer.lock();
        for (i, item) in puts.iter().enumerate() {
            self.write_row(
                &mut writer,
                Operation::Put,
                &millis,
                &item.key,
                Some(&item.value[..]),
                || format!("batch put entry {}", i),
            );
        }
        for (i, key) in deletes.iter().enumerate() {
            self.write_row(&mut writer, Operation::Delete, &millis, key, None, || {
                format!("batch delete entry {}", i)
            });
        }
        if let Err(e) = writer.flush() {
            // none of the rows is known to have reached the sink
            let reason = e.to_string();
            let failed = puts
                .iter()
                .map(|item| (Operation::Put, &item.key, Some(&item.value[..])))
                .chain(deletes.iter().map(|key| (Operation::Delete, key, None)));
            for (op, key, value) in failed {
                let source = std::io::Error::new(e.kind(), reason.clone());
                self.report(
                    op,
                    key,
                    value,
                    ObserverError::Flush {
                        name: self.name.clone(),
                        source,
                    },
                );
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush().map_err(|source| {
            Error::from(ObserverError::Flush {
                name: self.name.clone(),
                source,
            })
        })
    }
}
