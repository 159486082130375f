//! Fuzz target for the record reader and schema inference.
//!
//! Arbitrary bytes must never panic the reader. Every record it produces
//! has exactly as many values as the header has names.

#![no_main]

use infile::{Dialect, ImportError, RecordReader, SchemaInferencer};
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok(mut temp_file) = tempfile::NamedTempFile::new() else {
        return;
    };
    if temp_file.write_all(data).is_err() {
        return;
    }
    let path = temp_file.path();

    for dialect in [Dialect::default(), Dialect::default().doubled_enclosure()] {
        let Ok(mut reader) = RecordReader::open(path, dialect) else {
            return;
        };
        let width = match reader.header() {
            Ok(Some(header)) => header.len(),
            Ok(None) | Err(_) => continue,
        };

        loop {
            match reader.next_record() {
                Ok(Some(record)) => assert_eq!(record.len(), width),
                Ok(None) => break,
                Err(ImportError::SchemaMismatch { expected, actual, .. }) => {
                    assert_eq!(expected, width);
                    assert_ne!(actual, width);
                    break;
                }
                Err(_) => break,
            }
        }

        let _ = SchemaInferencer::default().infer_file(path, "CS_fuzz", None);
    }
});
