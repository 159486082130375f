//! Reader and inference benchmarks.
//!
//! Measures the first pass (streaming records and inferring column types)
//! across file sizes and column counts.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use infile::{Dialect, RecordReader, SchemaInferencer};
use std::io::Write;
use tempfile::NamedTempFile;

/// Generate CSV data with the given number of rows and columns.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    for i in 0..cols {
        if i > 0 {
            data.push(',');
        }
        data.push_str(&format!("column_{}", i + 1));
    }
    data.push('\n');

    for row in 0..rows {
        for col in 0..cols {
            if col > 0 {
                data.push(',');
            }
            match col % 4 {
                0 => data.push_str(&format!("ID_{:06}", row)),
                1 => data.push_str(&format!("{:.2}", row as f64 * 1.5)),
                2 => data.push_str(&format!("\"Name, {}\"", row % 97)),
                3 => data.push_str(&"lorem ipsum ".repeat(row % 30)),
                _ => unreachable!(),
            }
        }
        data.push('\n');
    }

    data
}

fn temp_csv(data: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    temp
}

/// Benchmark streaming every record of a file.
fn bench_read_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_records");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);
        let file = temp_csv(&data);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &file, |b, file| {
            b.iter(|| {
                let reader = RecordReader::open(file.path(), Dialect::default()).unwrap();
                black_box(reader.map(|r| r.unwrap()).count())
            })
        });
    }

    group.finish();
}

/// Benchmark the full inference pass.
fn bench_infer(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer");
    let inferencer = SchemaInferencer::default();

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 10);
        let file = temp_csv(&data);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &file, |b, file| {
            b.iter(|| black_box(inferencer.infer_file(file.path(), "CS_bench", None).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark inference with varying column counts.
fn bench_infer_column_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("infer_column_scaling");
    let inferencer = SchemaInferencer::default();

    let rows = 1_000;
    for cols in [5, 10, 20, 50].iter() {
        let data = generate_csv_data(rows, *cols);
        let file = temp_csv(&data);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("cols", cols), &file, |b, file| {
            b.iter(|| black_box(inferencer.infer_file(file.path(), "CS_bench", None).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_read_records,
    bench_infer,
    bench_infer_column_scaling,
);
criterion_main!(benches);
