use std::fmt::Write as _;
use std::time::Duration;

use biom_parse::{
    direct_parse_key, direct_slice_data, parse_classic_table, Axis, ClassicTableOptions,
    ElementType,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::Value;

fn make_document(observations: usize, samples: usize) -> String {
    let mut doc = String::from("{\n  \"id\": null,\n  \"format\": \"Biological Observation Matrix 1.0.0\",\n");
    doc.push_str("  \"generated_by\": \"bench\",\n  \"rows\": [");
    for row in 0..observations {
        if row > 0 {
            doc.push(',');
        }
        let _ = write!(
            doc,
            "\n    {{\"id\": \"OTU_{row}\", \"metadata\": {{\"taxonomy\": [\"k__Bacteria\", \"p__{}\"]}}}}",
            row % 17
        );
    }
    doc.push_str("\n  ],\n  \"columns\": [");
    for col in 0..samples {
        if col > 0 {
            doc.push(',');
        }
        let _ = write!(doc, "\n    {{\"id\": \"S{col}\", \"metadata\": null}}");
    }
    let _ = write!(
        doc,
        "\n  ],\n  \"matrix_type\": \"sparse\",\n  \"matrix_element_type\": \"int\",\n  \"shape\": [{observations}, {samples}],\n  \"data\": ["
    );
    let mut first = true;
    for row in 0..observations {
        for col in (row % 3..samples).step_by(3) {
            if !first {
                doc.push_str(",\n    ");
            }
            first = false;
            let _ = write!(doc, "[{row},{col},{}]", (row * 7 + col) % 50 + 1);
        }
    }
    doc.push_str("]\n}\n");
    doc
}

fn make_classic_table(observations: usize, samples: usize) -> String {
    let mut text = String::from("# Constructed from biom file\n#OTU ID");
    for col in 0..samples {
        let _ = write!(text, "\tS{col}");
    }
    text.push_str("\ttaxonomy\n");
    for row in 0..observations {
        let _ = write!(text, "OTU_{row}");
        for col in 0..samples {
            let _ = write!(text, "\t{}", (row * 7 + col) % 50);
        }
        let _ = writeln!(text, "\tk__Bacteria; p__{}", row % 17);
    }
    text
}

fn criterion_config() -> Criterion {
    if std::env::var("BIOM_BENCH_MINIMAL").is_ok() {
        Criterion::default()
            .warm_up_time(Duration::from_secs(0))
            .measurement_time(Duration::from_millis(10))
            .sample_size(1)
            .nresamples(1)
    } else {
        Criterion::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let doc = make_document(2000, 60);

    let mut group = c.benchmark_group("parse_key");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    for key in ["generated_by", "shape", "columns"] {
        group.bench_with_input(BenchmarkId::new("direct", key), key, |b, key| {
            b.iter(|| black_box(direct_parse_key(black_box(&doc), key).unwrap()));
        });
    }
    group.bench_function("serde_json/full", |b| {
        b.iter(|| {
            let value: Value = serde_json::from_str(black_box(&doc)).unwrap();
            black_box(value);
        });
    });
    group.finish();

    let samples_keep: Vec<usize> = (0..60).rev().step_by(4).collect();
    let observations_keep: Vec<usize> = (0..2000).step_by(5).collect();
    let mut group = c.benchmark_group("slice_data");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("samples", |b| {
        b.iter(|| black_box(direct_slice_data(&doc, black_box(&samples_keep), Axis::Samples)));
    });
    group.bench_function("observations", |b| {
        b.iter(|| {
            black_box(direct_slice_data(
                &doc,
                black_box(&observations_keep),
                Axis::Observations,
            ))
        });
    });
    group.finish();

    let classic = make_classic_table(2000, 60);
    let options = ClassicTableOptions::new().with_element_type(ElementType::Int);
    let mut group = c.benchmark_group("classic_table");
    group.throughput(Throughput::Bytes(classic.len() as u64));
    group.bench_function("parse", |b| {
        b.iter(|| black_box(parse_classic_table(black_box(&classic).lines(), &options).unwrap()));
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
