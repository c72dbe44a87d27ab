use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hpoa_qc::{AnnotationMerger, AnnotationModel, Ontology, QcConfig, SourceFormat, Validator};

const PHENOTYPES: [(&str, &str); 4] = [
    ("HP:0001250", "Seizure"),
    ("HP:0004322", "Short stature"),
    ("HP:0002373", "Febrile seizure"),
    ("HP:0006315", "Single median maxillary incisor"),
];

fn model(ontology: &Ontology, config: &QcConfig, times: usize) -> AnnotationModel {
    let validator = Validator::new(ontology, config);
    let entries = (0..times)
        .map(|idx| {
            let (id, label) = PHENOTYPES[idx % PHENOTYPES.len()];
            let line = format!(
                "OMIM:100050\tAarskog syndrome\t{id}\t{label}\t\t\t{}/{}\t\t\t\t\tPMID:{}\tPCS\tHPO:probinson[2013-01-09]",
                idx % 5,
                5 + idx % 3,
                idx + 1
            );
            validator
                .parse_line(&line, Some(idx + 2), SourceFormat::HpoProject)
                .unwrap()
        })
        .collect();
    AnnotationModel::new("OMIM-100050.tab".to_string(), SourceFormat::HpoProject, entries)
}

fn merge_benchmark(c: &mut Criterion) {
    let ontology = Ontology::from_obo("tests/small.obo").unwrap();
    let config = QcConfig::default();
    let merger = AnnotationMerger::new(&ontology, &config);
    let small = model(&ontology, &config, 20);
    let large = model(&ontology, &config, 2000);

    c.bench_function("merge-model 20", |b| {
        b.iter(|| merger.merge_model(black_box(&small)))
    });
    c.bench_function("merge-model 2000", |b| {
        b.iter(|| merger.merge_model(black_box(&large)))
    });
}

fn validate_benchmark(c: &mut Criterion) {
    let ontology = Ontology::from_obo("tests/small.obo").unwrap();
    let config = QcConfig::default();

    c.bench_function("validate 500 lines", |b| {
        b.iter(|| model(black_box(&ontology), &config, black_box(500)))
    });
}

criterion_group!(merge, merge_benchmark, validate_benchmark);
criterion_main!(merge);
