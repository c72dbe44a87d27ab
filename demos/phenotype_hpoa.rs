//! Runs QC on a folder of small files and writes `phenotype.hpoa`
//!
//! cargo run --example phenotype_hpoa -- tests/small.obo tests/smallfiles phenotype.hpoa

use chrono::Local;
use tracing_subscriber::EnvFilter;

use hpoa_qc::{BigFile, ObsoleteIdPolicy, Ontology, QcConfig, SmallFileIngestor};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hpoa_qc=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        println!("Usage: phenotype_hpoa <hp.obo> <small file folder> <output> [--replace-obsolete]");
        return;
    }

    let ontology = Ontology::from_obo(&args[1]).unwrap();
    println!("Ontology with {} terms", ontology.len());

    let mut config = QcConfig::default();
    if args.iter().any(|arg| arg == "--replace-obsolete") {
        config = config.with_obsolete_ids(ObsoleteIdPolicy::Replace);
    }

    let ingestion = match SmallFileIngestor::new(&ontology, &config).ingest(&args[2]) {
        Ok(ingestion) => ingestion,
        Err(err) => {
            println!("Error: {err}, see {}", config.error_report().display());
            return;
        }
    };
    let summary = ingestion.summary();
    println!(
        "Parsed {} of {} small files ({} omitted)",
        summary.parsed, summary.files_found, summary.omitted
    );

    let mut bigfile = BigFile::new(&ontology, &config, Local::now().date_naive());
    bigfile.add_hpo_models(ingestion.into_models());
    match bigfile.write_to_file(&args[3]) {
        Ok(summary) => println!("Wrote {} annotations to {}", summary.hpo_rows, args[3]),
        Err(err) => println!("Error: {err}, see {}", config.error_report().display()),
    }
}
