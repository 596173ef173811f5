use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rayon::prelude::*;

use goterm::query::{EnrichmentQuery, NoProgress, TermQuery};
use goterm::{Annotation, Aspect, Evidence, Ontology, TermFinder};

const LEVELS: usize = 10;
const WIDTH: usize = 500;

fn term_id(level: usize, i: usize) -> String {
    format!("GO:{:07}", level * WIDTH + i)
}

fn ontology() -> Ontology {
    let mut terms = vec![(term_id(0, 0), vec![])];
    for level in 1..LEVELS {
        for i in 0..WIDTH {
            let parents = if level == 1 {
                vec![term_id(0, 0)]
            } else {
                vec![term_id(level - 1, i), term_id(level - 1, (i * 7 + 3) % WIDTH)]
            };
            terms.push((term_id(level, i), parents));
        }
    }
    Ontology::from_terms(terms).expect("synthetic terms are valid")
}

fn annotation(n_genes: usize) -> Annotation {
    let mut records = Vec::with_capacity(n_genes * 5);
    for gene in 0..n_genes {
        for k in 0..5 {
            let level = 1 + (gene + k) % (LEVELS - 1);
            let term = term_id(level, (gene * 13 + k * 31) % WIDTH);
            records.push((format!("gene{gene}"), term, Evidence::ALL, Aspect::PROCESS));
        }
    }
    Annotation::from_records(records).expect("synthetic records are valid")
}

fn study_sets(n_sets: usize, size: usize) -> Vec<Vec<String>> {
    (0..n_sets)
        .map(|set| (0..size).map(|i| format!("gene{}", set * 37 + i * 11)).collect())
        .collect()
}

fn queries_benchmark(c: &mut Criterion) {
    let ontology = ontology();
    let annotation = annotation(10_000);
    let finder = TermFinder::new(&ontology, &annotation);
    let sets = study_sets(8, 200);
    let no_reference: &[&str] = &[];

    let mut group = c.benchmark_group("queries");
    group.sample_size(10);

    group.bench_function("find terms", |b| {
        b.iter(|| {
            finder
                .find_terms(black_box(&sets[0]), &TermQuery::default(), &mut NoProgress)
                .expect("no progress never aborts")
                .len()
        })
    });

    group.bench_function("enrichment", |b| {
        b.iter(|| {
            finder
                .enrichment(black_box(&sets[0]), no_reference, &EnrichmentQuery::default(), &mut NoProgress)
                .expect("no progress never aborts")
                .len()
        })
    });

    group.bench_function("enrichment sequential", |b| {
        b.iter(|| {
            sets.iter()
                .map(|set| {
                    finder
                        .enrichment(set, no_reference, &EnrichmentQuery::default(), &mut NoProgress)
                        .expect("no progress never aborts")
                        .len()
                })
                .sum::<usize>()
        })
    });

    group.bench_function("enrichment parallel", |b| {
        b.iter(|| {
            sets.par_iter()
                .map(|set| {
                    finder
                        .enrichment(set, no_reference, &EnrichmentQuery::default(), &mut NoProgress)
                        .expect("no progress never aborts")
                        .len()
                })
                .sum::<usize>()
        })
    });
    group.finish();
}

criterion_group!(enrichment, queries_benchmark);
criterion_main!(enrichment);
