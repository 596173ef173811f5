use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use goterm::Ontology;

/// A layered ontology with `width` terms per level, each with two parents
fn synthetic_terms(levels: usize, width: usize) -> Vec<(String, Vec<String>)> {
    let mut terms = vec![("GO:0000000".to_string(), vec![])];
    for level in 1..levels {
        for i in 0..width {
            let id = format!("GO:{:07}", level * width + i);
            let parents = if level == 1 {
                vec!["GO:0000000".to_string()]
            } else {
                let previous = (level - 1) * width;
                vec![
                    format!("GO:{:07}", previous + i),
                    format!("GO:{:07}", previous + (i + 1) % width),
                ]
            };
            terms.push((id, parents));
        }
    }
    terms
}

fn build_ontology_benchmark(c: &mut Criterion) {
    let terms = synthetic_terms(15, 2_000);
    c.bench_function("build ontology", |b| {
        b.iter(|| {
            Ontology::from_terms(black_box(terms.clone()))
                .expect("synthetic terms are valid")
                .len()
        })
    });
}

fn ancestors_benchmark(c: &mut Criterion) {
    let ontology = Ontology::from_terms(synthetic_terms(15, 2_000)).expect("synthetic terms are valid");
    let leaves: Vec<_> = ontology.terms().skip(ontology.len() - 500).collect();
    c.bench_function("ancestors", |b| {
        b.iter(|| {
            leaves
                .iter()
                .map(|term| black_box(term.ancestor_ids()).len())
                .sum::<usize>()
        })
    });
}

criterion_group! {
    name = ontology;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = build_ontology_benchmark, ancestors_benchmark
}
criterion_main!(ontology);
