use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;

use rb_graph::BulgeGraph;

pub fn graph_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("BulgeGraph");

    // A repeated multiloop pattern, roughly the size of a large rRNA.
    let unit = "((..((...))..((...))..))..";
    let structure: String = unit.repeat(100);

    group.bench_function("Build the element graph of a dot-bracket string.", |b| {
        b.iter(|| {
            let _ = BulgeGraph::from_dotbracket(&structure).unwrap();
        });
    });
}

criterion_group!(benches, graph_construction);
criterion_main!(benches);
