use criterion::{criterion_group, criterion_main, Criterion};
use engine::tokenizer::{tokenize, Stopwords};

fn bench_tokenize(c: &mut Criterion) {
    let stopwords = Stopwords::none();
    let text = "El campe&#243n defendi&#243 su t&#237tulo en la final, \
                ver http://ejemplo.com/cronica y la entrada abc123 del 42."
        .repeat(200);
    c.bench_function("tokenize_document", |b| b.iter(|| tokenize(&text, &stopwords)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
