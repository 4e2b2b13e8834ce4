use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tomb_compiler::Lexer;

const CONTRACT: &str = r#"struct Offer { seller: address; price: number; }

contract market {
    import Runtime;
    import Map;

    const FEE: number = 5;

    global owner: address;
    global offers: storage_map<number, Offer>;

    event Listed: number = "{address} listed {data}";

    constructor(creator: address) {
        owner = creator;
    }

    public list(from: address, id: number, price: number) {
        Runtime.expect(Runtime.isWitness(from), "witness failed");
        local offer: Offer = Struct.Offer(from, price);
        offers.set(id, offer);
        emit Listed(from, id);
    }

    public fee(price: number): number {
        return price * FEE / 100;
    }
}
"#;

fn bench_keywords(c: &mut Criterion) {
    let source = "contract token script description global const local if else while do for switch";

    c.bench_function("lex_keywords", |b| {
        b.iter(|| Lexer::process(black_box(source)));
    });
}

fn bench_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("literals");

    let numbers = "42 123 0 999 1000000 1.5 0.001";
    group.bench_with_input(BenchmarkId::new("numbers", "mixed"), &numbers, |b, source| {
        b.iter(|| Lexer::process(black_box(source)));
    });

    let bytes = "0xFF 0x1234 0xDEADBEEF";
    group.bench_with_input(BenchmarkId::new("bytes", "various"), &bytes, |b, source| {
        b.iter(|| Lexer::process(black_box(source)));
    });

    let strings = r#""hello" "world" "{address} sent {data}""#;
    group.bench_with_input(BenchmarkId::new("strings", "3 strings"), &strings, |b, source| {
        b.iter(|| Lexer::process(black_box(source)));
    });

    group.finish();
}

fn bench_contract(c: &mut Criterion) {
    let mut group = c.benchmark_group("contract");

    for copies in [1usize, 10, 100] {
        let source = CONTRACT.repeat(copies);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("market", copies), &source, |b, source| {
            b.iter(|| Lexer::process(black_box(source)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_keywords, bench_literals, bench_contract);
criterion_main!(benches);
