use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mindmap_layout::config::LayoutConfig;
use mindmap_layout::layout::compute_layout;
use mindmap_layout::parser::parse_spec_str;
use mindmap_layout::{NodeType, estimate_dimensions, layout_spec_str};
use std::hint::black_box;

fn generated_spec(branches: usize, children: usize, label_len: usize) -> String {
    let filler = "x".repeat(label_len);
    let mut out = String::from(r#"{"topic": "Benchmark topic", "children": ["#);
    for i in 0..branches {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(r#"{{"label": "Branch {i} {filler}", "children": ["#));
        for j in 0..children {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&format!(r#"{{"label": "Child {i}.{j} {filler}"}}"#));
        }
        out.push_str("]}");
    }
    out.push_str("]}");
    out
}

fn fixture(name: &str) -> &'static str {
    match name {
        "ai_overview" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/ai_overview.json"
        )),
        "cjk_labels" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/cjk_labels.json"
        )),
        "many_branches" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/many_branches.json"
        )),
        _ => panic!("unknown fixture {name}"),
    }
}

const SIZES: [(&str, usize, usize, usize); 4] = [
    ("tiny", 2, 2, 4),
    ("medium", 6, 5, 12),
    ("large", 12, 10, 24),
    ("long_labels", 8, 6, 80),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for name in ["ai_overview", "cjk_labels", "many_branches"] {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let map = parse_spec_str(black_box(data)).expect("parse failed");
                black_box(map.branches.len());
            });
        });
    }
    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure");
    for (name, text) in [
        ("ascii", "Supervised learning with labelled data"),
        ("cjk", "机器学习与深度学习的基本概念"),
        ("mixed", "Rust 所有权 Ownership & borrowing"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, data| {
            b.iter(|| black_box(estimate_dimensions(black_box(data), NodeType::Child)));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for (name, branches, children, label_len) in SIZES {
        let map = parse_spec_str(&generated_spec(branches, children, label_len))
            .expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &map, |b, map| {
            b.iter(|| {
                let layout = compute_layout(black_box(map), &config);
                black_box(layout.positions.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = LayoutConfig::default();
    for (name, branches, children, label_len) in SIZES {
        let input = generated_spec(branches, children, label_len);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let layout = layout_spec_str(black_box(data), &config);
                let json = serde_json::to_string(&layout).expect("serialize failed");
                black_box(json.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_measure, bench_layout, bench_end_to_end
);
criterion_main!(benches);
