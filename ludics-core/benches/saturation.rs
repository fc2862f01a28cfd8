use criterion::{criterion_group, criterion_main, Criterion};
use ludics_core::saturation::{maximal_cliques, CliqueLimits};
use ludics_core::{ve_plus, ve_tensor, Act, Checker, LocusPath, Path, Ve};

fn lp(raw: &str) -> LocusPath {
    LocusPath::parse(raw).unwrap()
}

/// `width` parallel branches `+0/i · -0.i/a · +0.i.a/x` with their closures
fn branching(width: usize) -> Ve {
    let mut paths = vec![Path::new(vec![Act::daimon(lp("0"))])];
    for i in 0..width {
        let a = Path::new(vec![Act::positive(lp("0"), i.to_string())]);
        let c = a.extended(Act::negative(lp(&format!("0.{i}")), "a"));
        let b = c.extended(Act::positive(lp(&format!("0.{i}.a")), "x"));
        paths.push(a.extended(Act::daimon(lp(&format!("0.{i}")))));
        paths.extend(b.with_daimon_tail());
        paths.extend([a, c, b]);
    }
    Ve::new(LocusPath::root(), paths)
}

fn bench_saturation(c: &mut Criterion) {
    let small = branching(4);
    let wide = branching(16);
    let checker = Checker::default();

    c.bench_function("report_4_branches", |b| b.iter(|| checker.report(&small)));

    c.bench_function("report_16_branches", |b| b.iter(|| checker.report(&wide)));

    c.bench_function("maximal_cliques_16_branches", |b| {
        b.iter(|| maximal_cliques(wide.paths(), &CliqueLimits::default()))
    });

    c.bench_function("fingerprint_16_branches", |b| b.iter(|| wide.fingerprint()));

    c.bench_function("plus_4x16", |b| b.iter(|| ve_plus(&small, &wide)));

    let left = Ve::new(LocusPath::root(), vec![Path::new(vec![Act::positive(lp("0"), "l"), Act::negative(lp("0.l"), "m")])]);
    let right = Ve::new(LocusPath::root(), vec![Path::new(vec![Act::negative(lp("0"), "r"), Act::positive(lp("0.r"), "s")])]);
    c.bench_function("tensor_interleavings", |b| b.iter(|| ve_tensor(&left, &right)));
}

criterion_group!(benches, bench_saturation);
criterion_main!(benches);
