use criterion::{black_box, criterion_group, criterion_main, Criterion};
use deft_expression::{funexpr, CodeGenerator, Expression};

// Weighted densities of a fundamental-measure hard-sphere functional.
fn hard_sphere_free_energy() -> Expression {
    let n = Expression::variable("n").with_type("Grid");
    let convolve = |kernel: &str| {
        let weighted = funexpr("fft", [n.clone()]).with_type("ReciprocalGrid")
            * Expression::variable(kernel);
        funexpr("ifft", [weighted]).with_type("Grid").unlazy()
    };
    let (n0, n1, n2, n3) = (convolve("w0"), convolve("w1"), convolve("w2"), convolve("w3"));
    let log_term = funexpr("log", [1.0 - &n3]).with_type("Grid");
    let phi1 = -(&n0 * &log_term);
    let phi2 = &n1 * &n2 / (1.0 - &n3);
    let phi3 = &n2 * &n2 * &n2 / (24.0 * std::f64::consts::PI * (1.0 - &n3) * (1.0 - &n3));
    Expression::variable("kT") * (phi1 + phi2 + phi3)
}

fn criterion_benchmark(c: &mut Criterion) {
    let functional = hard_sphere_free_energy();
    let generator = CodeGenerator::new();
    c.bench_function("hard sphere cse", |b| {
        b.iter(|| generator.generate(black_box(&functional)).unwrap())
    });
    c.bench_function("hard sphere derivative", |b| {
        b.iter(|| black_box(&functional).derive("kT").unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
