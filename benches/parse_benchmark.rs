use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use libldraw::{MemoryResolver, ParseConfig, Scene};

const LDCONFIG: &str = "\
0 !COLOUR Black CODE 0 VALUE #1B2A34 EDGE #2B4354
0 !COLOUR Red CODE 4 VALUE #B40000 EDGE #333333
0 !COLOUR Main_Colour CODE 16 VALUE #FFFF80 EDGE #333333
0 !COLOUR Edge_Colour CODE 24 VALUE #7F7F7F EDGE #333333
";

/// Generate a part with a grid of `quads` quad faces plus outline edges.
fn generate_part(quads: usize) -> String {
    let mut part = String::from("0 Generated plate\n0 Name: bench.dat\n0 !LDRAW_ORG Part\n");
    for i in 0..quads {
        let x = (i % 100) as f64;
        let z = (i / 100) as f64;
        part.push_str(&format!(
            "4 16 {x} 0 {z} {x1} 0 {z} {x1} 0 {z1} {x} 0 {z1}\n",
            x = x,
            x1 = x + 1.0,
            z = z,
            z1 = z + 1.0,
        ));
        part.push_str(&format!("2 24 {} 0 {} {} 0 {}\n", x, z, x + 1.0, z));
    }
    part
}

/// Generate a model instancing `bench.dat` `instances` times in two colors.
fn generate_model(instances: usize) -> String {
    let mut model = String::from("0 Generated model\n0 Name: bench.ldr\n");
    for i in 0..instances {
        let color = if i % 2 == 0 { 4 } else { 0 };
        model.push_str(&format!(
            "1 {} {} 0 0 1 0 0 0 1 0 0 0 1 bench.dat\n",
            color,
            (i * 20) as f64
        ));
    }
    model
}

fn library(quads: usize, instances: usize) -> MemoryResolver {
    let mut resolver = MemoryResolver::new();
    resolver.insert("LDConfig.ldr", LDCONFIG);
    resolver.insert("bench.dat", generate_part(quads));
    resolver.insert("bench.ldr", generate_model(instances));
    resolver
}

fn bench_parse_part(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_part");

    for &quads in &[100usize, 1_000, 5_000] {
        let resolver = library(quads, 1);
        group.bench_with_input(BenchmarkId::new("quads", quads), &quads, |b, _| {
            b.iter(|| {
                black_box(
                    Scene::from_resolver("bench.ldr", &resolver, ParseConfig::new()).unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_instancing(c: &mut Criterion) {
    let mut group = c.benchmark_group("instancing");

    // many instances of one cached part; composition happens twice (two
    // colors) regardless of the instance count
    for &instances in &[10usize, 100, 1_000] {
        let resolver = library(500, instances);
        group.bench_with_input(
            BenchmarkId::new("instances", instances),
            &instances,
            |b, _| {
                b.iter(|| {
                    black_box(
                        Scene::from_resolver("bench.ldr", &resolver, ParseConfig::new()).unwrap(),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_welding(c: &mut Criterion) {
    let mut group = c.benchmark_group("welding");

    for &quads in &[1_000usize, 5_000] {
        let resolver = library(quads, 1);
        let config = ParseConfig::new().with_remove_doubles(0.01);
        group.bench_with_input(BenchmarkId::new("quads", quads), &quads, |b, _| {
            b.iter(|| {
                black_box(
                    Scene::from_resolver("bench.ldr", &resolver, config.clone()).unwrap(),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_part, bench_instancing, bench_welding);
criterion_main!(benches);
