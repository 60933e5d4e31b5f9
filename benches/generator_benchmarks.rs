use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uuid::Uuid;

use caroption_catalog::entities::{catalog_entity, product, StringList};
use caroption_catalog::services::generator::{
    check_plan_collisions, merge_keywords, merge_price, plan_generation,
};

fn base(i: usize) -> product::Model {
    let now = Utc::now();
    product::Model {
        id: Uuid::new_v4(),
        name: format!("Accessory {}", i),
        description: Some("Fits most cabins".to_string()),
        info: None,
        price: Some((100 + i).to_string()),
        count: Some("10".to_string()),
        position: None,
        code: None,
        category_id: None,
        brand_id: None,
        entity_id: None,
        image_id: None,
        slug: Some(format!("accessory-{}", i)),
        keywords: StringList::from(["interior", "universal"]),
        generatable: true,
        generated: false,
        show: true,
        base_product_id: None,
        generator_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn generator(i: usize, parent: Uuid) -> catalog_entity::Model {
    let now = Utc::now();
    catalog_entity::Model {
        id: Uuid::new_v4(),
        name: format!("Model {}", i),
        parent_id: Some(parent),
        description: Some("Sedan".to_string()),
        priority: None,
        image_id: None,
        entity_slug: Some(format!("model-{}", i)),
        show: true,
        keywords: StringList::from(["sedan", "universal"]),
        price: Some("50".to_string()),
        created_at: now,
        updated_at: now,
    }
}

fn plan_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_generation");
    let parent = Uuid::new_v4();

    for (bases, generators) in [(10, 10), (50, 40), (200, 100)] {
        let bases: Vec<_> = (0..bases).map(base).collect();
        let generators: Vec<_> = (0..generators).map(|i| generator(i, parent)).collect();
        let label = format!("{}x{}", bases.len(), generators.len());

        group.bench_with_input(BenchmarkId::from_parameter(label), &(), |b, _| {
            b.iter(|| {
                let plan = plan_generation(black_box(&bases), black_box(&generators));
                check_plan_collisions(&plan).is_ok()
            });
        });
    }

    group.finish();
}

fn merge_benchmark(c: &mut Criterion) {
    let base_keywords: StringList = (0..20).map(|i| format!("kw{}", i)).collect();
    let generator_keywords: StringList = (10..30).map(|i| format!("kw{}", i)).collect();

    c.bench_function("merge_keywords", |b| {
        b.iter(|| merge_keywords(black_box(&base_keywords), black_box(&generator_keywords)))
    });

    c.bench_function("merge_price", |b| {
        b.iter(|| merge_price(black_box(Some("1250000")), black_box(Some("abc"))))
    });
}

criterion_group!(benches, plan_benchmark, merge_benchmark);
criterion_main!(benches);
