// Criterion benchmarks for PropMate

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use propmate::core::{quick_search, scoring::calculate_match_score, Matcher};
use propmate::models::{Client, Property, ScoringWeights};
use serde_json::json;

const AREAS: [&str; 5] = ["Bandra West", "Andheri East", "Powai", "Juhu", "Thane"];
const BHKS: [&str; 3] = ["1BHK", "2BHK", "3BHK"];

fn create_property(id: usize) -> Property {
    let transaction_type = if id % 4 == 0 { "Sale" } else { "Rent" };
    let furnishing = if id % 2 == 0 { "Semi" } else { "Fully" };
    let price = 20000 + (id % 60) as u64 * 1000;

    serde_json::from_value(json!({
        "id": id.to_string(),
        "title": format!("Listing {}", id),
        "transactionType": transaction_type,
        "price": price,
        "bhk": BHKS[id % BHKS.len()],
        "furnishing": furnishing,
        "bachelorsAllowed": id % 3 == 0,
        "location": { "area": AREAS[id % AREAS.len()], "city": "Mumbai" }
    }))
    .unwrap()
}

fn create_client() -> Client {
    serde_json::from_value(json!({
        "id": "bench-client",
        "name": "Bench Client",
        "phone": "9000000000",
        "maritalStatus": "Bachelor",
        "requirement": "Rent",
        "preferredAreas": ["Bandra", "Juhu"],
        "preferredCity": "Pune",
        "bhkPreference": ["2BHK", "3BHK"],
        "furnishingPreference": ["Semi"],
        "budgetMin": 30000,
        "budgetMax": 55000
    }))
    .unwrap()
}

fn bench_score_pair(c: &mut Criterion) {
    let property = create_property(7);
    let client = create_client();
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| {
            calculate_match_score(black_box(&property), black_box(&client), black_box(&weights))
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let client = create_client();

    let mut group = c.benchmark_group("ranking");

    for property_count in [10, 100, 1000].iter() {
        let properties: Vec<Property> = (0..*property_count).map(create_property).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", property_count),
            property_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank(black_box(&client), black_box(&properties), black_box(Some(50)))
                });
            },
        );
    }

    group.finish();
}

fn bench_quick_search(c: &mut Criterion) {
    let properties: Vec<Property> = (0..1000).map(create_property).collect();
    let clients = vec![create_client()];

    c.bench_function("quick_search_1000_properties", |b| {
        b.iter(|| quick_search(black_box("powai"), black_box(&properties), black_box(&clients)));
    });
}

criterion_group!(benches, bench_score_pair, bench_ranking, bench_quick_search);

criterion_main!(benches);
