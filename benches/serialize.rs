//! Benchmarks for row serialization and delimited output.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench serialize -- embed`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatvault::config::RowWriterConfig;
use chatvault::model::{Embed, EmbedField, Message, MessageEmbed, User};
use chatvault::output::to_delimited;
use chatvault::row::{DomainValue, LogRow, RowSerializer};

use serde_json::json;

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_messages(count: usize) -> Vec<DomainValue> {
    (0..count)
        .map(|i| {
            Message {
                id: format!("{}", 1_000_000 + i),
                author: User {
                    id: if i % 2 == 0 { "7".into() } else { "8".into() },
                    ..User::default()
                },
                content: format!("Message number {}\twith a tab", i),
                tts: i % 10 == 0,
                ..Message::default()
            }
            .into()
        })
        .collect()
}

fn generate_embeds(count: usize) -> Vec<DomainValue> {
    (0..count)
        .map(|i| {
            Embed {
                embed: MessageEmbed {
                    title: Some(format!("Embed {}", i)),
                    description: Some("A longer description\nspanning lines".into()),
                    color: Some(0x00ff_aa33),
                    fields: (0..5)
                        .map(|f| EmbedField {
                            name: format!("field {}", f),
                            value: format!("value {}", f),
                            inline: f % 2 == 0,
                        })
                        .collect(),
                    ..MessageEmbed::default()
                },
                message_id: format!("{}", i),
            }
            .into()
        })
        .collect()
}

fn serialize_all(serializer: &RowSerializer, values: &[DomainValue]) -> Vec<LogRow> {
    values
        .iter()
        .map(|v| serializer.serialize("gateway", "create", v).unwrap())
        .collect()
}

// =============================================================================
// Serialization Benchmarks
// =============================================================================

fn bench_message_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_rows");
    let serializer = RowSerializer::new();

    for size in [100_usize, 1_000, 10_000] {
        let values = generate_messages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| black_box(serialize_all(&serializer, black_box(values))));
        });
    }
    group.finish();
}

fn bench_embed_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed_rows");
    let serializer = RowSerializer::new();

    for size in [100_usize, 1_000, 10_000] {
        let values = generate_embeds(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| black_box(serialize_all(&serializer, black_box(values))));
        });
    }
    group.finish();
}

fn bench_from_json(c: &mut Criterion) {
    let payload = json!({
        "id": "20", "type": 0, "name": "general", "topic": "chat",
        "position": 1, "nsfw": false, "parent_id": "19",
        "permission_overwrites": [{"id": "9", "type": 0, "allow": "1024", "deny": "0"}]
    });

    c.bench_function("from_json_channel", |b| {
        b.iter(|| DomainValue::from_json("channel", black_box(payload.clone())).unwrap());
    });
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_delimited_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("delimited_output");
    let serializer = RowSerializer::new();
    let config = RowWriterConfig::new();

    for size in [100_usize, 1_000, 10_000] {
        let rows = serialize_all(&serializer, &generate_messages(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| black_box(to_delimited(black_box(rows), &config).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_message_rows,
    bench_embed_rows,
    bench_from_json,
    bench_delimited_output,
);

criterion_main!(benches);
