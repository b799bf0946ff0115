use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use rust_decimal::Decimal;

use finapi_core::{Amount, StatementId, UserId};
use finapi_statements::{Balance, Statement, StatementType, fold_balance};

/// History mixing deposits, withdrawals and transfers in both directions.
fn history(user: UserId, peer: UserId, count: usize) -> Vec<Statement> {
    (0..count)
        .map(|i| {
            let (kind, user_id, sender_id) = match i % 4 {
                0 => (StatementType::Deposit, user, None),
                1 => (StatementType::Withdraw, user, None),
                2 => (StatementType::Transfer, peer, Some(user)),
                _ => (StatementType::Transfer, user, Some(peer)),
            };
            Statement {
                id: StatementId::new(),
                user_id,
                sender_id,
                kind,
                amount: Amount::new(Decimal::new(1 + i as i64, 2)).unwrap(),
                description: "bench".to_string(),
                created_at: Utc::now(),
            }
        })
        .collect()
}

fn bench_balance_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance_fold");

    for count in [10usize, 100, 1000, 10000].iter() {
        let user = UserId::new();
        let statements = history(user, UserId::new(), *count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("fold_balance", count), &statements, |b, s| {
            b.iter(|| fold_balance(black_box(user), black_box(s)));
        });
        group.bench_with_input(BenchmarkId::new("balance_report", count), &statements, |b, s| {
            b.iter(|| Balance::from_statements(black_box(user), black_box(s.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_balance_fold);
criterion_main!(benches);
