use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use gonogo_analysis::{Evaluator, SessionReport};
use gonogo_core::{Sex, SessionProfile, StimulusCategory, TrialResult};

fn session(rounds: usize) -> Vec<TrialResult> {
    (0..rounds)
        .map(|i| {
            if i % 10 < 3 {
                TrialResult::timed_out(i, StimulusCategory::NoGo)
            } else {
                // Spread of plausible, anticipatory and very slow presses.
                let rt = 80.0 + ((i * 7919) % 1400) as f64;
                TrialResult::pressed(i, StimulusCategory::Go, rt)
            }
        })
        .collect()
}

pub fn bench_evaluate(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate");
    let evaluator = Evaluator::default();
    let profile = SessionProfile::new(55, Sex::Female).unwrap();

    for rounds in [20usize, 200, 2000] {
        g.bench_function(format!("report_{rounds}"), |b| {
            b.iter_batched(
                || session(rounds),
                |results| {
                    let report = SessionReport::new(&results, profile, &evaluator);
                    black_box(report);
                },
                BatchSize::SmallInput,
            )
        });
    }

    g.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
