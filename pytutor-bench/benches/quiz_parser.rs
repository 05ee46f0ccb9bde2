//! pytutor Benchmark Suite
//!
//! Targets for the reply path that runs on every generation attempt:
//!   sanitize_quiz_reply ........ < 20μs
//!   parse_quiz_clean ........... < 100μs
//!   sanitize_then_parse ........ < 120μs
//!   parse_quiz_rejected ........ < 20μs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pytutor_core::{parse_quiz, sanitize};

/// A reply shaped like real model output: bold questions, inline code.
fn make_reply(questions: usize) -> String {
    (1..=questions)
        .map(|n| {
            format!(
                "**{n}. What does `len([1, 2, {n}])` return?**\n\
                 A) `2`\nB) `3`\nC) `{n}`\nD) An error\n\
                 Correct: B\n"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark: strip markdown markers from a full quiz reply.
fn bench_sanitize(c: &mut Criterion) {
    let reply = make_reply(10);
    c.bench_function("sanitize_quiz_reply", |b| {
        b.iter(|| black_box(sanitize(black_box(&reply))));
    });
}

/// Benchmark: parse an already-clean ten-question quiz.
fn bench_parse(c: &mut Criterion) {
    let clean = sanitize(&make_reply(10));
    c.bench_function("parse_quiz_clean", |b| {
        b.iter(|| black_box(parse_quiz(black_box(&clean))));
    });
}

/// Benchmark: the full interpret step of one quiz attempt.
fn bench_sanitize_then_parse(c: &mut Criterion) {
    let reply = make_reply(10);
    c.bench_function("sanitize_then_parse", |b| {
        b.iter(|| black_box(parse_quiz(&sanitize(black_box(&reply)))));
    });
}

/// Benchmark: a reply with one question too many is rejected.
fn bench_parse_rejected(c: &mut Criterion) {
    let clean = sanitize(&make_reply(11));
    c.bench_function("parse_quiz_rejected", |b| {
        b.iter(|| {
            let result = parse_quiz(black_box(&clean));
            debug_assert!(result.is_err());
            black_box(result)
        });
    });
}

criterion_group!(
    benches,
    bench_sanitize,
    bench_parse,
    bench_sanitize_then_parse,
    bench_parse_rejected,
);
criterion_main!(benches);
