use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wordcraft::{
    field::Field,
    layouts::{CONDITION, GLOBAL_OVERHEAD},
    memory::WordMemory,
};

fn gen_memory(words: usize) -> WordMemory {
    // Deterministic but non-trivial pattern
    WordMemory::from((0..words).map(|i| (i * 40503 % 65536) as u16).collect::<Vec<_>>())
}

fn bench_field_access(c: &mut Criterion) {
    let tail = Field::bits("tail", 0, 3, 12);

    for &records in &[1usize, 64, 1024] {
        let mut mem = gen_memory(records);

        c.bench_function(&format!("set_get_{}_conditions", records), |b| {
            b.iter(|| {
                for base in 0..records as u32 {
                    tail.set(&mut mem, base, black_box(0x155)).unwrap();
                    black_box(tail.get(&mem, base).unwrap());
                }
            })
        });
    }
}

fn bench_path_access(c: &mut Criterion) {
    let mut mem = gen_memory(1024);

    c.bench_function("condition_by_name", |b| {
        b.iter(|| {
            CONDITION.set_bool(&mut mem, black_box(7), "wakeup", true).unwrap();
            black_box(CONDITION.get(&mem, 7, "tail").unwrap());
        })
    });

    c.bench_function("global_overhead_nested_path", |b| {
        b.iter(|| {
            GLOBAL_OVERHEAD
                .set(&mut mem, black_box(100), "word.gfi", 0x2A)
                .unwrap();
            black_box(GLOBAL_OVERHEAD.get(&mem, 100, "word.gfi").unwrap());
        })
    });
}

criterion_group!(benches, bench_field_access, bench_path_access);
criterion_main!(benches);
