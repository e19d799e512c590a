use criterion::{Criterion, criterion_group, criterion_main};
use respool::{Pool, PoolConfig};

fn acquire_release(c: &mut Criterion) {
    let config = PoolConfig::new(|| Ok(vec![0u8; 4096]), |_buf| Ok(()))
        .with_minimum(64)
        .with_capacity(64);
    let pool = Pool::new(config).unwrap();

    c.bench_function("acquire_release", |b| {
        b.iter(|| {
            let buf = pool.acquire().unwrap();
            pool.release(buf).unwrap();
        })
    });
}

fn acquire_release_contended(c: &mut Criterion) {
    let config = PoolConfig::new(|| Ok(0u64), |_| Ok(()))
        .with_minimum(8)
        .with_capacity(8);
    let pool = std::sync::Arc::new(Pool::new(config).unwrap());

    c.bench_function("acquire_release_contended", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pool = std::sync::Arc::clone(&pool);
                    std::thread::spawn(move || {
                        for _ in 0..64 {
                            let res = pool.acquire().unwrap();
                            pool.release(res).unwrap();
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        })
    });
}

criterion_group!(benches, acquire_release, acquire_release_contended);
criterion_main!(benches);
