//! Walk an arena through alloc / reset / free and print its regions.
//!
//! Run with `RUST_LOG=debug` to also see region creation and release, or
//! `RUST_LOG=trace` to follow the tail cursor as it walks the chain.

use regio::{Arena, ArenaConfig};
use regio_bench::dump_regions;
use regio_test_utils::CountingAllocator;

const RULE: &str = "=========================================================";

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let counter = CountingAllocator::new();
    let mut a = Arena::with_allocator(ArenaConfig::new(400), &counter);

    println!("------ small alloc ------");
    for _ in 0..4 {
        a.alloc(100).unwrap();
    }
    print!("{}", dump_regions(&a));

    println!("\n{RULE}\n");
    println!("------ big alloc ------");
    a.alloc(8000).unwrap();
    print!("{}", dump_regions(&a));

    println!("\n{RULE}\n");
    println!("------ reset ------");
    a.reset();
    print!("{}", dump_regions(&a));

    println!("\n{RULE}\n");
    println!("------ allocs after reset ------");
    a.alloc(300).unwrap();
    a.alloc(400).unwrap();
    a.alloc(9000).unwrap();
    print!("{}", dump_regions(&a));

    println!("\n{RULE}\n");
    println!("------ free ------");
    a.free();
    print!("{}", dump_regions(&a));

    log::info!(
        "backing allocator: {} allocations, {} deallocations, sizes {:?}",
        counter.allocations(),
        counter.deallocations(),
        counter.sizes()
    );
}
