//! Bench-only wrapper crate; see `benches/label_generation_bench.rs`.
