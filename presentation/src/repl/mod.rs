//! Interactive bench REPL

pub mod bench_repl;
