//! Integration tests

mod backtest_test;
mod data_test;
mod e2e_test;
