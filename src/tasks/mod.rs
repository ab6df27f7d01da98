pub mod executor_loop;
pub mod reload_loop;
