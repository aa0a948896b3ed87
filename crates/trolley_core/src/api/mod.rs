pub mod json_api;

pub use json_api::{
    analyse_run_json, simulate_run_json, LevelCounts, RunRequest, RunResponse,
};
