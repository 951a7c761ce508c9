// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules into the interactive fetcher.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the rbxstats API (URL building,
//   GET with headers, one-off test requests).
// - `endpoints`: the endpoint catalog plus the filename helpers.
// - `fetch`: the fetch-and-save loop and its per-endpoint bookkeeping.
// - `report`: `summary.txt` generation.
// - `snapshot`: timestamped output folders.
// - `config` / `logging` / `error`: ambient plumbing.
// - `ui`: the terminal menu, delegating everything else to the modules
//   above.
pub mod api;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod report;
pub mod snapshot;
pub mod ui;
