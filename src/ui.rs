// UI layer: the interactive menu, built on `dialoguer`.
// Each menu entry is a thin wrapper: it picks an endpoint list and a
// response policy, then delegates to `fetch`, `report` or `snapshot`.

use crate::api::ApiClient;
use crate::config::FetcherConfig;
use crate::endpoints;
use crate::fetch::{fetch_and_save, to_pretty, FetchReport};
use crate::report::{collect_from_dir, generate_summary};
use crate::snapshot::{list_snapshots, SnapshotDir};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const MENU: &[&str] = &[
    "1. Fetch all default endpoints",
    "2. Enter endpoints manually",
    "3. Save all responses (regardless of response code)",
    "4. Save only Offsets (excluding Shuffles, regardless of response code)",
    "5. Save only Shuffles (regardless of response code)",
    "6. Save only Versions (regardless of response code)",
    "7. Save endpoints with parameters (e.g., search/test, prefix/test, game/123)",
    "8. Generate a summary report after saving data",
    "9. Clean the data folder before saving",
    "10. Perform a test request to a single endpoint (with custom headers and parameters)",
    "Exit",
];

/// Main interactive menu. Runs until the user chooses "Exit". The result
/// of the most recent fetch is kept for option 8.
pub fn main_menu(api: &ApiClient, cfg: &FetcherConfig, snapshot: SnapshotDir) -> Result<()> {
    let mut last: Option<FetchReport> = None;
    loop {
        let selection = Select::new()
            .with_prompt("rbxstats API Data Fetching CLI Tool")
            .items(MENU)
            .default(0)
            .interact()?;
        let fetch = match selection {
            0 => Some((endpoints::all_endpoints(), false)),
            1 => {
                let input: String = Input::new()
                    .with_prompt("Enter endpoints (space-separated, e.g., offsets search?query=test)")
                    .allow_empty(true)
                    .interact_text()?;
                Some((endpoints::parse_manual_endpoints(&input), false))
            }
            2 => Some((endpoints::all_endpoints(), true)),
            3 => Some((endpoints::offsets_endpoints(), true)),
            4 => Some((endpoints::shuffles_endpoints(), true)),
            5 => Some((endpoints::versions_endpoints(), true)),
            6 => Some((prompt_parameterised()?, true)),
            7 => {
                handle_summary(cfg, &snapshot, last.as_ref())?;
                None
            }
            8 => {
                if handle_clean(&snapshot)? {
                    last = None;
                }
                None
            }
            9 => {
                handle_test_request(api)?;
                None
            }
            _ => break,
        };

        if let Some((list, accept_all)) = fetch {
            if list.is_empty() {
                println!("No endpoints entered.");
                continue;
            }
            let report = run_fetch(api, snapshot.path(), &list, accept_all)?;
            if !report.is_empty()
                && Confirm::new()
                    .with_prompt("Would you like to generate a summary report?")
                    .default(false)
                    .interact()?
            {
                write_summary(snapshot.path(), &report)?;
            }
            last = Some(report);
        }
    }
    Ok(())
}

/// Fetch with a progress bar sized to the endpoint list.
fn run_fetch(
    api: &ApiClient,
    dir: &Path,
    list: &[String],
    accept_all: bool,
) -> Result<FetchReport> {
    let pb = ProgressBar::new(list.len() as u64);
    pb.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")?);
    let report = fetch_and_save(api, list, dir, accept_all, &pb)
        .with_context(|| format!("Fetching into {} failed", dir.display()))?;
    pb.finish_and_clear();
    println!(
        "Saved {} file(s), {} error(s) in {}",
        report.saved.len(),
        report.errors.len(),
        dir.display()
    );
    Ok(report)
}

fn prompt_parameterised() -> Result<Vec<String>> {
    let name: String = Input::new()
        .with_prompt("Enter value for search (e.g., test)")
        .allow_empty(true)
        .interact_text()?;
    let prefix: String = Input::new()
        .with_prompt("Enter value for prefix (e.g., test)")
        .allow_empty(true)
        .interact_text()?;
    let game_id: String = Input::new()
        .with_prompt("Enter game ID (e.g., 123)")
        .allow_empty(true)
        .interact_text()?;
    Ok(endpoints::parameterised_endpoints(&name, &prefix, &game_id))
}

/// Summarize this session's last fetch, or an existing snapshot folder
/// when nothing was fetched yet.
fn handle_summary(
    cfg: &FetcherConfig,
    snapshot: &SnapshotDir,
    last: Option<&FetchReport>,
) -> Result<()> {
    if let Some(report) = last.filter(|r| !r.is_empty()) {
        return write_summary(snapshot.path(), report);
    }

    let folders: Vec<_> = list_snapshots(&cfg.output_root)?
        .into_iter()
        .filter(|p| p.as_path() != snapshot.path())
        .collect();
    if folders.is_empty() {
        println!("Run another option (1-7) first to save data!");
        return Ok(());
    }
    let labels: Vec<String> = folders.iter().map(|p| p.display().to_string()).collect();
    let idx = Select::new()
        .with_prompt("Nothing fetched this session. Summarize an existing folder")
        .items(&labels)
        .default(0)
        .interact()?;
    let dir = &folders[idx];
    let report = collect_from_dir(dir)?;
    if report.is_empty() {
        println!("Folder {} has no saved data.", dir.display());
        return Ok(());
    }
    write_summary(dir, &report)
}

fn write_summary(dir: &Path, report: &FetchReport) -> Result<()> {
    let path = generate_summary(dir, &report.saved, &report.errors)?;
    println!("Generated summary report: {}", path.display());
    Ok(())
}

/// Returns true when the folder was cleaned.
fn handle_clean(snapshot: &SnapshotDir) -> Result<bool> {
    let confirm = Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to clean the folder {}?",
            snapshot.path().display()
        ))
        .default(false)
        .interact()?;
    if !confirm {
        println!("Folder cleaning canceled");
        return Ok(false);
    }
    if snapshot.clean()? {
        println!("Cleared folder {}", snapshot.path().display());
    } else {
        println!(
            "Folder {} does not exist, created a new one",
            snapshot.path().display()
        );
    }
    Ok(true)
}

fn handle_test_request(api: &ApiClient) -> Result<()> {
    let endpoint: String = Input::new()
        .with_prompt("Enter endpoint (e.g., offsets)")
        .interact_text()?;
    let params: String = Input::new()
        .with_prompt("Enter additional parameters (e.g., version=latest, press enter to skip)")
        .allow_empty(true)
        .interact_text()?;
    let params = endpoints::parse_params(&params);

    let custom_ua = Confirm::new()
        .with_prompt("Add a custom User-Agent?")
        .default(false)
        .interact()?;
    let ua = if custom_ua {
        let ua: String = Input::new().with_prompt("Enter User-Agent").interact_text()?;
        Some(ua)
    } else {
        None
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Requesting...");
    let result = api.test_request(endpoint.trim(), &params, ua.as_deref());
    spinner.finish_and_clear();

    match result {
        Ok(resp) => {
            println!("\nResult of test request to {}:", resp.url);
            println!("Status code: {}", resp.status);
            match serde_json::from_str::<serde_json::Value>(&resp.body) {
                Ok(v) => println!("Response: {}", to_pretty(&v)?),
                Err(_) => println!("Response: {}", resp.body),
            }
        }
        Err(e) => println!("Test request failed: {}", e),
    }
    Ok(())
}
