// Entry point and high-level CLI flow.
//
// - Option [1] loads the geocoded-address table and the trip/payment
//   exports, printing load diagnostics.
// - Option [2] builds the payment aggregates and geocode index, rolls the
//   trips into day buckets, and writes routes.json.
// - After generating the report, the user can go back to the menu or exit.
mod address;
mod geocode;
mod loader;
mod output;
mod payments;
mod reports;
mod types;
mod util;

use geocode::GeocodeIndex;
use loader::LoadedData;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

// Simple in-memory app state so we only load the exports once but can
// regenerate the report multiple times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<LoadedData>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after generating the report.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load all source CSV files.
///
/// On success, we store the raw tables in `APP_STATE` and print a short
/// textual summary of what was read.
fn handle_load() {
    let data_dir = Path::new("data");
    match loader::load_all(data_dir) {
        Ok((data, load_report)) => {
            println!(
                "Loaded {} geocoded addresses.",
                util::format_int(load_report.geocoded_rows as i64)
            );
            println!(
                "Loaded {} trip rows from {} file(s), {} payment rows from {} file(s).",
                util::format_int(load_report.trip_rows as i64),
                util::format_int(load_report.trip_files as i64),
                util::format_int(load_report.payment_rows as i64),
                util::format_int(load_report.payment_files as i64)
            );
            if load_report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to parse errors.",
                    util::format_int(load_report.parse_errors as i64)
                );
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load data: {}\n", e);
        }
    }
}

/// Handle option [2]: build the report and write the JSON document.
fn handle_generate_report() {
    let state = APP_STATE.lock().unwrap();
    let Some(data) = state.data.as_ref() else {
        println!("Error: No data loaded. Please load the data files first (option 1).\n");
        return;
    };

    println!("Generating report...");
    let index = GeocodeIndex::build(&data.geocoded);
    let payment_agg = payments::aggregate_payments(&data.payment_tables);
    let (report, match_report) = reports::build_report(&data.trip_tables, &payment_agg, &index);

    let file = "routes.json";
    if let Err(e) = output::write_json(file, &report) {
        eprintln!("Write error: {}", e);
    }

    println!(
        "{} days, {} trips, {} total earnings",
        util::format_int(report.stats.total_days as i64),
        util::format_int(report.stats.total_trips as i64),
        util::format_number(report.stats.total_earnings, 2)
    );
    let unmatched = match_report.unmatched_pickups + match_report.unmatched_dropoffs;
    if unmatched > 0 {
        println!(
            "Note: {} of {} completed trips had an address with no geocode match.",
            util::format_int(unmatched as i64),
            util::format_int(match_report.completed_trips as i64)
        );
    }
    println!("");
    output::preview_table_rows(&reports::day_summaries(&report), 7);
    println!("(Full report exported to {})\n", file);
}

fn main() {
    loop {
        println!("Courier Report:");
        println!("[1] Load data files");
        println!("[2] Generate report\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_report();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
