//! Bicycle parking CLI
//!
//! Console front end for registering users and bicycles and recording
//! bicycles entering and leaving the parking lot.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                    # interactive menu
//! cargo run -- register-user 12345678A Ana ana@mail.com
//! cargo run -- register-bike B1 12345678A Orbea MX20
//! cargo run -- check-in 12345678A B1
//! cargo run -- --data-dir /var/lib/parking status B1
//! ```
//!
//! Records are kept in CSV files under the data directory (`data` by
//! default, or the one given in `--config`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (rejected operation, unreadable records, fatal error in the menu)

use bike_parking::cli;
use std::process;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
