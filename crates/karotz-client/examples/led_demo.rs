//! Example: Cycle the nose LED through the palette.
//!
//! Usage: cargo run --example led_demo -- [settings.yaml] [section]

use karotz_client::{Credentials, HttpTransport, Karotz, DEFAULT_SECTION};
use std::env;
use std::time::{Duration, Instant};

fn main() {
    let args: Vec<String> = env::args().collect();

    let credentials = match args.get(1) {
        Some(path) => {
            let section = args.get(2).map(|s| s.as_str()).unwrap_or(DEFAULT_SECTION);
            Credentials::load(path, section)
        }
        None => Credentials::load_default(),
    };
    let credentials = match credentials {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: {} [settings.yaml] [section]", args[0]);
            std::process::exit(1);
        }
    };

    let transport = HttpTransport::new().expect("Failed to build HTTP client");

    println!("Starting interactive session...");
    let start = Instant::now();
    let mut karotz = match Karotz::connect(credentials, transport) {
        Ok(karotz) => karotz,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Session {} started in {:.2}s, access: {}",
        karotz.interactive_id().unwrap_or("?"),
        start.elapsed().as_secs_f64(),
        karotz.access().join(", ")
    );

    if let Err(e) = karotz.demo_led(Duration::from_secs(1)) {
        eprintln!("Error: {}", e);
    }

    // Dropping `karotz` would also stop the session.
    match karotz.close() {
        Ok(()) => println!("Session stopped"),
        Err(e) => eprintln!("Error stopping session: {}", e),
    }
}
