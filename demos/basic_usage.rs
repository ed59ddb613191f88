use canonical_errors::{define_errors, inspect, wrapf, Canonical, Extras, Flags};
use std::io;
use std::time::Duration;

define_errors! {
    "config" => {
        CFG_PARSE_FAILED = ("parse-failed", "configuration could not be parsed"),
        CFG_UNAVAILABLE  = ("unavailable", "configuration store unavailable", Flags::RETRYABLE),
    }
}

fn read_source(path: &str) -> Result<String, io::Error> {
    // Simulate a flaky configuration store
    if path.starts_with("remote://") {
        return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "store refused connection"));
    }
    Ok("threshold = ".to_string())
}

fn load_configuration(path: &str) -> Result<u32, Canonical> {
    let text = read_source(path).map_err(|e| {
        CFG_UNAVAILABLE
            .wrap(e)
            .with_extras(Extras::new().with_delay(Duration::from_secs(2)))
    })?;

    let value = text.trim_start_matches("threshold = ");
    value
        .parse::<u32>()
        .map_err(|_| wrapf!(CFG_PARSE_FAILED, "{}: expected a number after 'threshold', got {:?}", path, value))
}

fn main() {
    println!("--- Basic Usage Example ---\n");

    for path in ["local.toml", "remote://cfg/app"] {
        match load_configuration(path) {
            Ok(value) => println!("Loaded threshold {}", value),
            Err(err) => {
                // SCENARIO 1: The short form, suitable for a user-facing message
                println!("1. [DISPLAY] {}", err);

                // SCENARIO 2: The whole chain, one bullet per link
                println!("\n2. [VERBOSE]{:#}", err);

                // SCENARIO 3: Callers branch on kind and classification, never on text
                if err == CFG_UNAVAILABLE && err.is_retryable() {
                    println!(
                        "3. [POLICY] retry in {:?}",
                        err.extras().delay()
                    );
                } else if inspect::is(&err, &CFG_PARSE_FAILED) {
                    println!("3. [POLICY] fix the file, retrying will not help");
                }

                // SCENARIO 4: Structured log line for the admin
                err.with_log_record(|record| println!("4. [LOG] {}\n", record));
            }
        }
    }
}
