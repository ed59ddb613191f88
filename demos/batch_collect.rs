use canonical_errors::{define_errors, join, Canonical, Group, GroupOption};
use std::sync::{Arc, Mutex};
use std::thread;

define_errors! {
    "import" => {
        ROW_EMPTY   = ("row-empty", "row has no fields"),
        ROW_INVALID = ("row-invalid", "row failed validation"),
    }
}

fn validate(line: &str) -> Result<u64, Canonical> {
    if line.trim().is_empty() {
        return Err(ROW_EMPTY.wrap(format!("line {:?}", line)));
    }
    line.trim().parse::<u64>().map_err(|e| ROW_INVALID.wrap(e))
}

fn import_sequential(lines: &[&str]) -> (u64, Option<Group>) {
    let mut failures = Group::new();
    let total = lines
        .iter()
        .filter_map(|line| failures.check(validate(line)))
        .sum();
    (total, failures.error_or_none())
}

fn import_parallel(chunks: Vec<Vec<&'static str>>) -> Option<Group> {
    let failures = Arc::new(Mutex::new(Group::new()));

    let handles: Vec<_> = chunks
        .into_iter()
        .map(|chunk| {
            let failures = Arc::clone(&failures);
            thread::spawn(move || {
                for line in chunk {
                    if let Err(err) = validate(line) {
                        failures.lock().expect("failure group lock poisoned").push(err);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("import worker panicked");
    }

    Arc::try_unwrap(failures)
        .expect("all workers joined")
        .into_inner()
        .expect("failure group lock poisoned")
        .error_or_none()
}

fn main() {
    println!("--- Batch Collection Example ---\n");

    let (total, failures) = import_sequential(&["10", "", "x", "32"]);
    println!("Sequential import summed {} with {} failures", total, failures.as_ref().map_or(0, Group::len));
    if let Some(group) = &failures {
        println!("{}", group);
    }

    let parallel = import_parallel(vec![vec!["1", "two"], vec!["", "4"], vec!["5"]]);
    println!("Parallel import clean: {}", parallel.group_is_empty());

    // Merge both batches into one report, ordered for stable output
    let mut report = join(failures, parallel.into_iter().flatten());
    report.sort();
    println!("Combined report ({} failures):{}", report.len(), report);

    for record in report.log_records() {
        println!("  {}", record);
    }
}
