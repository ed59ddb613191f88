#![no_main]

use canonical_errors::logging::MAX_FIELD_OUTPUT_LEN;
use canonical_errors::{Canonical, Extras};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (String, String, String)| {
    let (message, trace, cause) = data;
    let err = Canonical::from_parts("fuzz", "record", message)
        .with_extras(Extras::new().with_stack_trace(trace))
        .wrap(cause);

    let mut line = String::new();
    err.log_record().write_to(&mut line).unwrap();
    assert!(line.len() <= 3 * MAX_FIELD_OUTPUT_LEN + 128);
});
