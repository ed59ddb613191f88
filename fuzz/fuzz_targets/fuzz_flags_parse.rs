#![no_main]

use canonical_errors::Flags;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(flags) = data.parse::<Flags>() {
        assert_eq!(flags.to_string().parse::<Flags>(), Ok(flags));
    }
});
